// Copyright (c) 2025 - Cowboy AI, Inc.
//! Shopping Cart Lifecycle State Machine
//!
//! # States
//!
//! - Pending: Open for changes
//! - Confirmed: Checked out (terminal)
//! - Canceled: Abandoned (terminal)
//!
//! # Inputs
//!
//! - Modify: Pending → Pending (add or remove product items)
//! - Confirm: Pending → Confirmed
//! - Cancel: Pending → Canceled
//!
//! Every input is rejected once the cart is closed.

use std::fmt;

use super::{StateMachine, TransitionError, TransitionResult};
use crate::aggregate::ShoppingCartStatus;

/// Lifecycle input (FSM input)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartLifecycleInput {
    Modify,
    Confirm,
    Cancel,
}

impl fmt::Display for CartLifecycleInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartLifecycleInput::Modify => write!(f, "Modify"),
            CartLifecycleInput::Confirm => write!(f, "Confirm"),
            CartLifecycleInput::Cancel => write!(f, "Cancel"),
        }
    }
}

impl StateMachine for ShoppingCartStatus {
    type Input = CartLifecycleInput;
    type Output = ();

    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use CartLifecycleInput::*;
        use ShoppingCartStatus::*;

        match (self, input) {
            (Pending, Modify) => Ok((Pending, ())),
            (Pending, Confirm) => Ok((Confirmed, ())),
            (Pending, Cancel) => Ok((Canceled, ())),
            (Confirmed | Canceled, _) => Err(TransitionError::Terminal(self.to_string())),
        }
    }

    fn is_terminal(&self) -> bool {
        self.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        let pending = ShoppingCartStatus::Pending;

        assert_eq!(
            pending.transition(&CartLifecycleInput::Modify).unwrap().0,
            ShoppingCartStatus::Pending
        );
        assert_eq!(
            pending.transition(&CartLifecycleInput::Confirm).unwrap().0,
            ShoppingCartStatus::Confirmed
        );
        assert_eq!(
            pending.transition(&CartLifecycleInput::Cancel).unwrap().0,
            ShoppingCartStatus::Canceled
        );
        assert!(!pending.is_terminal());
    }

    #[test]
    fn test_closed_states_reject_every_input() {
        for status in [ShoppingCartStatus::Confirmed, ShoppingCartStatus::Canceled] {
            assert!(status.is_terminal());
            for input in [
                CartLifecycleInput::Modify,
                CartLifecycleInput::Confirm,
                CartLifecycleInput::Cancel,
            ] {
                assert!(matches!(
                    status.transition(&input),
                    Err(TransitionError::Terminal(_))
                ));
            }
        }
    }
}
