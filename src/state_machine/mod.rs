// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! Generic, pure state machine types for modeling aggregate lifecycles.
//! Transitions are deterministic functions with no side effects.
//!
//! ```text
//! (State, Input) → Result<(State, Output), TransitionError>
//! ```
//!
//! Command handlers consult the machine before emitting an event, so an
//! invalid lifecycle step is rejected as a business error and never reaches
//! the event stream.

pub mod cart_lifecycle;

pub use cart_lifecycle::CartLifecycleInput;

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// Current state accepts no further input
    #[error("State {0} is terminal")]
    Terminal(String),
}

/// Trait for finite state machines
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Attempt to transition to a new state given an input
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Whether no input leads out of this state
    fn is_terminal(&self) -> bool;
}
