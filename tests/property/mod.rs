// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties of the shopping cart decision and reconstruction functions
//! that must hold for every command sequence.

mod cart_evolution;
