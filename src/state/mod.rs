//! State machine module for the press/hold/record cycle
//!
//! Provides a sans-IO state machine: inputs go in with a timestamp, effects
//! come out for the controller to execute.

mod machine;

pub use machine::{Effect, Input, InteractionMachine};
