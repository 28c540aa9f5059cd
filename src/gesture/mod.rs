//! Gesture module: pointer tracking and interaction states
//!
//! - Idle: waiting for a press
//! - ArmedPendingHold: pointer down, deciding between tap and hold
//! - Expanding / Recording / Collapsing: the hold path

mod classifier;
mod state;

pub use classifier::{GestureClassifier, PressKind, Ticket};
pub use state::InteractionState;
