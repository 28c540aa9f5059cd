//! Interaction states

use serde::{Deserialize, Serialize};

/// The five states a control can be in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionState {
    /// Waiting for a press
    Idle,
    /// Pointer down, hold timer running
    ArmedPendingHold,
    /// Hold confirmed, expand transition playing
    Expanding,
    /// Progress timer active
    Recording,
    /// Collapse transition playing after the cycle ended
    Collapsing,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionState::Idle => write!(f, "Idle"),
            InteractionState::ArmedPendingHold => write!(f, "ArmedPendingHold"),
            InteractionState::Expanding => write!(f, "Expanding"),
            InteractionState::Recording => write!(f, "Recording"),
            InteractionState::Collapsing => write!(f, "Collapsing"),
        }
    }
}
