//! Events emitted by the controller
//!
//! One cycle produces at most one `HoldConfirmed` and exactly one outcome
//! (`Tap`, `RecordingAborted` or `RecordingCompleted`).

mod listener;

use serde::{Deserialize, Serialize};

pub use listener::InteractionListener;

/// Why a recording ended successfully
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionReason {
    /// Pointer released after the minimum duration
    Released,
    /// Maximum duration reached while still held
    MaxDurationReached,
}

/// Events delivered to listeners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlEvent {
    /// Released before the hold threshold
    Tap,

    /// Hold threshold crossed, recording is about to begin
    HoldConfirmed,

    /// Released before the minimum recording duration
    RecordingAborted {
        /// Configured minimum, so the host can tell the user
        required_min_ms: u64,
        /// How long the recording actually ran
        recorded_ms: u64,
    },

    /// Recording finished
    RecordingCompleted {
        /// How long the recording ran
        recorded_ms: u64,
        reason: CompletionReason,
    },
}

impl ControlEvent {
    /// True for the terminal classification of a cycle
    pub fn is_outcome(&self) -> bool {
        !matches!(self, ControlEvent::HoldConfirmed)
    }
}

impl std::fmt::Display for ControlEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControlEvent::Tap => write!(f, "TAP"),
            ControlEvent::HoldConfirmed => write!(f, "HOLD_CONFIRMED"),
            ControlEvent::RecordingAborted {
                required_min_ms,
                recorded_ms,
            } => {
                write!(f, "RECORDING_ABORTED ({}ms < {}ms)", recorded_ms, required_min_ms)
            }
            ControlEvent::RecordingCompleted {
                recorded_ms,
                reason: CompletionReason::Released,
            } => write!(f, "RECORDING_COMPLETED ({}ms)", recorded_ms),
            ControlEvent::RecordingCompleted {
                recorded_ms,
                reason: CompletionReason::MaxDurationReached,
            } => write!(f, "RECORDING_COMPLETED ({}ms, max reached)", recorded_ms),
        }
    }
}
