//! Error types for configuration, event ordering and the controller handle

use crate::gesture::InteractionState;

/// Rejected configuration, reported at construction time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("minimum recording duration ({min_ms}ms) exceeds maximum ({max_ms}ms)")]
    MinExceedsMax { min_ms: u64, max_ms: u64 },

    #[error("maximum recording duration must be greater than zero")]
    ZeroMaxDuration,

    #[error("progress tick interval must be greater than zero")]
    ZeroTickInterval,

    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Host delivered pointer events out of order; the offending input is ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    #[error("press start received while {state}")]
    PressStartWhileBusy { state: InteractionState },

    #[error("press end received while idle")]
    PressEndWhileIdle,

    #[error("recording timer is already active")]
    RecordingAlreadyActive,
}

/// Errors surfaced through [`ControllerHandle`](crate::controller::ControllerHandle)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControllerError {
    #[error("controller is no longer running")]
    Closed,
}
