//! holdrec: press-and-hold record control
//!
//! A short press is a tap. Holding past the threshold confirms a hold, plays
//! an expand transition and starts a timed recording whose progress runs from
//! 0 to the configured maximum. The recording ends when the pointer is
//! released (aborted if shorter than the minimum, completed otherwise) or by
//! itself when the maximum is reached.
//!
//! - [`state::InteractionMachine`]: sans-IO state machine
//! - [`controller::Controller`]: async driver with timers, one event queue
//! - [`presentation::Presentation`]: transitions and progress display
//! - [`events::InteractionListener`]: host callbacks
//!
//! No drawing, media capture or persistence happens here.

pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod gesture;
pub mod lifecycle;
pub mod presentation;
pub mod recording;
pub mod state;

pub use config::InteractionConfig;
pub use controller::{Controller, ControllerHandle};
pub use error::{ConfigError, ControllerError, ProtocolViolation};
pub use events::{CompletionReason, ControlEvent, InteractionListener};
pub use gesture::InteractionState;
pub use presentation::{Presentation, TimedPresentation, TransitionDone, TransitionKind};
