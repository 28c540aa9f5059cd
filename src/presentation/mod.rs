//! Presentation boundary
//!
//! The state machine only needs two things from the presentation layer: play
//! a transition and report when it is done, and accept progress values.

mod geometry;
mod timed;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::controller::Envelope;
use crate::gesture::Ticket;
use crate::state::Input;

pub use geometry::{sweep_degrees, ButtonGeometry, Radii, Snapshot};
pub use timed::TimedPresentation;

/// The two cosmetic transitions around a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionKind {
    /// Outer circle grows, inner circle shrinks
    Expand,
    /// Back to resting size
    Collapse,
}

impl std::fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransitionKind::Expand => write!(f, "expand"),
            TransitionKind::Collapse => write!(f, "collapse"),
        }
    }
}

/// Visual side of the control, driven from the controller task
pub trait Presentation: Send {
    /// Start playing `kind`. Call [`TransitionDone::complete`] exactly once
    /// when it has finished, from any task.
    fn play_transition(&mut self, kind: TransitionKind, done: TransitionDone);

    /// Recording progress in milliseconds; 0 means no progress is shown
    fn on_progress_tick(&mut self, progress_ms: f64);
}

/// Completion token for one transition
#[derive(Debug)]
pub struct TransitionDone {
    tx: mpsc::WeakUnboundedSender<Envelope>,
    kind: TransitionKind,
    ticket: Ticket,
}

impl TransitionDone {
    pub(crate) fn new(
        tx: mpsc::WeakUnboundedSender<Envelope>,
        kind: TransitionKind,
        ticket: Ticket,
    ) -> Self {
        Self { tx, kind, ticket }
    }

    /// Report the transition as finished
    pub fn complete(self) {
        let input = Input::TransitionFinished {
            kind: self.kind,
            ticket: self.ticket,
        };

        match self.tx.upgrade() {
            Some(tx) if tx.send(Envelope::now(input)).is_ok() => {}
            _ => debug!(kind = %self.kind, "controller gone, dropping transition completion"),
        }
    }
}
