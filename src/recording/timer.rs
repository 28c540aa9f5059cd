//! Wall-clock recording progress
//!
//! Progress is derived from elapsed time on every tick rather than
//! accumulated, so late or skipped ticks never slow the recording down.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::error::ProtocolViolation;

/// Result of sampling an active timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Still recording, progress in milliseconds
    Progress(f64),
    /// Maximum reached; the timer has stopped itself
    Completed(f64),
}

/// Progress from 0 to the configured maximum, in milliseconds
#[derive(Debug)]
pub struct RecordingTimer {
    max: Duration,
    started_at: Option<Instant>,
    last_progress: f64,
    generation: u64,
}

impl RecordingTimer {
    pub fn new(max: Duration) -> Self {
        Self {
            max,
            started_at: None,
            last_progress: 0.0,
            generation: 0,
        }
    }

    /// Start a new recording run and return its generation
    pub fn start(&mut self, now: Instant) -> Result<u64, ProtocolViolation> {
        if self.is_active() {
            return Err(ProtocolViolation::RecordingAlreadyActive);
        }

        self.generation += 1;
        self.started_at = Some(now);
        self.last_progress = 0.0;
        debug!(generation = self.generation, "recording timer started");

        Ok(self.generation)
    }

    /// Sample progress at `now`; `None` when not running
    pub fn tick(&mut self, now: Instant) -> Option<Tick> {
        let elapsed = self.elapsed(now)?;
        let progress = millis(elapsed).max(self.last_progress);

        if elapsed >= self.max {
            debug!(generation = self.generation, "recording timer reached maximum");
            self.stop();
            return Some(Tick::Completed(millis(self.max)));
        }

        self.last_progress = progress;
        Some(Tick::Progress(progress))
    }

    /// Stop early, returning the progress reached. Progress is reset to 0.
    pub fn cancel(&mut self, now: Instant) -> f64 {
        let reached = match self.elapsed(now) {
            Some(elapsed) => millis(elapsed).max(self.last_progress),
            None => return 0.0,
        };
        self.stop();
        reached
    }

    pub fn is_active(&self) -> bool {
        self.started_at.is_some()
    }

    /// Generation of the current (or most recent) run
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Last progress value handed out
    pub fn progress(&self) -> f64 {
        self.last_progress
    }

    fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.started_at
            .map(|started| now.saturating_duration_since(started).min(self.max))
    }

    fn stop(&mut self) {
        self.started_at = None;
        self.last_progress = 0.0;
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
