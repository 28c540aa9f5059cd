//! Tap versus hold classification
//!
//! Tracks the pointer and the deferred hold timer for one press. Timer
//! callbacks are matched against the ticket issued when the timer was armed,
//! so a callback that lost a race with a release has no effect.

use std::time::Duration;

use tokio::time::Instant;

/// Identifies one scheduled callback (hold timer or transition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);

/// How a press classifies at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressKind {
    /// Released before the hold threshold
    Tap,
    /// Threshold reached or passed
    Hold,
}

/// Pointer tracking for a single control
#[derive(Debug)]
pub struct GestureClassifier {
    min_hold: Duration,
    pressed: bool,
    press_started_at: Option<Instant>,
    hold_timer: Option<Ticket>,
}

impl GestureClassifier {
    pub fn new(min_hold: Duration) -> Self {
        Self {
            min_hold,
            pressed: false,
            press_started_at: None,
            hold_timer: None,
        }
    }

    /// Record a pointer-down and remember the ticket of its hold timer
    pub fn press_start(&mut self, now: Instant, hold_timer: Ticket) {
        self.pressed = true;
        self.press_started_at = Some(now);
        self.hold_timer = Some(hold_timer);
    }

    /// Consume the hold timer if `ticket` is the armed one.
    ///
    /// Returns false for stale or duplicate deliveries.
    pub fn confirm_hold(&mut self, ticket: Ticket) -> bool {
        if self.hold_timer == Some(ticket) {
            self.hold_timer = None;
            true
        } else {
            false
        }
    }

    /// Disarm the hold timer, returning the ticket that was armed
    pub fn cancel_hold_timer(&mut self) -> Option<Ticket> {
        self.hold_timer.take()
    }

    /// Classify the press as of `now`. Reaching the threshold exactly is a hold.
    pub fn classify(&self, now: Instant) -> PressKind {
        if self.held_for(now) < self.min_hold {
            PressKind::Tap
        } else {
            PressKind::Hold
        }
    }

    /// Time since pointer-down, zero if nothing is pressed
    pub fn held_for(&self, now: Instant) -> Duration {
        self.press_started_at
            .map(|started| now.saturating_duration_since(started))
            .unwrap_or_default()
    }

    /// Pointer lifted, or released on the user's behalf
    pub fn release(&mut self) {
        self.pressed = false;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Forget everything about the finished cycle
    pub fn reset(&mut self) {
        self.pressed = false;
        self.press_started_at = None;
        self.hold_timer = None;
    }
}
