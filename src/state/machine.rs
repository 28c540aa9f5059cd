//! Core press/hold/record state machine
//!
//! Handles transitions between Idle, ArmedPendingHold, Expanding, Recording
//! and Collapsing. The machine performs no I/O: every input returns the list
//! of effects the driver has to carry out, in order.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::InteractionConfig;
use crate::error::ProtocolViolation;
use crate::events::{CompletionReason, ControlEvent};
use crate::gesture::{GestureClassifier, InteractionState, PressKind, Ticket};
use crate::presentation::TransitionKind;
use crate::recording::{RecordingTimer, Tick};

/// Inputs consumed by the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Pointer went down
    PressStart,
    /// Pointer went up
    PressEnd,
    /// Deferred hold timer elapsed
    HoldTimerFired { ticket: Ticket },
    /// Presentation finished a transition
    TransitionFinished { kind: TransitionKind, ticket: Ticket },
    /// Periodic progress tick for a recording run
    ProgressTick { generation: u64 },
}

/// Work requested from the driver
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver `HoldTimerFired { ticket }` after `delay`
    ScheduleHoldTimer { ticket: Ticket, delay: Duration },
    /// Drop the pending hold timer
    CancelHoldTimer { ticket: Ticket },
    /// Play a transition; report `TransitionFinished` with the same ticket
    PlayTransition { kind: TransitionKind, ticket: Ticket },
    /// Deliver `ProgressTick { generation }` every `interval`
    StartProgressTicks { generation: u64, interval: Duration },
    /// Stop delivering progress ticks
    StopProgressTicks,
    /// Forward a progress value to the presentation
    Progress(f64),
    /// Forward an event to the listener
    Notify(ControlEvent),
}

/// The state machine for one control
pub struct InteractionMachine {
    config: InteractionConfig,
    /// Current state
    state: InteractionState,
    classifier: GestureClassifier,
    timer: RecordingTimer,
    /// Ticket of the transition currently playing
    transition: Option<Ticket>,
    next_ticket: u64,
    /// Time when the current non-Idle state was entered
    state_entered_at: Option<Instant>,
    /// Recording hit the max while the pointer was still down; the real
    /// pointer-up is still owed
    awaiting_release: bool,
}

impl InteractionMachine {
    /// Create a machine in the Idle state
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            classifier: GestureClassifier::new(config.min_hold()),
            timer: RecordingTimer::new(config.max_record()),
            config,
            state: InteractionState::Idle,
            transition: None,
            next_ticket: 0,
            state_entered_at: None,
            awaiting_release: false,
        }
    }

    /// Get the current state
    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Current recording progress in milliseconds (0 outside Recording)
    pub fn progress(&self) -> f64 {
        self.timer.progress()
    }

    pub fn is_pressed(&self) -> bool {
        self.classifier.is_pressed()
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Process one input at time `now`.
    ///
    /// Out-of-order pointer events are rejected without touching any state.
    /// Stale timer and transition callbacks are accepted and produce nothing.
    pub fn handle(&mut self, input: Input, now: Instant) -> Result<Vec<Effect>, ProtocolViolation> {
        let mut effects = Vec::new();

        match input {
            Input::PressStart => self.on_press_start(now, &mut effects)?,
            Input::PressEnd => self.on_press_end(now, &mut effects)?,
            Input::HoldTimerFired { ticket } => self.on_hold_timer(ticket, now, &mut effects),
            Input::TransitionFinished { kind, ticket } => {
                self.on_transition_finished(kind, ticket, now, &mut effects)?
            }
            Input::ProgressTick { generation } => {
                self.on_progress_tick(generation, now, &mut effects)
            }
        }

        Ok(effects)
    }

    fn on_press_start(
        &mut self,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) -> Result<(), ProtocolViolation> {
        if self.state != InteractionState::Idle {
            return Err(ProtocolViolation::PressStartWhileBusy { state: self.state });
        }
        self.awaiting_release = false;

        let ticket = self.issue_ticket();
        self.classifier.press_start(now, ticket);
        self.transition_to(InteractionState::ArmedPendingHold, now);
        effects.push(Effect::ScheduleHoldTimer {
            ticket,
            delay: self.config.min_hold(),
        });

        Ok(())
    }

    fn on_press_end(
        &mut self,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) -> Result<(), ProtocolViolation> {
        match self.state {
            InteractionState::Idle if self.awaiting_release => {
                debug!("absorbing release after max duration");
                self.awaiting_release = false;
            }
            InteractionState::Idle => return Err(ProtocolViolation::PressEndWhileIdle),

            InteractionState::ArmedPendingHold => {
                self.classifier.release();
                if let Some(ticket) = self.classifier.cancel_hold_timer() {
                    effects.push(Effect::CancelHoldTimer { ticket });
                }

                match self.classifier.classify(now) {
                    PressKind::Tap => {
                        info!(
                            held_ms = self.classifier.held_for(now).as_millis() as u64,
                            "tap"
                        );
                        effects.push(Effect::Notify(ControlEvent::Tap));
                        self.classifier.reset();
                        self.transition_to(InteractionState::Idle, now);
                    }
                    // The hold timer is late; take the hold path already released
                    PressKind::Hold => self.begin_expanding(now, effects),
                }
            }

            InteractionState::Recording => {
                self.classifier.release();
                let recorded = self.timer.cancel(now);
                effects.push(Effect::StopProgressTicks);
                effects.push(Effect::Progress(0.0));
                let outcome = self.classify_recording(recorded);
                self.begin_collapsing(outcome, now, effects);
            }

            // The in-flight transition decides what happens next
            InteractionState::Expanding | InteractionState::Collapsing => {
                debug!(state = %self.state, "released during transition");
                self.classifier.release();
                self.awaiting_release = false;
            }
        }

        Ok(())
    }

    fn on_hold_timer(&mut self, ticket: Ticket, now: Instant, effects: &mut Vec<Effect>) {
        if self.state != InteractionState::ArmedPendingHold || !self.classifier.confirm_hold(ticket)
        {
            debug!(?ticket, state = %self.state, "ignoring stale hold timer");
            return;
        }

        self.begin_expanding(now, effects);
    }

    fn on_transition_finished(
        &mut self,
        kind: TransitionKind,
        ticket: Ticket,
        now: Instant,
        effects: &mut Vec<Effect>,
    ) -> Result<(), ProtocolViolation> {
        if self.transition != Some(ticket) {
            debug!(?ticket, %kind, "ignoring stale transition completion");
            return Ok(());
        }
        self.transition = None;

        match (kind, self.state) {
            (TransitionKind::Expand, InteractionState::Expanding) => {
                if self.classifier.is_pressed() {
                    let generation = self.timer.start(now)?;
                    self.transition_to(InteractionState::Recording, now);
                    effects.push(Effect::StartProgressTicks {
                        generation,
                        interval: self.config.tick_interval(),
                    });
                    effects.push(Effect::Progress(0.0));
                } else {
                    // Released while expanding, recording never started
                    let outcome = self.classify_recording(0.0);
                    self.begin_collapsing(outcome, now, effects);
                }
            }
            (TransitionKind::Collapse, InteractionState::Collapsing) => {
                self.classifier.reset();
                self.transition_to(InteractionState::Idle, now);
            }
            (kind, state) => {
                debug!(%kind, %state, "transition does not match state");
            }
        }

        Ok(())
    }

    fn on_progress_tick(&mut self, generation: u64, now: Instant, effects: &mut Vec<Effect>) {
        if self.state != InteractionState::Recording || generation != self.timer.generation() {
            debug!(generation, state = %self.state, "ignoring stale progress tick");
            return;
        }

        match self.timer.tick(now) {
            Some(Tick::Progress(progress)) => effects.push(Effect::Progress(progress)),
            Some(Tick::Completed(max)) => {
                // Nobody has to let go for the recording to finish
                self.awaiting_release = self.classifier.is_pressed();
                self.classifier.release();
                effects.push(Effect::StopProgressTicks);
                effects.push(Effect::Progress(max));
                effects.push(Effect::Progress(0.0));
                let outcome = ControlEvent::RecordingCompleted {
                    recorded_ms: max as u64,
                    reason: CompletionReason::MaxDurationReached,
                };
                self.begin_collapsing(outcome, now, effects);
            }
            None => debug!(generation, "progress tick without active timer"),
        }
    }

    /// Outcome of a recording that ran for `recorded` milliseconds
    fn classify_recording(&self, recorded: f64) -> ControlEvent {
        let min = self.config.min_record().as_secs_f64() * 1000.0;

        if recorded < min {
            ControlEvent::RecordingAborted {
                required_min_ms: self.config.min_record_ms(),
                recorded_ms: recorded as u64,
            }
        } else {
            let reason = if recorded >= self.config.max_progress() {
                CompletionReason::MaxDurationReached
            } else {
                CompletionReason::Released
            };
            ControlEvent::RecordingCompleted {
                recorded_ms: recorded as u64,
                reason,
            }
        }
    }

    fn begin_expanding(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        self.transition_to(InteractionState::Expanding, now);
        effects.push(Effect::Notify(ControlEvent::HoldConfirmed));
        self.play(TransitionKind::Expand, effects);
    }

    fn begin_collapsing(&mut self, outcome: ControlEvent, now: Instant, effects: &mut Vec<Effect>) {
        info!(%outcome, "recording cycle finished");
        effects.push(Effect::Notify(outcome));
        self.transition_to(InteractionState::Collapsing, now);
        self.play(TransitionKind::Collapse, effects);
    }

    fn play(&mut self, kind: TransitionKind, effects: &mut Vec<Effect>) {
        let ticket = self.issue_ticket();
        self.transition = Some(ticket);
        effects.push(Effect::PlayTransition { kind, ticket });
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Perform a state transition
    fn transition_to(&mut self, new_state: InteractionState, now: Instant) {
        let old_state = self.state;
        let duration_ms = self
            .state_entered_at
            .map(|t| now.saturating_duration_since(t).as_millis() as u64)
            .unwrap_or(0);

        info!(
            from = %old_state,
            to = %new_state,
            duration_ms = duration_ms,
            "state transition"
        );

        self.state = new_state;
        self.state_entered_at = if new_state != InteractionState::Idle {
            Some(now)
        } else {
            None
        };
    }
}
