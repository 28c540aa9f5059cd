//! Async driver for the interaction state machine
//!
//! Pointer events, hold timer expiry, transition completions and progress
//! ticks all arrive on one queue and are handled strictly in arrival order
//! by [`Controller::run`]. Timer tasks only hold weak senders, so the loop
//! ends once every [`ControllerHandle`] has been dropped.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::InteractionConfig;
use crate::error::ControllerError;
use crate::events::InteractionListener;
use crate::gesture::{InteractionState, Ticket};
use crate::presentation::{Presentation, TransitionDone};
use crate::state::{Effect, Input, InteractionMachine};

/// An input stamped with the time it was produced
#[derive(Debug, Clone, Copy)]
pub struct Envelope {
    pub(crate) input: Input,
    pub(crate) at: Instant,
}

impl Envelope {
    pub(crate) fn now(input: Input) -> Self {
        Self {
            input,
            at: Instant::now(),
        }
    }
}

/// Host side of a running controller
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    tx: mpsc::UnboundedSender<Envelope>,
    state_rx: watch::Receiver<InteractionState>,
}

impl ControllerHandle {
    /// Pointer went down
    pub fn press_start(&self) -> Result<(), ControllerError> {
        self.send(Input::PressStart)
    }

    /// Pointer went up
    pub fn press_end(&self) -> Result<(), ControllerError> {
        self.send(Input::PressEnd)
    }

    /// State after the most recently handled input
    pub fn state(&self) -> InteractionState {
        *self.state_rx.borrow()
    }

    /// Wait until the controller reaches `state`
    pub async fn wait_for_state(&self, state: InteractionState) -> Result<(), ControllerError> {
        let mut rx = self.state_rx.clone();
        rx.wait_for(|current| *current == state)
            .await
            .map(|_| ())
            .map_err(|_| ControllerError::Closed)
    }

    fn send(&self, input: Input) -> Result<(), ControllerError> {
        self.tx
            .send(Envelope::now(input))
            .map_err(|_| ControllerError::Closed)
    }
}

/// Owns the state machine, its timers and the two collaborators
pub struct Controller<P, L> {
    machine: InteractionMachine,
    presentation: P,
    listener: L,
    rx: mpsc::UnboundedReceiver<Envelope>,
    timer_tx: mpsc::WeakUnboundedSender<Envelope>,
    state_tx: watch::Sender<InteractionState>,
    hold_task: Option<(Ticket, JoinHandle<()>)>,
    progress_task: Option<JoinHandle<()>>,
}

impl<P, L> Controller<P, L>
where
    P: Presentation,
    L: InteractionListener,
{
    /// Create a controller and the handle used to feed it pointer events
    pub fn new(config: InteractionConfig, presentation: P, listener: L) -> (Self, ControllerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(InteractionState::Idle);

        let controller = Self {
            machine: InteractionMachine::new(config),
            presentation,
            listener,
            rx,
            timer_tx: tx.downgrade(),
            state_tx,
            hold_task: None,
            progress_task: None,
        };

        (controller, ControllerHandle { tx, state_rx })
    }

    /// Process inputs until every handle is dropped
    pub async fn run(mut self) {
        info!(
            min_record_ms = self.machine.config().min_record_ms(),
            max_record_ms = self.machine.config().max_record_ms(),
            "controller started in Idle state"
        );

        while let Some(envelope) = self.rx.recv().await {
            self.dispatch(envelope);
        }

        self.cancel_hold_timer();
        self.stop_progress_ticks();
        info!("controller stopped");
    }

    fn dispatch(&mut self, Envelope { input, at }: Envelope) {
        match self.machine.handle(input, at) {
            Ok(effects) => {
                for effect in effects {
                    self.execute(effect);
                }
            }
            Err(violation) => {
                warn!(%violation, state = %self.machine.state(), "ignoring out-of-order input");
            }
        }

        self.state_tx.send_replace(self.machine.state());
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleHoldTimer { ticket, delay } => self.schedule_hold_timer(ticket, delay),
            Effect::CancelHoldTimer { ticket } => {
                if matches!(&self.hold_task, Some((armed, _)) if *armed == ticket) {
                    self.cancel_hold_timer();
                }
            }
            Effect::PlayTransition { kind, ticket } => {
                debug!(%kind, ?ticket, "playing transition");
                let done = TransitionDone::new(self.timer_tx.clone(), kind, ticket);
                self.presentation.play_transition(kind, done);
            }
            Effect::StartProgressTicks {
                generation,
                interval,
            } => self.start_progress_ticks(generation, interval),
            Effect::StopProgressTicks => self.stop_progress_ticks(),
            Effect::Progress(value) => self.presentation.on_progress_tick(value),
            Effect::Notify(event) => {
                debug!(%event, "notifying listener");
                self.listener.on_event(&event);
            }
        }
    }

    fn schedule_hold_timer(&mut self, ticket: Ticket, delay: Duration) {
        self.cancel_hold_timer();

        let tx = self.timer_tx.clone();
        let task = tokio::spawn(async move {
            sleep(delay).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Envelope::now(Input::HoldTimerFired { ticket }));
            }
        });

        self.hold_task = Some((ticket, task));
    }

    fn cancel_hold_timer(&mut self) {
        if let Some((ticket, task)) = self.hold_task.take() {
            debug!(?ticket, "hold timer cancelled");
            task.abort();
        }
    }

    fn start_progress_ticks(&mut self, generation: u64, period: Duration) {
        self.stop_progress_ticks();

        let tx = self.timer_tx.clone();
        self.progress_task = Some(tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let Some(tx) = tx.upgrade() else { break };
                if tx.send(Envelope::now(Input::ProgressTick { generation })).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop_progress_ticks(&mut self) {
        if let Some(task) = self.progress_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{CompletionReason, ControlEvent};
    use crate::presentation::TransitionKind;
    use std::sync::{Arc, Mutex};
    use tokio::sync::broadcast;

    /// Completes transitions immediately and records progress values
    #[derive(Clone, Default)]
    struct InstantPresentation {
        progress: Arc<Mutex<Vec<f64>>>,
        transitions: Arc<Mutex<Vec<TransitionKind>>>,
    }

    impl Presentation for InstantPresentation {
        fn play_transition(&mut self, kind: TransitionKind, done: TransitionDone) {
            self.transitions.lock().unwrap().push(kind);
            done.complete();
        }

        fn on_progress_tick(&mut self, progress_ms: f64) {
            self.progress.lock().unwrap().push(progress_ms);
        }
    }

    struct Harness {
        handle: ControllerHandle,
        events: broadcast::Receiver<ControlEvent>,
        presentation: InstantPresentation,
        task: JoinHandle<()>,
    }

    fn spawn_controller() -> Harness {
        let config = InteractionConfig::new(3_000, 10_000).unwrap();
        let presentation = InstantPresentation::default();
        let (event_tx, events) = broadcast::channel(16);
        let (controller, handle) = Controller::new(config, presentation.clone(), event_tx);
        let task = tokio::spawn(controller.run());

        Harness {
            handle,
            events,
            presentation,
            task,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_tap() {
        let mut h = spawn_controller();

        h.handle.press_start().unwrap();
        sleep(Duration::from_millis(200)).await;
        h.handle.press_end().unwrap();

        assert_eq!(h.events.recv().await.unwrap(), ControlEvent::Tap);
        h.handle.wait_for_state(InteractionState::Idle).await.unwrap();

        // The cancelled hold timer never fires
        sleep(Duration::from_secs(1)).await;
        assert!(h.events.try_recv().is_err());
        assert!(h.presentation.transitions.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_taps_in_a_row() {
        let mut h = spawn_controller();

        for _ in 0..2 {
            h.handle.press_start().unwrap();
            sleep(Duration::from_millis(100)).await;
            h.handle.press_end().unwrap();
            assert_eq!(h.events.recv().await.unwrap(), ControlEvent::Tap);
            sleep(Duration::from_millis(100)).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_recording_is_aborted() {
        let mut h = spawn_controller();

        h.handle.press_start().unwrap();
        sleep(Duration::from_millis(1_000)).await;
        assert_eq!(h.handle.state(), InteractionState::Recording);
        h.handle.press_end().unwrap();

        assert_eq!(h.events.recv().await.unwrap(), ControlEvent::HoldConfirmed);
        assert_eq!(
            h.events.recv().await.unwrap(),
            ControlEvent::RecordingAborted {
                required_min_ms: 3_000,
                recorded_ms: 500,
            }
        );
        h.handle.wait_for_state(InteractionState::Idle).await.unwrap();

        let progress = h.presentation.progress.lock().unwrap().clone();
        assert!(progress.windows(2).take(progress.len() - 2).all(|w| w[0] <= w[1]));
        assert_eq!(progress.last(), Some(&0.0));
        assert_eq!(
            *h.presentation.transitions.lock().unwrap(),
            vec![TransitionKind::Expand, TransitionKind::Collapse]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_long_recording_completes_on_release() {
        let mut h = spawn_controller();

        h.handle.press_start().unwrap();
        sleep(Duration::from_millis(4_000)).await;
        h.handle.press_end().unwrap();

        assert_eq!(h.events.recv().await.unwrap(), ControlEvent::HoldConfirmed);
        assert_eq!(
            h.events.recv().await.unwrap(),
            ControlEvent::RecordingCompleted {
                recorded_ms: 3_500,
                reason: CompletionReason::Released,
            }
        );
        h.handle.wait_for_state(InteractionState::Idle).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_duration_completes_without_release() {
        let mut h = spawn_controller();
        let started = Instant::now();

        h.handle.press_start().unwrap();

        assert_eq!(h.events.recv().await.unwrap(), ControlEvent::HoldConfirmed);
        assert_eq!(
            h.events.recv().await.unwrap(),
            ControlEvent::RecordingCompleted {
                recorded_ms: 10_000,
                reason: CompletionReason::MaxDurationReached,
            }
        );
        assert!(started.elapsed() >= Duration::from_millis(10_500));
        h.handle.wait_for_state(InteractionState::Idle).await.unwrap();

        // The real lift arrives afterwards and is absorbed quietly
        h.handle.press_end().unwrap();
        sleep(Duration::from_millis(50)).await;
        assert!(h.events.try_recv().is_err());
        assert_eq!(h.handle.state(), InteractionState::Idle);

        let progress = h.presentation.progress.lock().unwrap().clone();
        assert!(progress.contains(&10_000.0));
        assert_eq!(progress.last(), Some(&0.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_press_start_is_ignored() {
        let mut h = spawn_controller();

        h.handle.press_start().unwrap();
        h.handle.press_start().unwrap();
        sleep(Duration::from_millis(100)).await;
        h.handle.press_end().unwrap();

        assert_eq!(h.events.recv().await.unwrap(), ControlEvent::Tap);
        sleep(Duration::from_millis(600)).await;
        assert!(h.events.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ends_when_handles_drop() {
        let h = spawn_controller();
        h.handle.press_start().unwrap();
        sleep(Duration::from_millis(800)).await;

        drop(h.handle);
        tokio_test::assert_ok!(h.task.await);
    }
}
