//! Host-facing listener interface

use tokio::sync::broadcast;
use tracing::trace;

use super::ControlEvent;

/// Receives control events on the controller task.
///
/// Implement the specific callbacks, or override [`on_event`](Self::on_event)
/// to receive every event in one place.
pub trait InteractionListener: Send {
    /// Short press
    fn on_tap(&mut self) {}

    /// Hold threshold crossed; a good moment to start capture
    fn on_hold_confirmed(&mut self) {}

    /// Released too early, `required_min_ms` is the configured minimum
    fn on_recording_aborted(&mut self, required_min_ms: u64) {
        let _ = required_min_ms;
    }

    /// Recording ended successfully
    fn on_recording_completed(&mut self) {}

    /// Dispatch an event to the matching callback
    fn on_event(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::Tap => self.on_tap(),
            ControlEvent::HoldConfirmed => self.on_hold_confirmed(),
            ControlEvent::RecordingAborted {
                required_min_ms, ..
            } => self.on_recording_aborted(*required_min_ms),
            ControlEvent::RecordingCompleted { .. } => self.on_recording_completed(),
        }
    }
}

/// Fan events out to any number of subscribers
impl InteractionListener for broadcast::Sender<ControlEvent> {
    fn on_event(&mut self, event: &ControlEvent) {
        if self.send(event.clone()).is_err() {
            trace!(%event, "no event subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::CompletionReason;

    #[derive(Default)]
    struct Counting {
        taps: usize,
        holds: usize,
        aborted: Vec<u64>,
        completed: usize,
    }

    impl InteractionListener for Counting {
        fn on_tap(&mut self) {
            self.taps += 1;
        }

        fn on_hold_confirmed(&mut self) {
            self.holds += 1;
        }

        fn on_recording_aborted(&mut self, required_min_ms: u64) {
            self.aborted.push(required_min_ms);
        }

        fn on_recording_completed(&mut self) {
            self.completed += 1;
        }
    }

    #[test]
    fn test_dispatch_to_callbacks() {
        let mut listener = Counting::default();
        listener.on_event(&ControlEvent::Tap);
        listener.on_event(&ControlEvent::HoldConfirmed);
        listener.on_event(&ControlEvent::RecordingAborted {
            required_min_ms: 3000,
            recorded_ms: 10,
        });
        listener.on_event(&ControlEvent::RecordingCompleted {
            recorded_ms: 4000,
            reason: CompletionReason::Released,
        });

        assert_eq!(listener.taps, 1);
        assert_eq!(listener.holds, 1);
        assert_eq!(listener.aborted, vec![3000]);
        assert_eq!(listener.completed, 1);
    }

    #[test]
    fn test_broadcast_listener() {
        let (mut tx, mut rx) = broadcast::channel(4);
        tx.on_event(&ControlEvent::Tap);
        assert_eq!(rx.try_recv().unwrap(), ControlEvent::Tap);
    }

    #[test]
    fn test_broadcast_without_subscribers() {
        let (mut tx, rx) = broadcast::channel::<ControlEvent>(4);
        drop(rx);
        tx.on_event(&ControlEvent::HoldConfirmed);
    }
}
