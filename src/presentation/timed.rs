//! Reference presentation that tweens radii on a timer
//!
//! Publishes a [`Snapshot`] on a watch channel for every frame; whatever
//! draws the button subscribes and renders the latest one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tracing::trace;

use super::geometry::{sweep_degrees, ButtonGeometry, Snapshot};
use super::{Presentation, TransitionDone, TransitionKind};
use crate::config::InteractionConfig;

/// Tweened radii plus progress sweep, published as snapshots
pub struct TimedPresentation {
    geometry: ButtonGeometry,
    duration: Duration,
    frame_interval: Duration,
    max_progress: f64,
    frames: Arc<watch::Sender<Snapshot>>,
}

impl TimedPresentation {
    pub fn new(config: &InteractionConfig, geometry: ButtonGeometry) -> Self {
        let initial = Snapshot {
            radii: geometry.resting(),
            sweep_degrees: 0.0,
        };
        let (frames, _) = watch::channel(initial);

        Self {
            geometry,
            duration: config.transition(),
            frame_interval: config.tick_interval(),
            max_progress: config.max_progress(),
            frames: Arc::new(frames),
        }
    }

    /// Receive every published frame
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.frames.subscribe()
    }

    /// Latest frame
    pub fn snapshot(&self) -> Snapshot {
        *self.frames.borrow()
    }
}

impl Presentation for TimedPresentation {
    fn play_transition(&mut self, kind: TransitionKind, done: TransitionDone) {
        let (from, to) = self.geometry.endpoints(kind);
        let frames = Arc::clone(&self.frames);
        let duration = self.duration;
        let frame_interval = self.frame_interval;

        trace!(%kind, ?from, ?to, "transition started");

        tokio::spawn(async move {
            let started = Instant::now();
            let mut frame = interval(frame_interval);
            frame.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                frame.tick().await;
                let t = if duration.is_zero() {
                    1.0
                } else {
                    (started.elapsed().as_secs_f32() / duration.as_secs_f32()).min(1.0)
                };
                frames.send_modify(|snapshot| snapshot.radii = from.lerp(to, t));
                if t >= 1.0 {
                    break;
                }
            }

            trace!(%kind, "transition finished");
            done.complete();
        });
    }

    fn on_progress_tick(&mut self, progress_ms: f64) {
        let sweep = sweep_degrees(progress_ms, self.max_progress);
        self.frames
            .send_modify(|snapshot| snapshot.sweep_degrees = sweep);
    }
}
