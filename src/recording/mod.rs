//! Recording progress timer

mod timer;

pub use timer::{RecordingTimer, Tick};
