//! Interaction timing configuration
//!
//! All thresholds are fixed at construction and validated once, so the
//! state machine never has to re-check them at runtime.

use std::time::Duration;

use crate::error::ConfigError;

/// How long the pointer must stay down before a press counts as a hold
pub const MIN_HOLD_DURATION: Duration = Duration::from_millis(500);

/// Length of the expand and collapse transitions
pub const TRANSITION_DURATION: Duration = Duration::from_millis(150);

/// Default minimum recording length for a recording to count
pub const DEFAULT_MIN_RECORD_MS: u64 = 3_000;

/// Default total recording length
pub const DEFAULT_MAX_RECORD_MS: u64 = 10_000;

/// Default cadence of progress updates (roughly one per frame at 60 Hz)
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

const ENV_MIN_RECORD_MS: &str = "HOLDREC_MIN_RECORD_MS";
const ENV_MAX_RECORD_MS: &str = "HOLDREC_MAX_RECORD_MS";
const ENV_TICK_INTERVAL_MS: &str = "HOLDREC_TICK_INTERVAL_MS";

/// Timing thresholds for one control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionConfig {
    /// Hold confirmation threshold
    min_hold: Duration,

    /// Shortest recording that is reported as completed
    min_record: Duration,

    /// Recording stops by itself once this much time has elapsed
    max_record: Duration,

    /// Duration of each cosmetic transition
    transition: Duration,

    /// Interval between progress updates while recording
    tick_interval: Duration,
}

impl InteractionConfig {
    /// Build a configuration with the given recording bounds
    pub fn new(min_record_ms: u64, max_record_ms: u64) -> Result<Self, ConfigError> {
        Self::with_tick_interval(min_record_ms, max_record_ms, DEFAULT_TICK_INTERVAL_MS)
    }

    /// Build a configuration with an explicit progress cadence
    pub fn with_tick_interval(
        min_record_ms: u64,
        max_record_ms: u64,
        tick_interval_ms: u64,
    ) -> Result<Self, ConfigError> {
        if max_record_ms == 0 {
            return Err(ConfigError::ZeroMaxDuration);
        }
        if min_record_ms > max_record_ms {
            return Err(ConfigError::MinExceedsMax {
                min_ms: min_record_ms,
                max_ms: max_record_ms,
            });
        }
        if tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }

        Ok(Self {
            min_hold: MIN_HOLD_DURATION,
            min_record: Duration::from_millis(min_record_ms),
            max_record: Duration::from_millis(max_record_ms),
            transition: TRANSITION_DURATION,
            tick_interval: Duration::from_millis(tick_interval_ms),
        })
    }

    /// Load configuration from environment overrides and defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let min = read_millis(&lookup, ENV_MIN_RECORD_MS, DEFAULT_MIN_RECORD_MS)?;
        let max = read_millis(&lookup, ENV_MAX_RECORD_MS, DEFAULT_MAX_RECORD_MS)?;
        let tick = read_millis(&lookup, ENV_TICK_INTERVAL_MS, DEFAULT_TICK_INTERVAL_MS)?;
        Self::with_tick_interval(min, max, tick)
    }

    /// Hold confirmation threshold
    pub fn min_hold(&self) -> Duration {
        self.min_hold
    }

    /// Shortest recording that is reported as completed
    pub fn min_record(&self) -> Duration {
        self.min_record
    }

    /// Recording stops by itself once this much time has elapsed
    pub fn max_record(&self) -> Duration {
        self.max_record
    }

    /// Duration of each cosmetic transition
    pub fn transition(&self) -> Duration {
        self.transition
    }

    /// Interval between progress updates while recording
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Maximum recording length in whole milliseconds
    pub fn max_record_ms(&self) -> u64 {
        self.max_record.as_millis() as u64
    }

    /// Minimum recording length in whole milliseconds, as reported to listeners
    pub fn min_record_ms(&self) -> u64 {
        self.min_record.as_millis() as u64
    }

    /// Maximum recording length in milliseconds as a progress bound
    pub fn max_progress(&self) -> f64 {
        self.max_record.as_secs_f64() * 1000.0
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            min_hold: MIN_HOLD_DURATION,
            min_record: Duration::from_millis(DEFAULT_MIN_RECORD_MS),
            max_record: Duration::from_millis(DEFAULT_MAX_RECORD_MS),
            transition: TRANSITION_DURATION,
            tick_interval: Duration::from_millis(DEFAULT_TICK_INTERVAL_MS),
        }
    }
}

fn read_millis<F>(lookup: &F, var: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { var, value: raw }),
    }
}
