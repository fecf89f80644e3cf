//! Simulation configuration.
//!
//! [`SimulationConfig::default`] reproduces the classic setup: five philosophers
//! around five sticks, thinking 0.5–2.0 s, eating 0.5–1.0 s, starving after 15 s
//! without both sticks and retrying once per second.

pub mod error;

pub use error::*;

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Names handed out in seat order. Seats beyond the roster reuse it with a suffix.
pub const DEFAULT_ROSTER: [&str; 5] = ["Platon", "Aristoteles", "Sokrates", "Kant", "Hegel"];

/// Inclusive range of seconds a phase may last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl TimeRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Draws a duration uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_secs_f64(rng.gen_range(self.min_secs..=self.max_secs))
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let ok = self.min_secs.is_finite()
            && self.max_secs.is_finite()
            && self.min_secs > 0.0
            && self.min_secs <= self.max_secs
            && Duration::try_from_secs_f64(self.max_secs).is_ok();
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                name,
                min: self.min_secs,
                max: self.max_secs,
            })
        }
    }
}

/// Per-philosopher timing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timing {
    pub think: TimeRange,
    pub eat: TimeRange,
    /// Longest a philosopher may go without getting both sticks, measured from
    /// the first attempt of the current cycle.
    pub starvation_timeout: Duration,
    /// Pause between two failed acquisition attempts.
    pub retry_backoff: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            think: TimeRange::new(0.5, 2.0),
            eat: TimeRange::new(0.5, 1.0),
            starvation_timeout: Duration::from_millis(15_000),
            retry_backoff: Duration::from_millis(1_000),
        }
    }
}

impl Timing {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.think.validate("thinking")?;
        self.eat.validate("eating")?;
        if self.starvation_timeout.is_zero() {
            return Err(ConfigError::ZeroDuration("starvation timeout"));
        }
        if self.retry_backoff.is_zero() {
            return Err(ConfigError::ZeroDuration("retry backoff"));
        }
        Ok(())
    }
}

/// Everything the [`Table`](crate::lifecycle::Table) needs to lay out a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub philosophers: usize,
    /// Number of sticks in the ring; `None` means one per philosopher.
    pub sticks: Option<usize>,
    pub timing: Timing,
    /// Seed for reproducible think/eat durations. Philosopher `i` uses `seed + i`.
    pub seed: Option<u64>,
    /// Display names in seat order; empty means [`DEFAULT_ROSTER`].
    pub names: Vec<String>,
    /// How long to wait for philosophers to stop before aborting them.
    pub shutdown_grace: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            philosophers: 5,
            sticks: None,
            timing: Timing::default(),
            seed: None,
            names: Vec::new(),
            shutdown_grace: Duration::from_secs(5),
        }
    }
}

impl SimulationConfig {
    pub fn stick_count(&self) -> usize {
        self.sticks.unwrap_or(self.philosophers)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.philosophers == 0 {
            return Err(ConfigError::NoPhilosophers);
        }
        let sticks = self.stick_count();
        if sticks < 2 {
            return Err(ConfigError::TooFewSticks(sticks));
        }
        if self.shutdown_grace.is_zero() {
            return Err(ConfigError::ZeroDuration("shutdown grace"));
        }
        self.timing.validate()
    }

    /// Display name for the philosopher at `seat`.
    pub fn name_for(&self, seat: usize) -> String {
        if let Some(name) = self.names.get(seat) {
            return name.clone();
        }
        let base = DEFAULT_ROSTER[seat % DEFAULT_ROSTER.len()];
        match seat / DEFAULT_ROSTER.len() {
            0 => base.to_string(),
            round => format!("{base} {}", round + 1),
        }
    }
}
