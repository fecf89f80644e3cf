//! Error types for simulation configuration.

use thiserror::Error;

/// Problems found while validating a [`SimulationConfig`](super::SimulationConfig).
///
/// These are the only process-fatal errors: they are raised before any
/// philosopher starts.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// A table needs at least one philosopher.
    #[error("At least one philosopher is required")]
    NoPhilosophers,

    /// Each philosopher needs two distinct sticks.
    #[error("At least two sticks are required, got {0}")]
    TooFewSticks(usize),

    /// A time range is empty, not positive, or too long to sleep for.
    #[error("Invalid {name} range: {min}s..={max}s")]
    InvalidRange {
        name: &'static str,
        min: f64,
        max: f64,
    },

    /// A timeout or backoff was zero.
    #[error("{0} must be positive")]
    ZeroDuration(&'static str),
}
