//! Error types for building and driving a [`Table`](super::Table).

use crate::config::ConfigError;
use crate::philosopher::PhilosopherError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TableError {
    /// The configuration was rejected before anything started.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A philosopher could not be seated with the sticks it was given.
    #[error("Invalid seating: {0}")]
    Seating(#[from] PhilosopherError),

    #[error("Philosophers already started")]
    AlreadyStarted,

    #[error("Philosophers not started")]
    NotStarted,
}
