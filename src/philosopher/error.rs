//! Error types for the Philosopher task.

use crate::model::StickId;
use thiserror::Error;

/// Faults that end a philosopher's loop in the `Errored` state.
///
/// Starvation is not an error: it is a designed outcome reported through
/// [`PhilosopherState::Starved`](crate::model::PhilosopherState::Starved).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PhilosopherError {
    /// Both bindings point at the same stick, so the philosopher could never eat.
    #[error("Both hands bound to stick {0}")]
    SameStick(StickId),

    /// A stick this philosopher acquired no longer names it as holder.
    #[error("Lost ownership of stick {stick}")]
    OwnershipLost { stick: StickId },

    /// The philosopher's loop panicked.
    #[error("Panicked: {0}")]
    Panicked(String),
}
