//! Philosopher lifecycle states and the finer-grained activities reported to sinks.

use crate::model::StickId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::time::Duration;

/// Coarse lifecycle state of a philosopher.
///
/// ```text
/// Starting -> Thinking -> AcquiringSticks -> Eating -> Thinking -> ...
///                              |
///                              +-> Starved
/// any non-terminal state -> Finished | Errored
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhilosopherState {
    Starting,
    Thinking,
    AcquiringSticks,
    Eating,
    /// Could not get both sticks before the starvation timeout.
    Starved,
    /// Stopped cooperatively after a stop request.
    Finished,
    /// An unexpected fault ended the philosopher's loop.
    Errored,
}

impl PhilosopherState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Starved | Self::Finished | Self::Errored)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Self::Starved | Self::Errored)
    }
}

impl Display for PhilosopherState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Starting => "Starting",
            Self::Thinking => "Thinking",
            Self::AcquiringSticks => "AcquiringSticks",
            Self::Eating => "Eating",
            Self::Starved => "Starved",
            Self::Finished => "Finished",
            Self::Errored => "Errored",
        };
        f.write_str(label)
    }
}

/// What a philosopher is doing right now, with enough detail for a status line.
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Starting,
    Thinking(Duration),
    TryingSticks,
    TookStick(StickId),
    ReleasedStick(StickId),
    /// Time spent waiting since the first attempt of this cycle.
    WaitingForSticks(Duration),
    FailedToGetSticks,
    Eating(Duration),
    Starved,
    Finished,
    Errored(String),
}

impl Activity {
    /// Lifecycle state this activity moves the philosopher into.
    ///
    /// Picking up or putting down a single stick does not change the state:
    /// it happens both while acquiring and when leaving the table after a meal.
    pub fn state(&self) -> Option<PhilosopherState> {
        let state = match self {
            Self::Starting => PhilosopherState::Starting,
            Self::Thinking(_) => PhilosopherState::Thinking,
            Self::TryingSticks | Self::WaitingForSticks(_) | Self::FailedToGetSticks => {
                PhilosopherState::AcquiringSticks
            }
            Self::Eating(_) => PhilosopherState::Eating,
            Self::Starved => PhilosopherState::Starved,
            Self::Finished => PhilosopherState::Finished,
            Self::Errored(_) => PhilosopherState::Errored,
            Self::TookStick(_) | Self::ReleasedStick(_) => return None,
        };
        Some(state)
    }
}

impl Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Starting => write!(f, "Starting"),
            Self::Thinking(d) => write!(f, "Thinking ({:.1}s)", d.as_secs_f64()),
            Self::TryingSticks => write!(f, "Trying to take sticks"),
            Self::TookStick(id) => write!(f, "Took stick {id}"),
            Self::ReleasedStick(id) => write!(f, "Released stick {id}"),
            Self::WaitingForSticks(d) => write!(f, "Waiting for sticks ({:.1}s)", d.as_secs_f64()),
            Self::FailedToGetSticks => write!(f, "Failed to get sticks"),
            Self::Eating(d) => write!(f, "Eating ({:.1}s)", d.as_secs_f64()),
            Self::Starved => write!(f, "Starved"),
            Self::Finished => write!(f, "Finished"),
            Self::Errored(reason) => write!(f, "Error: {reason}"),
        }
    }
}
