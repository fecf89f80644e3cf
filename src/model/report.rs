use crate::model::{PhilosopherId, PhilosopherState};
use serde::Serialize;
use std::time::Duration;

/// Final numbers for one philosopher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhilosopherReport {
    pub id: PhilosopherId,
    pub name: String,
    pub state: PhilosopherState,
    pub meals: u64,
    pub failed_attempts: u64,
}

/// Outcome of a whole run, as returned by [`Table::await_completion`](crate::lifecycle::Table::await_completion).
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    #[serde(serialize_with = "as_secs")]
    pub elapsed: Duration,
    pub philosophers: Vec<PhilosopherReport>,
    pub total_meals: u64,
    pub total_failed_attempts: u64,
    /// Philosophers whose task did not stop within the grace period and was aborted.
    pub unresponsive: Vec<PhilosopherId>,
}

impl RunSummary {
    pub fn new(
        elapsed: Duration,
        philosophers: Vec<PhilosopherReport>,
        unresponsive: Vec<PhilosopherId>,
    ) -> Self {
        let total_meals = philosophers.iter().map(|p| p.meals).sum();
        let total_failed_attempts = philosophers.iter().map(|p| p.failed_attempts).sum();
        Self {
            elapsed,
            philosophers,
            total_meals,
            total_failed_attempts,
            unresponsive,
        }
    }

    pub fn starved(&self) -> impl Iterator<Item = &PhilosopherReport> {
        self.philosophers
            .iter()
            .filter(|p| p.state == PhilosopherState::Starved)
    }
}

fn as_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
