//! # Recording Sink
//!
//! [`RecordingSink`] keeps every published [`StatusUpdate`] in memory so tests can
//! assert on the exact sequence of activities a philosopher went through,
//! without parsing console output.
//!
//! ```rust
//! use dining_table::model::{Activity, Color, PhilosopherId, PhilosopherState, StatusUpdate};
//! use dining_table::status::{mock::RecordingSink, StatusSink};
//!
//! let sink = RecordingSink::new();
//! sink.publish(&StatusUpdate {
//!     philosopher: PhilosopherId(0),
//!     name: "Platon".into(),
//!     color: Color::Blue,
//!     state: PhilosopherState::Starting,
//!     activity: Activity::Starting,
//!     meals: 0,
//!     failed_attempts: 0,
//! });
//! assert_eq!(sink.activities_of(PhilosopherId(0)), vec![Activity::Starting]);
//! ```

use crate::model::{Activity, PhilosopherId, StatusUpdate};
use crate::status::StatusSink;
use parking_lot::Mutex;

#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<StatusUpdate>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<StatusUpdate> {
        self.updates.lock().clone()
    }

    pub fn activities_of(&self, philosopher: PhilosopherId) -> Vec<Activity> {
        self.updates
            .lock()
            .iter()
            .filter(|u| u.philosopher == philosopher)
            .map(|u| u.activity.clone())
            .collect()
    }

    pub fn last_of(&self, philosopher: PhilosopherId) -> Option<StatusUpdate> {
        self.updates
            .lock()
            .iter()
            .rev()
            .find(|u| u.philosopher == philosopher)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.updates.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.lock().is_empty()
    }
}

impl StatusSink for RecordingSink {
    fn publish(&self, update: &StatusUpdate) {
        self.updates.lock().push(update.clone());
    }
}
