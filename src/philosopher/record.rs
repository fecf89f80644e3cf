//! Shared, observable state of one philosopher.

use crate::model::{Color, PhilosopherId, PhilosopherReport, PhilosopherState, StickId};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Counters and state of a philosopher, readable by the table while the
/// philosopher task keeps updating them.
#[derive(Debug)]
pub struct PhilosopherRecord {
    id: PhilosopherId,
    name: String,
    color: Color,
    state: Mutex<(PhilosopherState, Instant)>,
    meals: AtomicU64,
    failed_attempts: AtomicU64,
    // Updated before a stick is released and after it is acquired, so this
    // is always a subset of what the philosopher really holds.
    held: Mutex<Vec<StickId>>,
}

impl PhilosopherRecord {
    pub fn new(id: PhilosopherId, name: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            state: Mutex::new((PhilosopherState::Starting, Instant::now())),
            meals: AtomicU64::new(0),
            failed_attempts: AtomicU64::new(0),
            held: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> PhilosopherId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn state(&self) -> PhilosopherState {
        self.state.lock().0
    }

    /// When the state last changed.
    pub fn last_state_change(&self) -> Instant {
        self.state.lock().1
    }

    pub fn meals(&self) -> u64 {
        self.meals.load(Ordering::Relaxed)
    }

    pub fn failed_attempts(&self) -> u64 {
        self.failed_attempts.load(Ordering::Relaxed)
    }

    /// Sticks the philosopher currently holds.
    pub fn held(&self) -> Vec<StickId> {
        self.held.lock().clone()
    }

    pub fn report(&self) -> PhilosopherReport {
        PhilosopherReport {
            id: self.id,
            name: self.name.clone(),
            state: self.state(),
            meals: self.meals(),
            failed_attempts: self.failed_attempts(),
        }
    }

    pub(crate) fn set_state(&self, state: PhilosopherState) {
        let mut current = self.state.lock();
        if current.0 != state {
            *current = (state, Instant::now());
        }
    }

    pub(crate) fn add_meal(&self) -> u64 {
        self.meals.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn add_failed_attempt(&self) -> u64 {
        self.failed_attempts.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn mark_held(&self, stick: StickId) {
        self.held.lock().push(stick);
    }

    pub(crate) fn unmark_held(&self, stick: StickId) {
        self.held.lock().retain(|s| *s != stick);
    }
}
