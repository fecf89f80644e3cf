//! # Sticks
//!
//! A [`Stick`] is the shared, mutually exclusive resource philosophers compete
//! for. Its whole state is a single `Option<Grip>` behind a `parking_lot::Mutex`
//! owned by that stick alone, so "is it free" and "who holds it" are always
//! read and written together and there is no lock spanning several sticks.

use crate::model::{PhilosopherId, StickId};
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Debug, Clone, Copy)]
struct Grip {
    holder: PhilosopherId,
    taken_at: Instant,
}

#[derive(Debug)]
pub struct Stick {
    id: StickId,
    grip: Mutex<Option<Grip>>,
}

impl Stick {
    pub fn new(id: StickId) -> Self {
        Self {
            id,
            grip: Mutex::new(None),
        }
    }

    pub fn id(&self) -> StickId {
        self.id
    }

    /// Takes the stick for `philosopher` if nobody holds it.
    ///
    /// Returns `false` without touching the stick when it is already held,
    /// including when `philosopher` itself is the holder.
    pub fn try_acquire(&self, philosopher: PhilosopherId) -> bool {
        let mut grip = self.grip.lock();
        if grip.is_some() {
            return false;
        }
        *grip = Some(Grip {
            holder: philosopher,
            taken_at: Instant::now(),
        });
        trace!(stick = %self.id, %philosopher, "Stick taken");
        true
    }

    /// Frees the stick regardless of who holds it. Releasing a free stick is a no-op.
    pub fn release(&self) {
        if let Some(grip) = self.grip.lock().take() {
            trace!(stick = %self.id, philosopher = %grip.holder, "Stick released");
        }
    }

    pub fn is_held_by(&self, philosopher: PhilosopherId) -> bool {
        matches!(*self.grip.lock(), Some(g) if g.holder == philosopher)
    }

    pub fn holder(&self) -> Option<PhilosopherId> {
        self.grip.lock().map(|g| g.holder)
    }

    pub fn is_free(&self) -> bool {
        self.grip.lock().is_none()
    }

    /// How long the current holder has had the stick; zero when free.
    pub fn usage_duration(&self) -> Duration {
        self.grip
            .lock()
            .map(|g| g.taken_at.elapsed())
            .unwrap_or(Duration::ZERO)
    }
}
