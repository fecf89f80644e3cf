//! RAII ownership of the sticks a philosopher has picked up.

use crate::model::{PhilosopherId, StickId};
use crate::philosopher::{PhilosopherError, PhilosopherRecord};
use crate::stick::Stick;
use std::sync::Arc;
use tracing::warn;

/// The sticks one philosopher is holding.
///
/// Dropping `Hands` puts every stick back, so a philosopher task that panics
/// or is aborted mid-meal still leaves the table clean.
pub(crate) struct Hands {
    owner: PhilosopherId,
    record: Arc<PhilosopherRecord>,
    held: Vec<Arc<Stick>>,
}

impl Hands {
    pub(crate) fn new(record: Arc<PhilosopherRecord>) -> Self {
        Self {
            owner: record.id(),
            record,
            held: Vec::with_capacity(2),
        }
    }

    pub(crate) fn take(&mut self, stick: &Arc<Stick>) -> bool {
        if !stick.try_acquire(self.owner) {
            return false;
        }
        self.record.mark_held(stick.id());
        self.held.push(stick.clone());
        true
    }

    /// Puts down one stick. Fails if someone else now holds it; the stick is
    /// then left alone and forgotten.
    pub(crate) fn put(&mut self, stick: StickId) -> Result<(), PhilosopherError> {
        let Some(pos) = self.held.iter().position(|s| s.id() == stick) else {
            return Ok(());
        };
        let stick = self.held.swap_remove(pos);
        self.record.unmark_held(stick.id());
        if !stick.is_held_by(self.owner) {
            return Err(PhilosopherError::OwnershipLost { stick: stick.id() });
        }
        stick.release();
        Ok(())
    }

    /// Puts down every stick, returning the ids released in pick-up order.
    ///
    /// Every stick is handled even if one of them reports lost ownership; the
    /// first such fault is returned after the others have been released.
    pub(crate) fn put_all(&mut self) -> Result<Vec<StickId>, PhilosopherError> {
        let ids = self.held.iter().map(|s| s.id()).collect::<Vec<_>>();
        let mut fault = None;
        for id in &ids {
            if let Err(e) = self.put(*id) {
                fault.get_or_insert(e);
            }
        }
        match fault {
            Some(e) => Err(e),
            None => Ok(ids),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.held.len()
    }
}

impl Drop for Hands {
    fn drop(&mut self) {
        for stick in self.held.drain(..) {
            self.record.unmark_held(stick.id());
            if stick.is_held_by(self.owner) {
                warn!(philosopher = %self.owner, stick = %stick.id(), "Stick released on drop");
                stick.release();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Color;

    fn setup() -> (Arc<PhilosopherRecord>, Arc<Stick>, Arc<Stick>) {
        let record = Arc::new(PhilosopherRecord::new(PhilosopherId(7), "Kant", Color::Yellow));
        (
            record,
            Arc::new(Stick::new(StickId(0))),
            Arc::new(Stick::new(StickId(1))),
        )
    }

    #[test]
    fn take_and_put_track_the_record() {
        let (record, a, b) = setup();
        let mut hands = Hands::new(record.clone());
        assert!(hands.take(&a));
        assert!(hands.take(&b));
        assert_eq!(record.held(), vec![StickId(0), StickId(1)]);
        assert_eq!(hands.count(), 2);

        hands.put(StickId(0)).unwrap();
        assert!(a.is_free());
        assert_eq!(record.held(), vec![StickId(1)]);

        assert_eq!(hands.put_all().unwrap(), vec![StickId(1)]);
        assert!(b.is_free());
        assert!(record.held().is_empty());
    }

    #[test]
    fn cannot_take_a_held_stick() {
        let (record, a, _) = setup();
        assert!(a.try_acquire(PhilosopherId(99)));
        let mut hands = Hands::new(record.clone());
        assert!(!hands.take(&a));
        assert!(record.held().is_empty());
        assert_eq!(a.holder(), Some(PhilosopherId(99)));
    }

    #[test]
    fn drop_releases_everything() {
        let (record, a, b) = setup();
        {
            let mut hands = Hands::new(record.clone());
            assert!(hands.take(&a));
            assert!(hands.take(&b));
        }
        assert!(a.is_free());
        assert!(b.is_free());
        assert!(record.held().is_empty());
    }

    #[test]
    fn lost_ownership_is_reported_and_not_stolen_back() {
        let (record, a, b) = setup();
        let mut hands = Hands::new(record.clone());
        assert!(hands.take(&a));
        assert!(hands.take(&b));

        // Someone frees stick 0 behind our back and a neighbour takes it.
        a.release();
        assert!(a.try_acquire(PhilosopherId(8)));

        assert_eq!(
            hands.put_all(),
            Err(PhilosopherError::OwnershipLost { stick: StickId(0) })
        );
        assert_eq!(a.holder(), Some(PhilosopherId(8)));
        assert!(b.is_free());
        assert_eq!(hands.count(), 0);
    }
}
