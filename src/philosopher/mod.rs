//! # Philosophers
//!
//! A [`Philosopher`] is one long-lived Tokio task cycling through
//! think → acquire both sticks → eat → release, until it is asked to stop,
//! starves, or hits a fault.
//!
//! ## Acquisition Protocol
//!
//! 1. Order the two bound sticks by [`StickId`]. Every philosopher picks up the
//!    smaller id first, so no cycle of "holds one, waits for the next" can form.
//! 2. Try the first stick. If it is taken, the attempt fails holding nothing.
//! 3. Try the second stick. If it is taken, put the first one back immediately.
//! 4. A failed attempt bumps `failed_attempts` and waits `retry_backoff` before
//!    the next try. If `starvation_timeout` has passed since the first attempt of
//!    this cycle, the philosopher gives up as [`Starved`](PhilosopherState::Starved).
//!
//! None of these steps await while holding a single stick: the only suspension
//! point with sticks in hand is the meal itself.
//!
//! ## Exit Paths
//!
//! | Cause | Final state |
//! |-------|-------------|
//! | stop signal | `Finished` |
//! | starvation timeout | `Starved` |
//! | [`PhilosopherError`] or panic | `Errored` |
//!
//! Sticks are put down before the final status update on every path. If the task
//! is aborted instead, dropping the guard that tracks its held sticks puts them down.

mod hands;
pub mod error;
pub mod record;

pub use error::*;
pub use record::*;

use crate::config::Timing;
use crate::model::{Activity, Color, PhilosopherId, PhilosopherState, StatusUpdate, StickId};
use crate::status::StatusSink;
use crate::stick::Stick;
use futures::FutureExt;
use hands::Hands;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Who sits at a seat.
#[derive(Debug, Clone, PartialEq)]
pub struct Seat {
    pub id: PhilosopherId,
    pub name: String,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Stopped,
    Starved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Acquire {
    Seated,
    Starved,
    Interrupted,
}

pub struct Philosopher {
    record: Arc<PhilosopherRecord>,
    left: Arc<Stick>,
    right: Arc<Stick>,
    timing: Timing,
    rng: StdRng,
    stop: watch::Receiver<bool>,
    sink: Arc<dyn StatusSink>,
}

impl Philosopher {
    /// Seats a philosopher between `left` and `right`.
    ///
    /// The stop receiver ends the loop once it reads `true`. Dropping its sender
    /// counts as a stop request too.
    pub fn new(
        seat: Seat,
        left: Arc<Stick>,
        right: Arc<Stick>,
        timing: Timing,
        stop: watch::Receiver<bool>,
        sink: Arc<dyn StatusSink>,
    ) -> Result<Self, PhilosopherError> {
        if left.id() == right.id() {
            return Err(PhilosopherError::SameStick(left.id()));
        }
        Ok(Self {
            record: Arc::new(PhilosopherRecord::new(seat.id, seat.name, seat.color)),
            left,
            right,
            timing,
            rng: StdRng::from_entropy(),
            stop,
            sink,
        })
    }

    /// Makes think and eat durations reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn id(&self) -> PhilosopherId {
        self.record.id()
    }

    /// Handle to the counters and state, still valid after [`run`](Self::run) consumed `self`.
    pub fn record(&self) -> Arc<PhilosopherRecord> {
        self.record.clone()
    }

    /// Bound sticks, smallest id first: the order they are always picked up in.
    pub fn pickup_order(&self) -> (StickId, StickId) {
        let (first, second) = self.ordered_sticks();
        (first.id(), second.id())
    }

    /// Runs the philosopher until it reaches a terminal state and returns that state.
    pub async fn run(mut self) -> PhilosopherState {
        let span = info_span!("philosopher", id = %self.record.id(), name = %self.record.name());
        async move {
            self.announce(Activity::Starting);
            info!(timing = ?self.timing, "Seated");

            let mut hands = Hands::new(self.record.clone());
            let outcome = AssertUnwindSafe(self.dine(&mut hands))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(PhilosopherError::Panicked(panic_message(&*panic))));

            let outcome = match (outcome, self.put_down(&mut hands)) {
                (Ok(exit), Ok(())) => Ok(exit),
                (Err(e), _) | (Ok(_), Err(e)) => Err(e),
            };

            let activity = match outcome {
                Ok(Exit::Stopped) => {
                    info!(meals = self.record.meals(), "Finished");
                    Activity::Finished
                }
                Ok(Exit::Starved) => {
                    warn!(
                        meals = self.record.meals(),
                        failed_attempts = self.record.failed_attempts(),
                        timeout_ms = self.timing.starvation_timeout.as_millis() as u64,
                        "Starved"
                    );
                    Activity::Starved
                }
                Err(e) => {
                    error!(error = %e, "Philosopher failed");
                    Activity::Errored(e.to_string())
                }
            };
            self.announce(activity);
            self.record.state()
        }
        .instrument(span)
        .await
    }

    async fn dine(&mut self, hands: &mut Hands) -> Result<Exit, PhilosopherError> {
        loop {
            if self.stop_requested() {
                return Ok(Exit::Stopped);
            }

            let think = self.timing.think.sample(&mut self.rng);
            self.announce(Activity::Thinking(think));
            if !self.pause(think).await {
                return Ok(Exit::Stopped);
            }

            match self.acquire(hands).await? {
                Acquire::Seated => {}
                Acquire::Starved => return Ok(Exit::Starved),
                Acquire::Interrupted => return Ok(Exit::Stopped),
            }

            let eat = self.timing.eat.sample(&mut self.rng);
            self.announce(Activity::Eating(eat));
            let full = self.pause(eat).await;
            self.put_down(hands)?;
            if !full {
                // Interrupted meals do not count.
                return Ok(Exit::Stopped);
            }
            let meals = self.record.add_meal();
            debug!(meals, "Meal done");
        }
    }

    /// Retries until both sticks are in hand, the deadline passes, or a stop arrives.
    async fn acquire(&mut self, hands: &mut Hands) -> Result<Acquire, PhilosopherError> {
        self.announce(Activity::TryingSticks);
        let started = Instant::now();
        let timeout = self.timing.starvation_timeout;

        loop {
            if self.stop_requested() {
                return Ok(Acquire::Interrupted);
            }
            if self.try_take_both(hands)? {
                return Ok(Acquire::Seated);
            }

            let failed_attempts = self.record.add_failed_attempt();
            let waited = started.elapsed();
            if waited >= timeout {
                self.announce(Activity::FailedToGetSticks);
                return Ok(Acquire::Starved);
            }
            debug!(failed_attempts, waited_ms = waited.as_millis() as u64, "Sticks busy");
            self.announce(Activity::WaitingForSticks(waited));

            let backoff = self.timing.retry_backoff.min(timeout - waited);
            if !self.pause(backoff).await {
                return Ok(Acquire::Interrupted);
            }
        }
    }

    /// One attempt at both sticks. Never returns holding exactly one.
    fn try_take_both(&self, hands: &mut Hands) -> Result<bool, PhilosopherError> {
        let (first, second) = self.ordered_sticks();

        if !hands.take(first) {
            return Ok(false);
        }
        self.announce(Activity::TookStick(first.id()));

        if hands.take(second) {
            self.announce(Activity::TookStick(second.id()));
            return Ok(true);
        }

        hands.put(first.id())?;
        self.announce(Activity::ReleasedStick(first.id()));
        Ok(false)
    }

    fn put_down(&self, hands: &mut Hands) -> Result<(), PhilosopherError> {
        for stick in hands.put_all()? {
            self.announce(Activity::ReleasedStick(stick));
        }
        Ok(())
    }

    fn ordered_sticks(&self) -> (&Arc<Stick>, &Arc<Stick>) {
        if self.left.id() < self.right.id() {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        }
    }

    fn stop_requested(&self) -> bool {
        *self.stop.borrow()
    }

    /// Sleeps for `duration` unless a stop arrives first. Returns `false` on stop.
    ///
    /// A stop that is already visible when the sleep ends wins.
    async fn pause(&mut self, duration: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.stop.wait_for(|stop| *stop) => false,
            _ = tokio::time::sleep(duration) => true,
        }
    }

    fn announce(&self, activity: Activity) {
        if let Some(state) = activity.state() {
            self.record.set_state(state);
        }
        self.sink.publish(&StatusUpdate {
            philosopher: self.record.id(),
            name: self.record.name().to_string(),
            color: self.record.color(),
            state: self.record.state(),
            activity,
            meals: self.record.meals(),
            failed_attempts: self.record.failed_attempts(),
        });
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
