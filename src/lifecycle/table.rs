use crate::config::SimulationConfig;
use crate::lifecycle::TableError;
use crate::model::{Color, PhilosopherId, PhilosopherState, RunSummary, StickId};
use crate::philosopher::{Philosopher, PhilosopherRecord, Seat};
use crate::status::StatusSink;
use crate::stick::Stick;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// The host of a simulation run.
///
/// `Table` is responsible for:
/// - **Topology**: sticks `0..M` in a ring, philosopher `i` between sticks `i` and `(i + 1) mod M`
/// - **Lifecycle**: spawning one Tokio task per philosopher and joining them
/// - **Cancellation**: owning the single stop signal every philosopher watches
/// - **Reporting**: aggregating per-philosopher outcomes into a [`RunSummary`]
///
/// # Example
///
/// ```no_run
/// use dining_table::config::SimulationConfig;
/// use dining_table::lifecycle::Table;
/// use dining_table::status::ConsoleSink;
/// use std::sync::Arc;
///
/// # async fn demo() -> Result<(), dining_table::lifecycle::TableError> {
/// let table = Table::new(SimulationConfig::default(), Arc::new(ConsoleSink::stdout()))?;
/// let summary = table.run_until(tokio::time::sleep(std::time::Duration::from_secs(10))).await?;
/// println!("{} meals", summary.total_meals);
/// # Ok(())
/// # }
/// ```
pub struct Table {
    config: SimulationConfig,
    sticks: Vec<Arc<Stick>>,
    records: Vec<Arc<PhilosopherRecord>>,
    /// Philosophers waiting for [`start_all`](Self::start_all).
    seated: Vec<Philosopher>,
    stop: watch::Sender<bool>,
    tasks: JoinSet<(PhilosopherId, PhilosopherState)>,
    exits: HashMap<PhilosopherId, PhilosopherState>,
    started_at: Option<Instant>,
}

impl Table {
    /// Lays out sticks and philosophers. Nothing runs until [`start_all`](Self::start_all).
    ///
    /// Fails before any task exists if the configuration is invalid.
    pub fn new(config: SimulationConfig, sink: Arc<dyn StatusSink>) -> Result<Self, TableError> {
        config.validate()?;

        let stick_count = config.stick_count();
        let sticks = (0..stick_count)
            .map(|i| Arc::new(Stick::new(StickId(i))))
            .collect::<Vec<_>>();

        let (stop, stop_rx) = watch::channel(false);
        let mut seated = Vec::with_capacity(config.philosophers);
        for i in 0..config.philosophers {
            let seat = Seat {
                id: PhilosopherId(i),
                name: config.name_for(i),
                color: Color::for_seat(i),
            };
            let left = sticks[i % stick_count].clone();
            let right = sticks[(i + 1) % stick_count].clone();
            let mut philosopher = Philosopher::new(
                seat,
                left,
                right,
                config.timing,
                stop_rx.clone(),
                sink.clone(),
            )?;
            if let Some(seed) = config.seed {
                philosopher = philosopher.with_seed(seed.wrapping_add(i as u64));
            }
            seated.push(philosopher);
        }

        info!(
            philosophers = config.philosophers,
            sticks = stick_count,
            "Table set"
        );
        Ok(Self {
            records: seated.iter().map(Philosopher::record).collect(),
            config,
            sticks,
            seated,
            stop,
            tasks: JoinSet::new(),
            exits: HashMap::new(),
            started_at: None,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn sticks(&self) -> &[Arc<Stick>] {
        &self.sticks
    }

    pub fn records(&self) -> &[Arc<PhilosopherRecord>] {
        &self.records
    }

    /// Sticks bound to each philosopher, in seat order, as (left, right).
    pub fn bindings(&self) -> Vec<(StickId, StickId)> {
        let m = self.sticks.len();
        (0..self.records.len())
            .map(|i| (StickId(i % m), StickId((i + 1) % m)))
            .collect()
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn stop_requested(&self) -> bool {
        *self.stop.borrow()
    }

    /// Spawns every philosopher on the Tokio runtime.
    pub fn start_all(&mut self) -> Result<(), TableError> {
        if self.is_started() {
            return Err(TableError::AlreadyStarted);
        }
        self.started_at = Some(Instant::now());
        for philosopher in self.seated.drain(..) {
            let id = philosopher.id();
            self.tasks.spawn(async move { (id, philosopher.run().await) });
        }
        info!(count = self.tasks.len(), "Philosophers started");
        Ok(())
    }

    /// Asks every philosopher to stop at its next suspension point.
    ///
    /// Only the first call flips the signal; it returns `true` for that call.
    pub fn request_stop(&self) -> bool {
        let first = self.stop.send_if_modified(|stop| {
            if *stop {
                false
            } else {
                *stop = true;
                true
            }
        });
        if first {
            info!("Stop requested");
        }
        first
    }

    /// Waits until every philosopher is in a terminal state.
    ///
    /// Cancel safe: dropping this future loses no exits.
    pub async fn wait_all(&mut self) {
        while let Some(joined) = self.tasks.join_next().await {
            self.record_exit(joined);
        }
    }

    /// Waits up to `timeout` for every philosopher task to end, then aborts the rest.
    ///
    /// Does not request a stop by itself; call [`request_stop`](Self::request_stop)
    /// first for a cooperative shutdown. Aborted philosophers still put their
    /// sticks down and are listed as `unresponsive` in the summary.
    pub async fn await_completion(&mut self, timeout: Duration) -> Result<RunSummary, TableError> {
        if !self.is_started() {
            return Err(TableError::NotStarted);
        }

        if tokio::time::timeout(timeout, self.wait_all()).await.is_err() {
            warn!(
                pending = self.tasks.len(),
                timeout_ms = timeout.as_millis() as u64,
                "Philosophers did not stop in time, aborting"
            );
            self.tasks.abort_all();
            while let Some(joined) = self.tasks.join_next().await {
                self.record_exit(joined);
            }
        }

        let summary = self.summary();
        info!(
            total_meals = summary.total_meals,
            total_failed_attempts = summary.total_failed_attempts,
            starved = summary.starved().count(),
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "Run complete"
        );
        Ok(summary)
    }

    /// Starts the philosophers if needed and runs until they have all reached a
    /// terminal state or `stop` resolves, then stops and joins them within the
    /// configured shutdown grace.
    pub async fn run_until<F>(mut self, stop: F) -> Result<RunSummary, TableError>
    where
        F: Future<Output = ()>,
    {
        if !self.is_started() {
            self.start_all()?;
        }

        tokio::select! {
            _ = self.wait_all() => info!("Every philosopher has left the table"),
            _ = stop => info!("External stop"),
        }

        self.request_stop();
        let grace = self.config.shutdown_grace;
        self.await_completion(grace).await
    }

    /// Current numbers, whether or not the run is over.
    pub fn summary(&self) -> RunSummary {
        let elapsed = self
            .started_at
            .map(|t| t.elapsed())
            .unwrap_or(Duration::ZERO);
        let unresponsive = if self.tasks.is_empty() && self.is_started() {
            self.records
                .iter()
                .map(|r| r.id())
                .filter(|id| !self.exits.contains_key(id))
                .collect()
        } else {
            Vec::new()
        };
        RunSummary::new(
            elapsed,
            self.records.iter().map(|r| r.report()).collect(),
            unresponsive,
        )
    }

    fn record_exit(&mut self, joined: Result<(PhilosopherId, PhilosopherState), JoinError>) {
        match joined {
            Ok((id, state)) => {
                debug!(philosopher = %id, %state, "Philosopher left the table");
                self.exits.insert(id, state);
            }
            Err(e) if e.is_cancelled() => debug!("Philosopher task aborted"),
            Err(e) => error!(error = %e, "Philosopher task failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TimeRange, Timing};
    use crate::status::NullSink;

    fn config(philosophers: usize) -> SimulationConfig {
        SimulationConfig {
            philosophers,
            timing: Timing {
                think: TimeRange::new(0.001, 0.005),
                eat: TimeRange::new(0.001, 0.005),
                starvation_timeout: Duration::from_secs(5),
                retry_backoff: Duration::from_millis(5),
            },
            seed: Some(42),
            shutdown_grace: Duration::from_secs(2),
            ..Default::default()
        }
    }

    #[test]
    fn builds_a_ring() {
        let table = Table::new(config(5), Arc::new(NullSink)).unwrap();
        assert_eq!(table.sticks().len(), 5);
        assert_eq!(table.records().len(), 5);
        assert_eq!(
            table.bindings(),
            vec![
                (StickId(0), StickId(1)),
                (StickId(1), StickId(2)),
                (StickId(2), StickId(3)),
                (StickId(3), StickId(4)),
                (StickId(4), StickId(0)),
            ]
        );
        assert_eq!(table.records()[0].name(), "Platon");
        assert_eq!(table.records()[4].name(), "Hegel");
        assert!(table
            .records()
            .iter()
            .all(|r| r.state() == PhilosopherState::Starting));
        assert!(table.sticks().iter().all(|s| s.is_free()));
    }

    #[test]
    fn fails_fast_on_bad_config() {
        let result = Table::new(config(0), Arc::new(NullSink));
        assert!(matches!(
            result,
            Err(TableError::Config(crate::config::ConfigError::NoPhilosophers))
        ));

        let mut too_slow = config(2);
        too_slow.timing.think = TimeRange::new(1e20, 1e20);
        assert!(matches!(
            Table::new(too_slow, Arc::new(NullSink)),
            Err(TableError::Config(crate::config::ConfigError::InvalidRange { .. }))
        ));
    }

    #[test]
    fn stop_is_flipped_once() {
        let table = Table::new(config(2), Arc::new(NullSink)).unwrap();
        assert!(!table.stop_requested());
        assert!(table.request_stop());
        assert!(!table.request_stop());
        assert!(table.stop_requested());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn lifecycle_misuse_is_reported() {
        let mut table = Table::new(config(3), Arc::new(NullSink)).unwrap();
        assert_eq!(
            table.await_completion(Duration::from_millis(10)).await.err(),
            Some(TableError::NotStarted)
        );
        table.start_all().unwrap();
        assert_eq!(table.start_all(), Err(TableError::AlreadyStarted));

        table.request_stop();
        let summary = table.await_completion(Duration::from_secs(2)).await.unwrap();
        assert!(summary.unresponsive.is_empty());
        assert!(summary
            .philosophers
            .iter()
            .all(|p| p.state == PhilosopherState::Finished));
    }
}
