use dining_table::config::{SimulationConfig, TimeRange, Timing};
use dining_table::lifecycle::Table;
use dining_table::model::{Activity, Color, PhilosopherId, PhilosopherState, StatusUpdate, StickId};
use dining_table::philosopher::{Philosopher, Seat};
use dining_table::status::mock::RecordingSink;
use dining_table::status::StatusSink;
use dining_table::stick::Stick;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Holds sticks on behalf of nobody at the table, and never gives them back.
const PROBE: PhilosopherId = PhilosopherId(usize::MAX);

/// Remembers when each activity was published.
#[derive(Default)]
struct ClockSink {
    seen: Mutex<Vec<(Instant, Activity)>>,
}

impl ClockSink {
    fn first(&self, wanted: impl Fn(&Activity) -> bool) -> Option<Instant> {
        self.seen
            .lock()
            .iter()
            .find(|(_, a)| wanted(a))
            .map(|(t, _)| *t)
    }
}

impl StatusSink for ClockSink {
    fn publish(&self, update: &StatusUpdate) {
        self.seen.lock().push((Instant::now(), update.activity.clone()));
    }
}

/// Panics inside the philosopher loop the first time `victim` sits down to eat.
struct FaultySink {
    victim: PhilosopherId,
    tripped: Mutex<bool>,
}

impl StatusSink for FaultySink {
    fn publish(&self, update: &StatusUpdate) {
        if update.philosopher == self.victim && matches!(update.activity, Activity::Eating(_)) {
            let mut tripped = self.tripped.lock();
            if !*tripped {
                *tripped = true;
                drop(tripped);
                panic!("sink exploded");
            }
        }
    }
}

fn timing(timeout_ms: u64, backoff_ms: u64) -> Timing {
    Timing {
        think: TimeRange::new(0.001, 0.001),
        eat: TimeRange::new(0.002, 0.004),
        starvation_timeout: Duration::from_millis(timeout_ms),
        retry_backoff: Duration::from_millis(backoff_ms),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn starves_no_earlier_than_timeout_and_within_one_backoff() {
    const TIMEOUT: Duration = Duration::from_millis(400);
    const BACKOFF: Duration = Duration::from_millis(100);

    let first = Arc::new(Stick::new(StickId(0)));
    let second = Arc::new(Stick::new(StickId(1)));
    assert!(first.try_acquire(PROBE));

    let sink = Arc::new(ClockSink::default());
    let (_stop, stop_rx) = watch::channel(false);
    let seat = Seat {
        id: PhilosopherId(0),
        name: "Sokrates".into(),
        color: Color::Green,
    };
    let philosopher = Philosopher::new(
        seat,
        first.clone(),
        second.clone(),
        timing(TIMEOUT.as_millis() as u64, BACKOFF.as_millis() as u64),
        stop_rx,
        sink.clone(),
    )
    .unwrap();
    let record = philosopher.record();

    assert_eq!(philosopher.run().await, PhilosopherState::Starved);

    let trying = sink.first(|a| *a == Activity::TryingSticks).unwrap();
    let starved = sink.first(|a| *a == Activity::Starved).unwrap();
    let waited = starved - trying;
    assert!(waited >= TIMEOUT, "starved after {waited:?}");
    assert!(waited <= TIMEOUT + BACKOFF, "starved after {waited:?}");

    // One attempt right away, one per backoff, one at the deadline.
    let attempts = record.failed_attempts();
    assert!((4..=6).contains(&attempts), "{attempts} failed attempts");
    assert!(second.is_free());
    assert_eq!(first.holder(), Some(PROBE));
    assert!(record.held().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn first_stick_is_free_again_when_second_is_busy() {
    let first = Arc::new(Stick::new(StickId(0)));
    let second = Arc::new(Stick::new(StickId(1)));
    assert!(second.try_acquire(PROBE));

    let sink = Arc::new(RecordingSink::new());
    let (stop, stop_rx) = watch::channel(false);
    let seat = Seat {
        id: PhilosopherId(1),
        name: "Kant".into(),
        color: Color::Yellow,
    };
    // Bound right-to-left on purpose: pick-up order still starts at stick 0.
    let philosopher = Philosopher::new(
        seat,
        second.clone(),
        first.clone(),
        timing(60_000, 20),
        stop_rx,
        sink.clone(),
    )
    .unwrap();
    let record = philosopher.record();
    let handle = tokio::spawn(philosopher.run());

    // Between attempts the philosopher must never sit on stick 0.
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(3)).await;
        if first.try_acquire(PROBE) {
            first.release();
        }
        assert!(record.held().len() <= 1);
    }

    stop.send_replace(true);
    assert_eq!(handle.await.unwrap(), PhilosopherState::Finished);
    assert!(record.failed_attempts() > 0);
    assert!(first.is_free());

    let activities = sink.activities_of(PhilosopherId(1));
    let took = activities
        .iter()
        .filter(|a| **a == Activity::TookStick(StickId(0)))
        .count();
    let released = activities
        .iter()
        .filter(|a| **a == Activity::ReleasedStick(StickId(0)))
        .count();
    assert!(took > 0);
    assert_eq!(took, released);
    assert!(!activities.contains(&Activity::TookStick(StickId(1))));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn starvation_stays_local_to_the_starved() {
    let config = SimulationConfig {
        philosophers: 5,
        timing: timing(300, 20),
        seed: Some(3),
        shutdown_grace: Duration::from_secs(2),
        ..Default::default()
    };
    let mut table = Table::new(config, Arc::new(RecordingSink::new())).unwrap();
    // Philosophers 0 and 4 both need stick 0.
    assert!(table.sticks()[0].try_acquire(PROBE));

    table.start_all().unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;
    table.request_stop();
    let summary = table.await_completion(Duration::from_secs(2)).await.unwrap();

    for report in &summary.philosophers {
        match report.id.0 {
            0 | 4 => {
                assert_eq!(report.state, PhilosopherState::Starved);
                assert_eq!(report.meals, 0);
            }
            _ => {
                assert_eq!(report.state, PhilosopherState::Finished);
                assert!(report.meals > 0);
            }
        }
    }
    assert_eq!(summary.starved().count(), 2);
    assert_eq!(table.sticks()[0].holder(), Some(PROBE));
    assert!(table.sticks()[1..].iter().all(|s| s.is_free()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn fault_mid_meal_releases_and_stays_local() {
    let config = SimulationConfig {
        philosophers: 3,
        timing: timing(10_000, 5),
        seed: Some(11),
        shutdown_grace: Duration::from_secs(2),
        ..Default::default()
    };
    let sink = Arc::new(FaultySink {
        victim: PhilosopherId(1),
        tripped: Mutex::new(false),
    });
    let mut table = Table::new(config, sink).unwrap();
    table.start_all().unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while table.records()[1].state() != PhilosopherState::Errored {
        assert!(Instant::now() < deadline, "philosopher 1 never failed");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    // The others keep eating after the fault.
    let meals_at_fault = table.records()[0].meals() + table.records()[2].meals();
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(table.records()[0].meals() + table.records()[2].meals() > meals_at_fault);

    table.request_stop();
    let summary = table.await_completion(Duration::from_secs(2)).await.unwrap();
    assert_eq!(summary.philosophers[1].state, PhilosopherState::Errored);
    assert_eq!(summary.philosophers[0].state, PhilosopherState::Finished);
    assert_eq!(summary.philosophers[2].state, PhilosopherState::Finished);
    assert!(table.sticks().iter().all(|s| s.is_free()));
    assert!(table.records()[1].held().is_empty());
}
