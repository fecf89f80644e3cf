//! # Dining Table
//!
//! Command-line driver for the simulation:
//! 1.  Parses the configuration from flags or `DINING_*` environment variables.
//! 2.  Prints the configuration header.
//! 3.  Runs the [`Table`] until Ctrl+C, `--duration-secs`, or every philosopher is done.
//! 4.  Prints the run summary, as a table or as JSON with `--json`.

use anyhow::Context;
use clap::Parser;
use dining_table::config::{SimulationConfig, TimeRange, Timing};
use dining_table::lifecycle::{setup_tracing, Table};
use dining_table::model::RunSummary;
use dining_table::status::{ConsoleSink, StatusSink, TracingSink};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "dining-table", version, about = "Dining philosophers simulation")]
struct Cli {
    /// Number of philosophers.
    #[arg(long, env = "DINING_PHILOSOPHERS", default_value_t = 5)]
    philosophers: usize,

    /// Number of sticks in the ring (defaults to one per philosopher).
    #[arg(long, env = "DINING_STICKS")]
    sticks: Option<usize>,

    /// Minimum thinking time in seconds.
    #[arg(long, env = "DINING_THINK_MIN", default_value_t = 0.5)]
    think_min: f64,

    /// Maximum thinking time in seconds.
    #[arg(long, env = "DINING_THINK_MAX", default_value_t = 2.0)]
    think_max: f64,

    /// Minimum eating time in seconds.
    #[arg(long, env = "DINING_EAT_MIN", default_value_t = 0.5)]
    eat_min: f64,

    /// Maximum eating time in seconds.
    #[arg(long, env = "DINING_EAT_MAX", default_value_t = 1.0)]
    eat_max: f64,

    /// Starve after this long without getting both sticks.
    #[arg(long, env = "DINING_STARVATION_TIMEOUT_MS", default_value_t = 15_000)]
    starvation_timeout_ms: u64,

    /// Pause between failed attempts to take both sticks.
    #[arg(long, env = "DINING_RETRY_BACKOFF_MS", default_value_t = 1_000)]
    retry_backoff_ms: u64,

    /// Seed for reproducible think and eat durations.
    #[arg(long, env = "DINING_SEED")]
    seed: Option<u64>,

    /// Comma-separated philosopher names, in seat order.
    #[arg(long, env = "DINING_NAMES", value_delimiter = ',')]
    names: Vec<String>,

    /// Stop automatically after this many seconds.
    #[arg(long, env = "DINING_DURATION_SECS")]
    duration_secs: Option<f64>,

    /// How long to wait for philosophers to stop before aborting them.
    #[arg(long, env = "DINING_GRACE_MS", default_value_t = 5_000)]
    grace_ms: u64,

    /// Log status changes through tracing instead of printing status lines.
    #[arg(long)]
    quiet: bool,

    /// Print only the summary, as JSON. Status changes go through tracing.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        SimulationConfig {
            philosophers: self.philosophers,
            sticks: self.sticks,
            timing: Timing {
                think: TimeRange::new(self.think_min, self.think_max),
                eat: TimeRange::new(self.eat_min, self.eat_max),
                starvation_timeout: Duration::from_millis(self.starvation_timeout_ms),
                retry_backoff: Duration::from_millis(self.retry_backoff_ms),
            },
            seed: self.seed,
            names: self.names.clone(),
            shutdown_grace: Duration::from_millis(self.grace_ms),
        }
    }

    /// Status lines share stdout with the JSON summary, so `--json` silences them.
    fn prints_status_lines(&self) -> bool {
        !self.quiet && !self.json
    }

    fn run_for(&self) -> anyhow::Result<Option<Duration>> {
        self.duration_secs
            .map(Duration::try_from_secs_f64)
            .transpose()
            .context("Invalid --duration-secs")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();
    let config = cli.config();

    let run_for = cli.run_for()?;

    let sink: Arc<dyn StatusSink> = if cli.prints_status_lines() {
        Arc::new(ConsoleSink::stdout())
    } else {
        Arc::new(TracingSink)
    };

    let table = Table::new(config.clone(), sink).context("Could not set the table")?;
    if !cli.json {
        print_header(&config, cli.duration_secs);
    }

    let summary = table
        .run_until(stop_signal(run_for))
        .await
        .context("Simulation failed")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Resolves on Ctrl+C or after `run_for`, whichever comes first.
async fn stop_signal(run_for: Option<Duration>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl+C handler unavailable");
            std::future::pending::<()>().await;
        }
        info!("Ctrl+C received");
    };
    let timer = async {
        match run_for {
            Some(d) => tokio::time::sleep(d).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::select! {
        _ = ctrl_c => {}
        _ = timer => info!("Run time elapsed"),
    }
}

const RULE: &str = "════════════════════════════════════════════════════════════════════════════";

fn print_header(config: &SimulationConfig, duration_secs: Option<f64>) {
    let timing = &config.timing;
    println!("╔{RULE}╗");
    println!("║ {:^74} ║", "DINING PHILOSOPHERS SIMULATION");
    println!("╠{RULE}╣");
    println!("║ • Philosophers:    {:>4}", config.philosophers);
    println!("║ • Sticks:          {:>4}", config.stick_count());
    println!(
        "║ • Thinking time:   {:4.1} - {:4.1} seconds",
        timing.think.min_secs, timing.think.max_secs
    );
    println!(
        "║ • Eating time:     {:4.1} - {:4.1} seconds",
        timing.eat.min_secs, timing.eat.max_secs
    );
    println!(
        "║ • Starving time:   {:4.1} seconds",
        timing.starvation_timeout.as_secs_f64()
    );
    println!(
        "║ • Next attempt:    {:4.1} seconds",
        timing.retry_backoff.as_secs_f64()
    );
    match duration_secs {
        Some(secs) => println!("║ • Stops after {secs:.1} seconds or on Ctrl+C"),
        None => println!("║ • Ctrl+C to stop the simulation and show the summary"),
    }
    println!("╚{RULE}╝");
    println!();
}

fn print_summary(summary: &RunSummary) {
    println!();
    println!("╔{RULE}╗");
    println!("║ {:<74} ║", "SIMULATION SUMMARY");
    println!("╠{RULE}╣");
    println!(
        "║ Total duration: {:.1} seconds",
        summary.elapsed.as_secs_f64()
    );
    for p in &summary.philosophers {
        println!(
            "║ {:<12} │ {:<10} │ meals {:>5} │ failed attempts {:>8}",
            p.name,
            p.state.to_string(),
            p.meals,
            p.failed_attempts
        );
    }
    println!(
        "║ Total meals: {}   Total failed attempts: {}",
        summary.total_meals, summary.total_failed_attempts
    );
    if !summary.unresponsive.is_empty() {
        let ids = summary
            .unresponsive
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("║ Aborted after grace period: {ids}");
    }
    println!("╚{RULE}╝");
}
