//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! `RUST_LOG`. Every philosopher task runs inside a `philosopher{id, name}` span,
//! so its lines carry the seat without repeating it in each event.
//!
//! ## What Gets Traced
//!
//! - **Table lifecycle**: seating, start, stop request, join outcome
//! - **Philosopher lifecycle**: seated, finished, starved (`warn`), faults (`error`)
//! - **Contention**: busy sticks and meals at `debug`, stick hand-overs at `trace`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle only
//! RUST_LOG=info cargo run
//!
//! # Every failed attempt and meal
//! RUST_LOG=debug cargo run -- --quiet
//!
//! # Every stick hand-over
//! RUST_LOG=dining_table::stick=trace cargo run
//! ```
//!
//! ## Sample Output
//!
//! ```text
//! INFO Table set philosophers=5 sticks=5
//! INFO philosopher{id=philosopher_0 name=Platon}: Seated timing=Timing { .. }
//! WARN philosopher{id=philosopher_3 name=Kant}: Starved meals=2 failed_attempts=15 timeout_ms=15000
//! INFO Stop requested
//! INFO Run complete total_meals=42 elapsed_ms=30012
//! ```

/// Logs go to stderr so they never interleave with console status lines on stdout.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
