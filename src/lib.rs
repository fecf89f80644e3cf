#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Dining Table
//!
//! > **N philosophers, M sticks, one ring, no deadlock.**
//!
//! This crate simulates philosophers competing for shared sticks on Tokio. Each
//! philosopher needs the two sticks next to it to eat, and the crate shows how
//! to get there without deadlock, how to notice starvation, and how to keep
//! shared state consistent while many tasks hammer on it.
//!
//! ## 🏗️ Design Philosophy
//!
//! - **Ordered acquisition**: every philosopher picks up its lower-numbered stick
//!   first, so no cycle of waiting philosophers can form.
//! - **Never wait with one stick in hand**: if the second stick is taken, the first
//!   goes straight back and the philosopher retries after a backoff.
//! - **Bounded patience**: failing to eat for `starvation_timeout` is reported as
//!   `Starved`, not hidden.
//! - **Explicit ownership**: the [`Table`](lifecycle::Table) owns sticks, records and
//!   the stop signal. Philosophers receive handles; there is no global state.
//!
//! ## 🚀 Core Concepts
//!
//! ### Per-Stick Locking
//! A [`Stick`](stick::Stick) guards its holder with its own mutex. There is no lock
//! spanning several sticks, so contention stays local.
//!
//! ### One Task per Philosopher
//! Each [`Philosopher`](philosopher::Philosopher) is a long-lived Tokio task on the
//! multi-threaded runtime. Sleeps suspend only that task, and all of them race the
//! shared stop signal.
//!
//! ### Release on Every Path
//! Sticks are put down before a philosopher reports a terminal state, whether it
//! stopped, starved, returned an error or panicked. An aborted task releases them
//! when its state is dropped.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Resource ([`stick`])
//! - **Role**: atomic try-acquire / release / ownership query.
//!
//! ### 2. The Worker ([`philosopher`])
//! - **Role**: the think → acquire → eat → release state machine.
//! - **Key items**: [`Philosopher`](philosopher::Philosopher), [`PhilosopherRecord`](philosopher::PhilosopherRecord).
//!
//! ### 3. The Host ([`lifecycle`])
//! - **Role**: builds the ring, starts and joins philosophers, owns the stop signal.
//! - **Key items**: [`Table`](lifecycle::Table), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 4. The Display ([`status`])
//! - **Role**: receives every state change; console, tracing and in-memory sinks.
//!
//! ### 5. The Data ([`model`], [`config`])
//! - **Role**: ids, states, status updates, summaries and validated configuration.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Classic five philosophers until Ctrl+C
//! cargo run
//!
//! # Ten philosophers for 30 seconds, logs instead of status lines
//! RUST_LOG=info cargo run -- --philosophers 10 --duration-secs 30 --quiet
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod config;
pub mod lifecycle;
pub mod model;
pub mod philosopher;
pub mod status;
pub mod stick;
