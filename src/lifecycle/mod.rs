//! # Table Lifecycle & Orchestration
//!
//! Philosophers and sticks are simple on their own; seating them, starting them
//! together and getting every one of them off the table again is where the
//! coordination lives. This module is that conductor.
//!
//! **Key Responsibilities:**
//! 1. **Topology** - Build the stick ring and bind each philosopher to two neighbours
//! 2. **Fail Fast** - Reject bad configuration before any task exists
//! 3. **Lifecycle Management** - Start all philosophers, wait for terminal states
//! 4. **Graceful Shutdown** - One stop signal, a bounded join, abort as a last resort
//! 5. **Observability Setup** - Initialize tracing and logging infrastructure
//!
//! ## The Table Pattern
//!
//! ```rust,ignore
//! let mut table = Table::new(config, sink)?;   // validate, build sticks + philosophers
//! table.start_all()?;                          // one Tokio task each
//! // ... later, from Ctrl+C or a timer ...
//! table.request_stop();                        // flips the shared watch channel once
//! let summary = table.await_completion(grace).await?;
//! ```
//!
//! Or, in one call, [`Table::run_until`] with any future as the external stop.
//!
//! ## Graceful Shutdown
//!
//! 1. **Flip the stop signal** - every philosopher watches the same `watch::Receiver<bool>`
//! 2. **Philosophers notice** - at the top of their loop or in the middle of any sleep
//! 3. **Philosophers clean up** - put sticks down, publish `Finished`
//! 4. **Bounded join** - tasks still running after the grace period are aborted;
//!    dropping their held-stick guard frees the sticks
//!
//! Starvation and faults end only the philosopher they happen to. The table
//! reports them in the [`RunSummary`](crate::model::RunSummary) and keeps going.

pub mod error;
pub mod table;
pub mod tracing;

pub use self::error::*;
pub use self::table::*;
pub use self::tracing::*;
