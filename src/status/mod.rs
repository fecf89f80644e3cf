//! # Status Sinks
//!
//! Philosophers report every activity change through the [`StatusSink`] trait.
//! The core only needs updates to become visible eventually and never arrive
//! garbled; keeping concurrent updates from interleaving is the sink's job.
//!
//! | Sink | Output | Use Case |
//! |------|--------|----------|
//! | [`ConsoleSink`] | one colored line per update | interactive runs |
//! | [`TracingSink`] | structured `tracing` events | `--quiet` runs, log collection |
//! | [`RecordingSink`](mock::RecordingSink) | in-memory `Vec` | tests |

pub mod console;
pub mod mock;
pub mod tracing;

pub use self::console::ConsoleSink;
pub use self::tracing::TracingSink;

use crate::model::StatusUpdate;

/// Receiver of philosopher state-change notifications.
///
/// Called from many philosopher tasks at once, so implementations must
/// serialize their own output.
pub trait StatusSink: Send + Sync {
    fn publish(&self, update: &StatusUpdate);
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn publish(&self, _update: &StatusUpdate) {}
}
