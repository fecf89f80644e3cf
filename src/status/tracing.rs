use crate::model::{PhilosopherState, StatusUpdate};
use crate::status::StatusSink;
use tracing::{debug, error, info, warn};

/// Forwards updates to `tracing`, one structured event per update.
///
/// Terminal states are logged at `info`/`warn`/`error`, everything else at `debug`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn publish(&self, update: &StatusUpdate) {
        let StatusUpdate {
            philosopher,
            name,
            activity,
            meals,
            failed_attempts,
            ..
        } = update;
        match update.state {
            PhilosopherState::Finished => {
                info!(%philosopher, %name, %activity, meals, failed_attempts, "Status")
            }
            PhilosopherState::Starved => {
                warn!(%philosopher, %name, %activity, meals, failed_attempts, "Status")
            }
            PhilosopherState::Errored => {
                error!(%philosopher, %name, %activity, meals, failed_attempts, "Status")
            }
            _ => debug!(%philosopher, %name, %activity, meals, failed_attempts, "Status"),
        }
    }
}
