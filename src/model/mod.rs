//! Plain data shared between sticks, philosophers, the table and status sinks.

pub mod ids;
pub mod report;
pub mod state;
pub mod status;

pub use ids::*;
pub use report::*;
pub use state::*;
pub use status::*;
