use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Philosophers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhilosopherId(pub usize);

impl From<usize> for PhilosopherId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl Display for PhilosopherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "philosopher_{}", self.0)
    }
}

/// Type-safe identifier for Sticks.
///
/// The derived `Ord` is load-bearing: every philosopher picks up the smaller
/// of its two sticks first, which keeps the wait-for graph acyclic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StickId(pub usize);

impl From<usize> for StickId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl Display for StickId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
