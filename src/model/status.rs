use crate::model::{Activity, PhilosopherId, PhilosopherState};
use serde::{Deserialize, Serialize};

/// Identity tag a sink may use to tell philosophers apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    Red,
    Green,
    Yellow,
    Cyan,
    Magenta,
    White,
}

impl Color {
    /// Palette handed out to philosophers in seat order.
    pub const PALETTE: [Color; 7] = [
        Color::Blue,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Cyan,
        Color::Magenta,
        Color::White,
    ];

    pub fn for_seat(seat: usize) -> Self {
        Self::PALETTE[seat % Self::PALETTE.len()]
    }
}

/// One state-change notification, published to a [`StatusSink`](crate::status::StatusSink).
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub philosopher: PhilosopherId,
    pub name: String,
    pub color: Color,
    /// Lifecycle state after this update was applied.
    pub state: PhilosopherState,
    pub activity: Activity,
    pub meals: u64,
    pub failed_attempts: u64,
}
