use crate::model::{Color, StatusUpdate};
use crate::status::StatusSink;
use colored::Colorize;
use parking_lot::Mutex;
use std::io::Write;
use tracing::warn;

/// Writes one colored status line per update.
///
/// The writer sits behind a mutex so each line is written whole, even when
/// several philosophers publish at the same instant.
pub struct ConsoleSink<W: Write + Send = std::io::Stdout> {
    out: Mutex<W>,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    pub fn format(update: &StatusUpdate) -> String {
        format!(
            "║ {:<12} │ {:<30} │ total meals {:>5} │ total failed attempts {:>8} ║",
            update.name,
            update.activity.to_string(),
            update.meals,
            update.failed_attempts
        )
    }
}

impl<W: Write + Send> StatusSink for ConsoleSink<W> {
    fn publish(&self, update: &StatusUpdate) {
        let line = Self::format(update).color(terminal_color(update.color));
        let mut out = self.out.lock();
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            warn!(error = %e, philosopher = %update.philosopher, "Status line dropped");
        }
    }
}

fn terminal_color(color: Color) -> colored::Color {
    match color {
        Color::Blue => colored::Color::Blue,
        Color::Red => colored::Color::Red,
        Color::Green => colored::Color::Green,
        Color::Yellow => colored::Color::Yellow,
        Color::Cyan => colored::Color::Cyan,
        Color::Magenta => colored::Color::Magenta,
        Color::White => colored::Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Activity, PhilosopherId, PhilosopherState, StickId};
    use std::sync::Arc;

    fn update(id: usize, activity: Activity) -> StatusUpdate {
        StatusUpdate {
            philosopher: PhilosopherId(id),
            name: format!("Sage{id}"),
            color: Color::for_seat(id),
            state: PhilosopherState::AcquiringSticks,
            activity,
            meals: 2,
            failed_attempts: 11,
        }
    }

    #[test]
    fn formats_a_status_row() {
        let line = ConsoleSink::<Vec<u8>>::format(&update(0, Activity::TookStick(StickId(4))));
        assert!(line.starts_with("║ Sage0"));
        assert!(line.contains("Took stick 4"));
        assert!(line.contains("total meals     2"));
        assert!(line.contains("total failed attempts       11"));
    }

    #[test]
    fn concurrent_lines_do_not_interleave() {
        let sink = Arc::new(ConsoleSink::new(Vec::new()));
        let ths = (0..8)
            .map(|i| {
                let sink = sink.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        sink.publish(&update(i, Activity::TryingSticks));
                    }
                })
            })
            .collect::<Vec<_>>();
        ths.into_iter().for_each(|th| th.join().unwrap());

        let sink = Arc::try_unwrap(sink).ok().unwrap();
        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 800);
        assert!(lines
            .iter()
            .all(|l| l.contains("Trying to take sticks") && l.matches("║").count() == 2));
    }
}
