//! Header clock: session timer or wall time.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SessionClock {
    started: Instant,
    show_wall_time: bool,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            show_wall_time: false,
        }
    }

    pub fn shows_wall_time(&self) -> bool {
        self.show_wall_time
    }

    /// Switch between session timer and wall time; returns the new mode.
    pub fn toggle(&mut self) -> bool {
        self.show_wall_time = !self.show_wall_time;
        self.show_wall_time
    }

    pub fn label(&self) -> String {
        if self.show_wall_time {
            chrono::Local::now().format("%H:%M").to_string()
        } else {
            format_elapsed(self.started.elapsed())
        }
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

/// `MM:SS`, both zero-padded; minutes keep counting past 59.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
