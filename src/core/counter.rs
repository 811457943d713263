//! # Count-Up Counters
//!
//! Statistic numbers animate from 0 to their target with an ease-out quart
//! curve. A counter starts the first time its block is at least half
//! visible, and only once.

use std::time::{Duration, Instant};

pub const COUNT_UP_DURATION: Duration = Duration::from_millis(2000);

/// Share of a block that must be on screen before its counter starts.
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

pub fn ease_out_quart(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(4)
}

pub fn is_sufficiently_visible(visible_rows: u16, total_rows: u16) -> bool {
    total_rows > 0 && visible_rows as f32 / total_rows as f32 >= VISIBILITY_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountUp {
    target: u64,
    started_at: Option<Instant>,
}

impl CountUp {
    pub fn new(target: u64) -> Self {
        Self {
            target,
            started_at: None,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Starts the animation. Returns false if it already ran.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        true
    }

    pub fn is_running(&self, now: Instant) -> bool {
        self.started_at
            .is_some_and(|start| now.duration_since(start) < COUNT_UP_DURATION)
    }

    /// Value to display at `now`; 0 before the counter starts.
    pub fn value_at(&self, now: Instant) -> u64 {
        let Some(start) = self.started_at else {
            return 0;
        };
        let elapsed = now.duration_since(start);
        if elapsed >= COUNT_UP_DURATION {
            return self.target;
        }
        let progress = elapsed.as_secs_f64() / COUNT_UP_DURATION.as_secs_f64();
        (self.target as f64 * ease_out_quart(progress)).floor() as u64
    }
}
