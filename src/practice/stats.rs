//! Study statistics for a practice session

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::practice::percent;

/// Running totals since the session started
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyStats {
    pub correct: u32,
    pub attempts: u32,
    pub started: DateTime<Utc>,
}

impl StudyStats {
    pub fn new(started: DateTime<Utc>) -> Self {
        Self {
            correct: 0,
            attempts: 0,
            started,
        }
    }

    /// Count one attempt
    pub fn record(&mut self, correct: bool) {
        self.attempts += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Rounded percentage of correct attempts, 0 with no attempts
    pub fn accuracy(&self) -> u32 {
        percent(self.correct as usize, self.attempts as usize)
    }

    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        now - self.started
    }

    /// Elapsed time as `HH:MM:SS`
    pub fn elapsed_display(&self, now: DateTime<Utc>) -> String {
        format_duration(self.elapsed(now))
    }

    pub fn reset(&mut self, now: DateTime<Utc>) {
        *self = Self::new(now);
    }
}

/// Format a duration as `HH:MM:SS`; negative durations show as zero
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
