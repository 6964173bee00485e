//! Spaced-repetition scheduler
//!
//! Leitner-style levels: each level maps to a review interval in days.
//! A self-rating after each review moves the level down, keeps it, or
//! moves it up.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::practice::error::{PracticeError, PracticeResult};
use crate::practice::progress::{PracticeMode, ProgressRecord};

/// Review interval in days for each level
pub const INTERVAL_DAYS: [u32; 6] = [1, 3, 7, 14, 30, 60];

const MS_PER_DAY: f64 = 86_400_000.0;

/// Interval for a level; levels past the table use the last entry
pub fn interval_for_level(level: u32) -> u32 {
    let idx = (level as usize).min(INTERVAL_DAYS.len() - 1);
    INTERVAL_DAYS[idx]
}

/// Whether an item is due at `now`
///
/// Never-reviewed items are always due. Elapsed time is measured in
/// fractional days.
pub fn is_due_for_review(last_review: Option<DateTime<Utc>>, level: u32, now: DateTime<Utc>) -> bool {
    let Some(last) = last_review else {
        return true;
    };

    let elapsed_days = (now - last).num_milliseconds() as f64 / MS_PER_DAY;
    elapsed_days >= interval_for_level(level) as f64
}

/// Self-rating given after a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Hard,
    Medium,
    Easy,
}

impl Rating {
    /// New level after this rating
    pub fn apply(&self, level: u32) -> u32 {
        match self {
            Rating::Hard => level.saturating_sub(1),
            Rating::Medium => level,
            Rating::Easy => level.saturating_add(1),
        }
    }

    /// Medium and Easy count as a correct answer in study stats
    pub fn counts_as_correct(&self) -> bool {
        !matches!(self, Rating::Hard)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rating::Hard => "hard",
            Rating::Medium => "medium",
            Rating::Easy => "easy",
        };
        f.write_str(name)
    }
}

impl FromStr for Rating {
    type Err = PracticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "h" | "hard" => Ok(Rating::Hard),
            "2" | "m" | "medium" => Ok(Rating::Medium),
            "3" | "e" | "easy" => Ok(Rating::Easy),
            _ => Err(PracticeError::InvalidRating(s.to_string())),
        }
    }
}

/// Apply a rating to sentence `index` and stamp the review time
///
/// Returns the new level. The caller is expected to persist the record.
pub fn review(
    record: &mut ProgressRecord,
    index: usize,
    rating: Rating,
    now: DateTime<Utc>,
) -> u32 {
    let old_level = record.spaced_level(index);
    let level = rating.apply(old_level);
    record.set_spaced(index, level, now);

    tracing::debug!(index, old_level, level, rating = %rating, "Recorded review");
    level
}

/// `review` with a bounds check against the lesson size
pub fn review_checked(
    record: &mut ProgressRecord,
    index: usize,
    sentence_count: usize,
    rating: Rating,
    now: DateTime<Utc>,
) -> PracticeResult<u32> {
    if index >= sentence_count {
        return Err(PracticeError::IndexOutOfRange {
            index,
            len: sentence_count,
        });
    }
    Ok(review(record, index, rating, now))
}

/// Indices that belong in the review queue
///
/// A sentence is queued if it was never reviewed, is not yet mastered in
/// sentence mode, or is due.
pub fn due_sentences(record: &ProgressRecord, sentence_count: usize, now: DateTime<Utc>) -> Vec<usize> {
    (0..sentence_count)
        .filter(|&i| {
            let last = record.last_review(i);
            last.is_none()
                || !record.is_mastered(PracticeMode::Sentence, i)
                || is_due_for_review(last, record.spaced_level(i), now)
        })
        .collect()
}
