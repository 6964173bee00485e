//! Per-lesson progress record
//!
//! The record is a flat JSON object stored beside each lesson. Keys are
//! positional, one family per practice concern:
//!
//! - `sentence_{i}`, `blank_{i}`, `reverse_{i}`: mastery flags
//! - `spaced_{i}_level`: spaced-repetition level
//! - `spaced_{i}_last_review`: RFC 3339 timestamp of the last review
//! - `answer_{i}`: correct answers in the reverse quiz
//!
//! Keys this module does not know about are carried along untouched so a
//! round trip through the client never drops data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::practice::error::PracticeError;

/// Correct reverse-quiz answers needed to master a sentence
pub const DEFAULT_MASTERY_THRESHOLD: u32 = 3;

/// Practice modes that carry a mastery flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeMode {
    Sentence,
    Blank,
    Reverse,
}

impl PracticeMode {
    pub fn all() -> &'static [PracticeMode] {
        &[PracticeMode::Sentence, PracticeMode::Blank, PracticeMode::Reverse]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PracticeMode::Sentence => "sentence",
            PracticeMode::Blank => "blank",
            PracticeMode::Reverse => "reverse",
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PracticeMode {
    type Err = PracticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sentence" => Ok(PracticeMode::Sentence),
            "blank" => Ok(PracticeMode::Blank),
            "reverse" => Ok(PracticeMode::Reverse),
            _ => Err(PracticeError::InvalidMode(s.to_string())),
        }
    }
}

/// A typed progress key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressKey {
    Mastered(PracticeMode, usize),
    SpacedLevel(usize),
    LastReview(usize),
    AnswerCount(usize),
}

impl ProgressKey {
    /// Sentence index the key refers to
    pub fn index(&self) -> usize {
        match self {
            ProgressKey::Mastered(_, i)
            | ProgressKey::SpacedLevel(i)
            | ProgressKey::LastReview(i)
            | ProgressKey::AnswerCount(i) => *i,
        }
    }
}

impl fmt::Display for ProgressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressKey::Mastered(mode, i) => write!(f, "{}_{}", mode, i),
            ProgressKey::SpacedLevel(i) => write!(f, "spaced_{}_level", i),
            ProgressKey::LastReview(i) => write!(f, "spaced_{}_last_review", i),
            ProgressKey::AnswerCount(i) => write!(f, "answer_{}", i),
        }
    }
}

impl FromStr for ProgressKey {
    type Err = PracticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PracticeError::InvalidKey(s.to_string());

        if let Some(rest) = s.strip_prefix("spaced_") {
            if let Some(idx) = rest.strip_suffix("_level") {
                return idx.parse().map(ProgressKey::SpacedLevel).map_err(|_| invalid());
            }
            if let Some(idx) = rest.strip_suffix("_last_review") {
                return idx.parse().map(ProgressKey::LastReview).map_err(|_| invalid());
            }
            return Err(invalid());
        }

        if let Some(idx) = s.strip_prefix("answer_") {
            return idx.parse().map(ProgressKey::AnswerCount).map_err(|_| invalid());
        }

        let (mode, idx) = s.split_once('_').ok_or_else(invalid)?;
        let mode: PracticeMode = mode.parse().map_err(|_| invalid())?;
        let idx: usize = idx.parse().map_err(|_| invalid())?;
        Ok(ProgressKey::Mastered(mode, idx))
    }
}

/// Result of a correct reverse-quiz answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerProgress {
    /// Correct answers so far for this sentence
    pub count: u32,
    /// The answer pushed the sentence over the mastery threshold
    pub newly_mastered: bool,
}

/// Color tier of the overall progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressTier {
    Low,
    Medium,
    High,
}

/// Mastery across all modes for one lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterySummary {
    pub mastered: usize,
    pub total: usize,
    pub percentage: u32,
    pub tier: ProgressTier,
    pub complete: bool,
}

/// Progress of one lesson
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressRecord {
    entries: BTreeMap<String, Value>,
}

impl ProgressRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Raw value of a key, known or not
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Iterate all keys and values
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    fn get(&self, key: ProgressKey) -> Option<&Value> {
        self.entries.get(&key.to_string())
    }

    fn set(&mut self, key: ProgressKey, value: Value) {
        self.entries.insert(key.to_string(), value);
    }

    /// Check the mastery flag of a mode
    pub fn is_mastered(&self, mode: PracticeMode, index: usize) -> bool {
        self.get(ProgressKey::Mastered(mode, index))
            .map(is_truthy)
            .unwrap_or(false)
    }

    /// Set a mastery flag, returning true if it was not set before
    ///
    /// Flags are never cleared here; only `reset` removes mastery.
    pub fn mark_mastered(&mut self, mode: PracticeMode, index: usize) -> bool {
        let newly = !self.is_mastered(mode, index);
        self.set(ProgressKey::Mastered(mode, index), Value::Bool(true));
        newly
    }

    /// Spaced-repetition level, 0 when never reviewed
    pub fn spaced_level(&self, index: usize) -> u32 {
        self.get(ProgressKey::SpacedLevel(index))
            .and_then(as_count)
            .unwrap_or(0)
    }

    /// Timestamp of the last review
    ///
    /// A timestamp that does not parse is treated as missing.
    pub fn last_review(&self, index: usize) -> Option<DateTime<Utc>> {
        let raw = self.get(ProgressKey::LastReview(index))?.as_str()?;
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                tracing::warn!(index, value = %raw, error = %e, "Ignoring unparseable review timestamp");
                None
            }
        }
    }

    /// Store a review outcome
    pub fn set_spaced(&mut self, index: usize, level: u32, reviewed_at: DateTime<Utc>) {
        self.set(ProgressKey::SpacedLevel(index), Value::from(level));
        self.set(
            ProgressKey::LastReview(index),
            Value::String(reviewed_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
        );
    }

    /// Correct reverse-quiz answers so far
    pub fn answer_count(&self, index: usize) -> u32 {
        self.get(ProgressKey::AnswerCount(index))
            .and_then(as_count)
            .unwrap_or(0)
    }

    /// Count a correct reverse-quiz answer
    ///
    /// Reaching `threshold` sets the reverse mastery flag.
    pub fn record_correct_answer(&mut self, index: usize, threshold: u32) -> AnswerProgress {
        let count = self.answer_count(index).saturating_add(1);
        self.set(ProgressKey::AnswerCount(index), Value::from(count));

        let newly_mastered = count >= threshold && self.mark_mastered(PracticeMode::Reverse, index);

        AnswerProgress {
            count,
            newly_mastered,
        }
    }

    /// Clear the whole record
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    /// Largest sentence index referenced by any typed key
    pub fn max_index(&self) -> Option<usize> {
        self.entries
            .keys()
            .filter_map(|k| k.parse::<ProgressKey>().ok())
            .map(|k| k.index())
            .max()
    }

    /// Mastery summary over all three modes
    pub fn summary(&self, sentence_count: usize) -> MasterySummary {
        let total = sentence_count * PracticeMode::all().len();
        let mastered = (0..sentence_count)
            .flat_map(|i| PracticeMode::all().iter().map(move |m| (*m, i)))
            .filter(|(mode, i)| self.is_mastered(*mode, *i))
            .count();

        let percentage = if total > 0 {
            ((mastered as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };

        let tier = if percentage < 33 {
            ProgressTier::Low
        } else if percentage < 66 {
            ProgressTier::Medium
        } else {
            ProgressTier::High
        };

        MasterySummary {
            mastered,
            total,
            percentage,
            tier,
            complete: total > 0 && mastered == total,
        }
    }
}

impl From<BTreeMap<String, Value>> for ProgressRecord {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_count(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_roundtrip() {
        let keys = [
            ProgressKey::Mastered(PracticeMode::Sentence, 0),
            ProgressKey::Mastered(PracticeMode::Blank, 4),
            ProgressKey::Mastered(PracticeMode::Reverse, 12),
            ProgressKey::SpacedLevel(3),
            ProgressKey::LastReview(3),
            ProgressKey::AnswerCount(7),
        ];
        for key in keys {
            assert_eq!(key.to_string().parse::<ProgressKey>(), Ok(key));
        }

        assert_eq!(ProgressKey::SpacedLevel(3).to_string(), "spaced_3_level");
        assert!("spaced_x_level".parse::<ProgressKey>().is_err());
        assert!("theme".parse::<ProgressKey>().is_err());
        assert!("quiz_1".parse::<ProgressKey>().is_err());
    }

    #[test]
    fn test_mastery_is_monotonic() {
        let mut record = ProgressRecord::new();
        assert!(!record.is_mastered(PracticeMode::Sentence, 0));

        assert!(record.mark_mastered(PracticeMode::Sentence, 0));
        assert!(!record.mark_mastered(PracticeMode::Sentence, 0));
        assert!(record.is_mastered(PracticeMode::Sentence, 0));
        assert!(!record.is_mastered(PracticeMode::Blank, 0));

        record.reset();
        assert!(!record.is_mastered(PracticeMode::Sentence, 0));
        assert!(record.is_empty());
    }

    #[test]
    fn test_record_correct_answer() {
        let mut record = ProgressRecord::new();

        let first = record.record_correct_answer(2, 3);
        assert_eq!(first, AnswerProgress { count: 1, newly_mastered: false });
        record.record_correct_answer(2, 3);
        let third = record.record_correct_answer(2, 3);
        assert_eq!(third, AnswerProgress { count: 3, newly_mastered: true });
        assert!(record.is_mastered(PracticeMode::Reverse, 2));

        let fourth = record.record_correct_answer(2, 3);
        assert_eq!(fourth.count, 4);
        assert!(!fourth.newly_mastered);
    }

    #[test]
    fn test_spaced_fields() {
        let mut record = ProgressRecord::new();
        assert_eq!(record.spaced_level(0), 0);
        assert!(record.last_review(0).is_none());

        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        record.set_spaced(0, 2, at);
        assert_eq!(record.spaced_level(0), 2);
        assert_eq!(record.last_review(0), Some(at));
        assert_eq!(
            record.get_raw("spaced_0_last_review"),
            Some(&Value::String("2024-03-01T12:00:00.000Z".to_string()))
        );
    }

    #[test]
    fn test_bad_timestamp_is_absent() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"spaced_0_last_review": "yesterday"}"#).unwrap();
        assert!(record.last_review(0).is_none());
    }

    #[test]
    fn test_unknown_keys_preserved() {
        let json = r#"{"sentence_0":true,"custom_flag":"keep me","spaced_0_level":1}"#;
        let mut record: ProgressRecord = serde_json::from_str(json).unwrap();
        record.mark_mastered(PracticeMode::Blank, 0);

        let out = serde_json::to_value(&record).unwrap();
        assert_eq!(out["custom_flag"], "keep me");
        assert_eq!(out["sentence_0"], true);
        assert_eq!(out["blank_0"], true);
        assert_eq!(out["spaced_0_level"], 1);
    }

    #[test]
    fn test_summary() {
        let mut record = ProgressRecord::new();
        let empty = record.summary(0);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.percentage, 0);
        assert!(!empty.complete);

        record.mark_mastered(PracticeMode::Sentence, 0);
        let low = record.summary(2);
        assert_eq!(low.mastered, 1);
        assert_eq!(low.total, 6);
        assert_eq!(low.percentage, 17);
        assert_eq!(low.tier, ProgressTier::Low);

        record.mark_mastered(PracticeMode::Blank, 0);
        assert_eq!(record.summary(2).tier, ProgressTier::Medium);

        for mode in PracticeMode::all() {
            record.mark_mastered(*mode, 1);
        }
        record.mark_mastered(PracticeMode::Reverse, 0);
        let full = record.summary(2);
        assert_eq!(full.percentage, 100);
        assert_eq!(full.tier, ProgressTier::High);
        assert!(full.complete);
    }

    #[test]
    fn test_max_index() {
        let mut record = ProgressRecord::new();
        assert_eq!(record.max_index(), None);
        record.mark_mastered(PracticeMode::Sentence, 4);
        record.set_spaced(9, 1, Utc::now());
        assert_eq!(record.max_index(), Some(9));
    }
}
