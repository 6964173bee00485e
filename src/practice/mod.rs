//! Practice domain
//!
//! Pure, synchronous building blocks for the practice screens:
//!
//! - `wordbank`: parse the markdown wordbank into words
//! - `table`: sentence tables, keywords and difficulty estimate
//! - `cloze`: sentences with hidden words
//! - `progress`: the per-lesson progress record
//! - `spaced`: spaced-repetition scheduling
//! - `fill_blanks`: fill-in-the-blank exercise
//! - `vocab`: vocabulary typing practice
//! - `stats`: study statistics
//!
//! Clock values are passed in by the caller; nothing here reads the time
//! or touches the network.

pub mod cloze;
pub mod error;
pub mod fill_blanks;
pub mod progress;
pub mod spaced;
pub mod stats;
pub mod table;
pub mod types;
pub mod vocab;
pub mod wordbank;

pub use cloze::{create_blanks, BlankedSentence};
pub use error::{PracticeError, PracticeResult};
pub use fill_blanks::{BlankOutcome, BlankQuestion, BlanksSummary, FillBlanksSession};
pub use progress::{
    MasterySummary, PracticeMode, ProgressKey, ProgressRecord, ProgressTier,
    DEFAULT_MASTERY_THRESHOLD,
};
pub use spaced::{due_sentences, interval_for_level, is_due_for_review, Rating, INTERVAL_DAYS};
pub use stats::StudyStats;
pub use table::DifficultyLevel;
pub use types::{BlankEntry, Difficulty, SentencePair, TypoEntry, WordEntry};
pub use vocab::{InputCheck, SubmitOutcome, VocabSession};

/// Rounded percentage of `part` in `whole`, halves rounding up
pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0 + 0.5).floor() as u32
}
