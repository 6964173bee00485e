//! Fill-in-the-blank exercise
//!
//! Built from wordbank lines that carry a quoted example sentence:
//!
//! ```text
//! - **huis** 🟥 *a house; "Dit is mijn huis." (This is my house)*
//! ```
//!
//! The word is blanked out of the example and the first clause of the
//! definition is shown as a hint. Entries are practiced in file order.

use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

use crate::practice::error::{PracticeError, PracticeResult};
use crate::practice::percent;
use crate::practice::types::{BlankEntry, Difficulty, WordEntry};

/// Placeholder written in place of the hidden word
pub const BLANK: &str = "_____";

/// Hint used when a line has no definition
pub const NO_DEFINITION: &str = "No definition available";

/// Inline message shown when saving a missed word fails
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save word";

fn example_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("example pattern is valid"))
}

/// Parse wordbank content into blank entries
///
/// Lines without an example, or whose example does not contain the word,
/// are skipped.
pub fn parse_blank_entries(content: &str) -> Vec<BlankEntry> {
    let entries: Vec<BlankEntry> = content
        .split('\n')
        .filter(|line| line.trim().starts_with("- **") && line.contains('*'))
        .filter_map(parse_blank_line)
        .collect();

    tracing::debug!(count = entries.len(), "Parsed fill-in-the-blank entries");
    entries
}

fn parse_blank_line(line: &str) -> Option<BlankEntry> {
    let word_start = line.find("**")? + 2;
    let word_end = word_start + line[word_start..].find("**")?;
    let word = &line[word_start..word_end];

    let example = example_pattern()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");

    if word.is_empty() || example.is_empty() {
        tracing::debug!(line, "Skipping wordbank line without word or example");
        return None;
    }
    if !example.to_lowercase().contains(&word.to_lowercase()) {
        tracing::debug!(word, example, "Skipping entry whose example lacks the word");
        return None;
    }

    let definition = extract_definition(line).unwrap_or_else(|| NO_DEFINITION.to_string());

    Some(BlankEntry {
        word: word.to_string(),
        definition,
        example: example.to_string(),
        full_line: line.to_string(),
    })
}

/// Text between the `*` after the 🟥 marker and the last `*`, up to the first `;`
///
/// Only hard words carry a hint; other markers give none.
fn extract_definition(line: &str) -> Option<String> {
    let marker_pos = line.find(Difficulty::Hard.marker())?;
    let def_start = marker_pos + line[marker_pos..].find('*')? + 1;
    let def_end = line.rfind('*')?;
    if def_end <= def_start {
        return None;
    }

    let definition = line[def_start..def_end]
        .split(';')
        .next()
        .unwrap_or("")
        .trim();

    if definition.is_empty() {
        None
    } else {
        Some(definition.to_string())
    }
}

/// Replace every case-insensitive occurrence of `word` with the blank
pub fn blank_sentence(example: &str, word: &str) -> String {
    if word.is_empty() {
        return example.to_string();
    }

    match RegexBuilder::new(&regex::escape(word))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.replace_all(example, BLANK).into_owned(),
        Err(e) => {
            tracing::warn!(word, error = %e, "Could not build blank pattern");
            example.to_string()
        }
    }
}

/// The question currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankQuestion {
    /// 1-based position in the exercise
    pub number: usize,
    pub total: usize,
    pub sentence: String,
    pub hint: String,
}

/// Outcome of checking an answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlankOutcome {
    Correct {
        word: String,
        example: String,
    },
    /// Wrong answer; `to_save` goes to the wordbank as a hard word
    Incorrect {
        word: String,
        example: String,
        to_save: WordEntry,
    },
}

impl BlankOutcome {
    pub fn is_correct(&self) -> bool {
        matches!(self, BlankOutcome::Correct { .. })
    }
}

/// End-of-exercise summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlanksSummary {
    pub score: usize,
    pub answered: usize,
    pub percentage: u32,
    pub completed: usize,
    pub total_words: usize,
    pub progress_percentage: u32,
    pub message: &'static str,
}

/// Encouragement for a final percentage
pub fn summary_message(percentage: u32) -> &'static str {
    if percentage >= 90 {
        "Excellent! Your Dutch vocabulary is outstanding!"
    } else if percentage >= 70 {
        "Great job! You're making good progress with your Dutch!"
    } else if percentage >= 50 {
        "Good effort! Keep practicing to improve your Dutch vocabulary."
    } else {
        "Keep studying! Regular practice will help you improve your Dutch skills."
    }
}

/// A sequential pass over the blank entries
#[derive(Debug, Clone)]
pub struct FillBlanksSession {
    entries: Vec<BlankEntry>,
    index: usize,
    score: usize,
    answered: usize,
}

impl FillBlanksSession {
    pub fn new(entries: Vec<BlankEntry>) -> PracticeResult<Self> {
        if entries.is_empty() {
            return Err(PracticeError::EmptyWordList);
        }
        Ok(Self {
            entries,
            index: 0,
            score: 0,
            answered: 0,
        })
    }

    /// Build a session straight from wordbank markdown
    pub fn from_wordbank(content: &str) -> PracticeResult<Self> {
        Self::new(parse_blank_entries(content))
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The current question, or `None` once every entry was answered
    pub fn current(&self) -> Option<BlankQuestion> {
        let entry = self.entries.get(self.index)?;
        Some(BlankQuestion {
            number: self.index + 1,
            total: self.entries.len(),
            sentence: blank_sentence(&entry.example, &entry.word),
            hint: entry.definition.clone(),
        })
    }

    /// Check an answer against the current entry and move on
    pub fn check(&mut self, answer: &str) -> PracticeResult<BlankOutcome> {
        let entry = self
            .entries
            .get(self.index)
            .ok_or(PracticeError::SessionFinished)?;

        self.answered += 1;
        self.index += 1;

        if answer.trim().to_lowercase() == entry.word.to_lowercase() {
            self.score += 1;
            Ok(BlankOutcome::Correct {
                word: entry.word.clone(),
                example: entry.example.clone(),
            })
        } else {
            Ok(BlankOutcome::Incorrect {
                word: entry.word.clone(),
                example: entry.example.clone(),
                to_save: WordEntry::new(&entry.word, &entry.definition, Difficulty::Hard),
            })
        }
    }

    pub fn summary(&self) -> BlanksSummary {
        let percentage = percent(self.score, self.answered);
        BlanksSummary {
            score: self.score,
            answered: self.answered,
            percentage,
            completed: self.index,
            total_words: self.entries.len(),
            progress_percentage: percent(self.index, self.entries.len()),
            message: summary_message(percentage),
        }
    }

    /// Start over from the first entry with a clean score
    pub fn restart(&mut self) {
        self.index = 0;
        self.score = 0;
        self.answered = 0;
    }
}
