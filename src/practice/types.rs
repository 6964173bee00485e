//! Core data types for the practice layer
//!
//! - `WordEntry`: a vocabulary line of the wordbank
//! - `Difficulty`: the colored marker written in front of a definition
//! - `BlankEntry`: a wordbank line usable for fill-in-the-blank drills
//! - `SentencePair`: one sentence of a lesson table with its translation
//! - `TypoEntry`: a mistake logged for personalized review

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::practice::error::PracticeError;

/// Difficulty marker of a wordbank entry
///
/// Serialized as the emoji itself, which is what the wordbank markdown and
/// the backend exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Difficulty {
    /// 🟥
    Hard,
    /// 🟧
    Difficult,
    /// 🟨
    Moderate,
    /// 🟩
    Easy,
    /// ⬜️
    New,
}

impl Difficulty {
    /// Get all markers for iteration
    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Hard,
            Difficulty::Difficult,
            Difficulty::Moderate,
            Difficulty::Easy,
            Difficulty::New,
        ]
    }

    /// The emoji written in the wordbank
    pub fn marker(&self) -> &'static str {
        match self {
            Difficulty::Hard => "\u{1F7E5}",
            Difficulty::Difficult => "\u{1F7E7}",
            Difficulty::Moderate => "\u{1F7E8}",
            Difficulty::Easy => "\u{1F7E9}",
            Difficulty::New => "\u{2B1C}\u{FE0F}",
        }
    }

    /// Marker without the emoji variation selector
    fn bare_marker(&self) -> &'static str {
        self.marker().trim_end_matches('\u{FE0F}')
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}

impl FromStr for Difficulty {
    type Err = PracticeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bare = s.trim().trim_end_matches('\u{FE0F}');
        Difficulty::all()
            .iter()
            .find(|d| d.bare_marker() == bare)
            .copied()
            .ok_or_else(|| PracticeError::InvalidDifficulty(s.to_string()))
    }
}

impl TryFrom<String> for Difficulty {
    type Error = PracticeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.marker().to_string()
    }
}

/// A vocabulary entry of the wordbank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Target-language word
    pub dutch: String,
    /// Translation or definition
    pub english: String,
    /// Difficulty marker
    pub difficulty: Difficulty,
}

impl WordEntry {
    pub fn new(dutch: impl Into<String>, english: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            dutch: dutch.into(),
            english: english.into(),
            difficulty,
        }
    }

    /// Render as a wordbank bullet line (without trailing newline)
    pub fn to_markdown_line(&self) -> String {
        format!("- **{}** {} *{}*", self.dutch, self.difficulty, self.english)
    }
}

/// A wordbank line that carries an example sentence containing the word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlankEntry {
    pub word: String,
    pub definition: String,
    pub example: String,
    pub full_line: String,
}

/// One sentence of a lesson table and its translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePair {
    pub target_lang: String,
    pub native_lang: String,
}

impl SentencePair {
    pub fn new(target_lang: impl Into<String>, native_lang: impl Into<String>) -> Self {
        Self {
            target_lang: target_lang.into(),
            native_lang: native_lang.into(),
        }
    }
}

/// A typing mistake kept for personalized practice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypoEntry {
    pub user_answer: String,
    pub correct_answer: String,
    pub english: String,
    pub timestamp: DateTime<Utc>,
}

impl TypoEntry {
    /// Session-level dedup key
    pub fn key(&self) -> String {
        format!("{}|{}", self.user_answer, self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse() {
        assert_eq!("\u{1F7E5}".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("\u{1F7E9}".parse::<Difficulty>(), Ok(Difficulty::Easy));
        // White square with and without variation selector
        assert_eq!("\u{2B1C}\u{FE0F}".parse::<Difficulty>(), Ok(Difficulty::New));
        assert_eq!("\u{2B1C}".parse::<Difficulty>(), Ok(Difficulty::New));
        assert!("x".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_difficulty_serde() {
        let json = serde_json::to_string(&Difficulty::Moderate).unwrap();
        assert_eq!(json, "\"\u{1F7E8}\"");

        let parsed: Difficulty = serde_json::from_str("\"\u{1F7E7}\"").unwrap();
        assert_eq!(parsed, Difficulty::Difficult);

        assert!(serde_json::from_str::<Difficulty>("\"red\"").is_err());
    }

    #[test]
    fn test_word_entry_line() {
        let entry = WordEntry::new("huis", "house", Difficulty::Hard);
        assert_eq!(entry.to_markdown_line(), "- **huis** \u{1F7E5} *house*");
    }

    #[test]
    fn test_typo_wire_names() {
        let typo = TypoEntry {
            user_answer: "huiss".to_string(),
            correct_answer: "huis".to_string(),
            english: "house".to_string(),
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&typo).unwrap();
        assert_eq!(value["userAnswer"], "huiss");
        assert_eq!(value["correctAnswer"], "huis");
        assert_eq!(typo.key(), "huiss|huis");
    }
}
