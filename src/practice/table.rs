//! Sentence tables
//!
//! Lessons carry a two-column markdown table, target language on the left
//! and native language on the right:
//!
//! ```text
//! | Target Language | Native Language |
//! |-----------------|-----------------|
//! | Ik ben Inge. Ik woon in Rotterdam. | I am Inge. I live in Rotterdam. |
//! ```
//!
//! Each cell may hold several sentences; they are split apart and paired
//! positionally.

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::practice::types::SentencePair;

/// Proper nouns that always count as keywords
pub const COMMON_KEYWORDS: &[&str] = &[
    "Inge",
    "Paula",
    "Alex",
    "Den Haag",
    "Rotterdam",
    "Frankrijk",
    "China",
    "Marktstraat",
];

/// Parse the `Target Language | Native Language` table of a lesson
pub fn parse_sentence_table(content: &str) -> Vec<SentencePair> {
    let mut sentences = Vec::new();
    let mut in_table = false;
    let mut header_done = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('|')
            && line.contains("Target Language")
            && line.contains("Native Language")
        {
            in_table = true;
            header_done = false;
            continue;
        }

        if !in_table || !line.starts_with('|') {
            continue;
        }

        if !header_done && line.contains("---") {
            header_done = true;
            continue;
        }

        let columns: Vec<&str> = line
            .trim_matches('|')
            .split('|')
            .map(str::trim)
            .collect();
        if columns.len() < 2 {
            continue;
        }

        let mut targets = split_sentences(columns[0]);
        let mut natives = split_sentences(columns[1]);
        let len = targets.len().max(natives.len());
        targets.resize(len, String::new());
        natives.resize(len, String::new());

        for (target, native) in targets.into_iter().zip(natives) {
            if !target.is_empty() || !native.is_empty() {
                sentences.push(SentencePair::new(target.trim(), native.trim()));
            }
        }
    }

    if sentences.is_empty() {
        tracing::warn!("No valid table or sentences found in lesson content");
    }

    sentences
}

/// Parse a table pasted by the user
///
/// The first two lines (header and separator) are skipped. A row is kept
/// only when both cells are non-empty.
pub fn parse_pasted_table(text: &str) -> Vec<SentencePair> {
    text.trim()
        .split('\n')
        .skip(2)
        .filter_map(|line| {
            let columns: Vec<&str> = line.split('|').map(str::trim).collect();
            match columns.as_slice() {
                [_, target, native, ..] if !target.is_empty() && !native.is_empty() => {
                    Some(SentencePair::new(*target, *native))
                }
                _ => None,
            }
        })
        .collect()
}

/// Split a cell at the whitespace following `.`, `!` or `?`
///
/// An empty cell yields a single empty sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let text = text.trim();
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            while chars.peek().is_some_and(|next| next.is_whitespace()) {
                chars.next();
            }
            parts.push(std::mem::take(&mut current));
            prev = None;
            continue;
        }
        current.push(c);
        prev = Some(c);
    }
    parts.push(current);

    parts
}

/// Collect keywords from target-language text
///
/// A keyword is a title-case word or one of the common proper nouns.
/// The result is deduplicated and sorted.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let keywords: BTreeSet<String> = text
        .split_whitespace()
        .filter(|word| COMMON_KEYWORDS.contains(word) || is_title(word))
        .map(str::to_string)
        .collect();

    keywords.into_iter().collect()
}

/// Title case: every cased run starts upper and continues lower
fn is_title(word: &str) -> bool {
    let mut seen_cased = false;
    let mut prev_cased = false;

    for c in word.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            prev_cased = true;
            seen_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            prev_cased = true;
            seen_cased = true;
        } else {
            prev_cased = false;
        }
    }

    seen_cased
}

/// Wrap every whole-word occurrence of each keyword
///
/// Matching is case-insensitive; `wrap` receives the text as it appears in
/// the sentence.
pub fn highlight_keywords<F>(sentence: &str, keywords: &[String], wrap: F) -> String
where
    F: Fn(&str) -> String,
{
    let mut highlighted = sentence.to_string();

    for keyword in keywords.iter().filter(|k| !k.is_empty()) {
        let pattern = format!(r"\b{}\b", regex::escape(keyword));
        let Ok(re) = RegexBuilder::new(&pattern).case_insensitive(true).build() else {
            continue;
        };
        highlighted = re
            .replace_all(&highlighted, |caps: &regex::Captures| wrap(&caps[0]))
            .into_owned();
    }

    highlighted
}

/// Estimated difficulty of a lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DifficultyLevel::Beginner => "Beginner",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        };
        f.write_str(name)
    }
}

/// Estimate the difficulty from sentence length and vocabulary size
///
/// Returns `None` for a lesson without sentences.
pub fn estimate_level(sentences: &[SentencePair]) -> Option<DifficultyLevel> {
    if sentences.is_empty() {
        return None;
    }

    let total_words: usize = sentences
        .iter()
        .filter(|s| !s.target_lang.is_empty())
        .map(|s| s.target_lang.split(' ').count())
        .sum();
    let avg_length = total_words as f64 / sentences.len() as f64;

    let unique_words: HashSet<&str> = sentences
        .iter()
        .filter(|s| !s.target_lang.is_empty())
        .flat_map(|s| s.target_lang.split(' '))
        .collect();
    let unique = unique_words.len();

    let level = if avg_length > 10.0 || unique > 100 {
        DifficultyLevel::Advanced
    } else if avg_length > 5.0 || unique > 50 {
        DifficultyLevel::Intermediate
    } else {
        DifficultyLevel::Beginner
    };

    Some(level)
}

/// Find the translation of a target-language sentence
pub fn translate<'a>(sentences: &'a [SentencePair], sentence: &str) -> Option<&'a str> {
    sentences
        .iter()
        .find(|s| s.target_lang == sentence)
        .map(|s| s.native_lang.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LESSON: &str = "# Les 1\n\
        \n\
        | Target Language | Native Language |\n\
        |---|---|\n\
        | Ik ben Inge. Ik woon in Rotterdam. | I am Inge. I live in Rotterdam. |\n\
        | Hoe gaat het? | How are you? Fine. |\n\
        \n\
        Some notes after the table.\n";

    #[test]
    fn test_parse_sentence_table() {
        let sentences = parse_sentence_table(LESSON);
        assert_eq!(sentences.len(), 4);
        assert_eq!(sentences[0], SentencePair::new("Ik ben Inge.", "I am Inge."));
        assert_eq!(
            sentences[1],
            SentencePair::new("Ik woon in Rotterdam.", "I live in Rotterdam.")
        );
        // Shorter side is padded
        assert_eq!(sentences[2], SentencePair::new("Hoe gaat het?", "How are you?"));
        assert_eq!(sentences[3], SentencePair::new("", "Fine."));
    }

    #[test]
    fn test_parse_without_table() {
        assert!(parse_sentence_table("just text").is_empty());
        assert!(parse_sentence_table("| a | b |\n|---|---|\n| x | y |").is_empty());
    }

    #[test]
    fn test_split_sentences() {
        assert_eq!(
            split_sentences("Hallo!  Wie ben jij? Ik"),
            vec!["Hallo!", "Wie ben jij?", "Ik"]
        );
        assert_eq!(split_sentences("1.5 liter"), vec!["1.5 liter"]);
        assert_eq!(split_sentences(""), vec![""]);
    }

    #[test]
    fn test_parse_pasted_table() {
        let text = "| Dutch | English |\n|---|---|\n| Goedemorgen | Good morning |\n| Leeg | |\n";
        let sentences = parse_pasted_table(text);
        assert_eq!(sentences, vec![SentencePair::new("Goedemorgen", "Good morning")]);
    }

    #[test]
    fn test_extract_keywords() {
        let keywords = extract_keywords("Ik ben Inge en ik woon in Rotterdam. NL is klein. Inge");
        assert_eq!(keywords, vec!["Ik", "Inge", "Rotterdam."]);
    }

    #[test]
    fn test_is_title() {
        assert!(is_title("Hallo"));
        assert!(is_title("Hallo,"));
        assert!(is_title("Jan-Peter"));
        assert!(!is_title("NL"));
        assert!(!is_title("hallo"));
        assert!(!is_title("123"));
    }

    #[test]
    fn test_highlight_keywords() {
        let keywords = vec!["inge".to_string(), "Rotterdam".to_string()];
        let out = highlight_keywords("Inge woont in Rotterdam, niet Ingeborg.", &keywords, |w| {
            format!("<strong>{}</strong>", w)
        });
        assert_eq!(
            out,
            "<strong>Inge</strong> woont in <strong>Rotterdam</strong>, niet Ingeborg."
        );
    }

    #[test]
    fn test_estimate_level() {
        assert_eq!(estimate_level(&[]), None);

        let short = vec![SentencePair::new("Ik ben Inge.", "I am Inge.")];
        assert_eq!(estimate_level(&short), Some(DifficultyLevel::Beginner));

        let medium = vec![SentencePair::new(
            "Ik woon al zes jaar in Rotterdam.",
            "I have lived in Rotterdam for six years.",
        )];
        assert_eq!(estimate_level(&medium), Some(DifficultyLevel::Intermediate));

        let long = vec![SentencePair::new(
            "een twee drie vier vijf zes zeven acht negen tien elf",
            "",
        )];
        assert_eq!(estimate_level(&long), Some(DifficultyLevel::Advanced));
    }

    #[test]
    fn test_translate() {
        let sentences = parse_sentence_table(LESSON);
        assert_eq!(translate(&sentences, "Ik ben Inge."), Some("I am Inge."));
        assert_eq!(translate(&sentences, "Onbekend."), None);
    }
}
