//! Wordbank parsing
//!
//! The wordbank is a markdown file with one bullet per word:
//!
//! ```text
//! - **huis** 🟥 *house*
//! ```

use regex::Regex;
use std::sync::OnceLock;

use crate::practice::types::{Difficulty, WordEntry};

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"- \*\*(.*?)\*\*\s+(\x{1F7E5}|\x{1F7E8}|\x{1F7E7}|\x{1F7E9}|\x{2B1C}\x{FE0F}?)\s+\*(.*?)\*")
            .expect("wordbank pattern is valid")
    })
}

/// Parse every wordbank line into a `WordEntry`
///
/// Lines that do not match the bullet format are ignored.
pub fn parse_wordbank(content: &str) -> Vec<WordEntry> {
    let words: Vec<WordEntry> = content
        .lines()
        .filter_map(parse_line)
        .collect();

    tracing::debug!(count = words.len(), "Parsed wordbank");
    words
}

fn parse_line(line: &str) -> Option<WordEntry> {
    let caps = entry_pattern().captures(line)?;
    let difficulty: Difficulty = caps.get(2)?.as_str().parse().ok()?;

    Some(WordEntry {
        dutch: caps.get(1)?.as_str().trim().to_string(),
        english: caps.get(3)?.as_str().trim().to_string(),
        difficulty,
    })
}

/// Append a word to wordbank markdown, one line per entry
pub fn append_entry(content: &mut String, entry: &WordEntry) {
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&entry.to_markdown_line());
    content.push('\n');
}
