//! Test generation
//!
//! Questions come from the `| Dutch | English |` table of a lesson. Each
//! cell is split into sentences and paired positionally with the other
//! column, then a random subset is drawn.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::assessment::types::{GeneratedTest, TestQuestion};

/// Default number of questions per test
pub const DEFAULT_TEST_SIZE: usize = 10;

const TABLE_HEADER: &str = "| Dutch | English |\n";

/// Extract every sentence pair from the lesson's Dutch/English table
///
/// Returns an empty list when the lesson has no such table.
pub fn extract_test_pairs(content: &str) -> Vec<TestQuestion> {
    let content = content.replace("\r\n", "\n");

    let Some(body) = find_table_body(&content) else {
        tracing::debug!("No Dutch/English table found in lesson");
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for row in body.trim().split('\n') {
        let columns: Vec<&str> = row.split('|').skip(1).take(2).map(str::trim).collect();
        let [dutch, english] = columns.as_slice() else {
            tracing::warn!(row, "Invalid table row");
            continue;
        };

        let dutch_sentences = split_on_terminators(dutch);
        let english_sentences = split_on_terminators(english);

        pairs.extend(
            dutch_sentences
                .into_iter()
                .zip(english_sentences)
                .map(|(d, e)| TestQuestion::new(e, d)),
        );
    }

    tracing::debug!(count = pairs.len(), "Extracted sentence pairs");
    pairs
}

/// Rows after the header and separator, up to a blank line or the end
fn find_table_body(content: &str) -> Option<&str> {
    for (pos, _) in content.match_indices(TABLE_HEADER) {
        let rest = &content[pos + TABLE_HEADER.len()..];
        let Some((separator, body)) = rest.split_once('\n') else {
            continue;
        };
        if !is_separator_row(separator) {
            continue;
        }

        let end = body.find("\n\n").unwrap_or(body.len());
        return Some(&body[..end]);
    }
    None
}

/// `|---|---|` style row: pipes, dashes and spaces only
fn is_separator_row(line: &str) -> bool {
    line.len() >= 5
        && line.starts_with('|')
        && line.ends_with('|')
        && line.chars().all(|c| matches!(c, '|' | '-' | ' '))
        && line.matches('|').count() >= 3
}

/// Split on runs of `.`, `!` and `?`, dropping empty pieces
fn split_on_terminators(text: &str) -> Vec<&str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Draw up to `size` distinct questions from the lesson
pub fn generate_test<R: Rng + ?Sized>(content: &str, size: usize, rng: &mut R) -> GeneratedTest {
    let pairs = extract_test_pairs(content);

    let questions = if pairs.len() > size {
        pairs.choose_multiple(rng, size).cloned().collect()
    } else {
        pairs
    };

    GeneratedTest { questions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const LESSON: &str = "# Les 2\n\
        \n\
        | Dutch | English |\n\
        |-------|---------|\n\
        | Ik ben Inge. Ik woon in Rotterdam! | I am Inge. I live in Rotterdam! |\n\
        | Hoe gaat het? | How are you? |\n\
        | Alleen Nederlands. Extra zin. | Only Dutch. |\n\
        \n\
        | Dutch | English |\n\
        | not | a table |\n";

    #[test]
    fn test_extract_pairs() {
        let pairs = extract_test_pairs(LESSON);
        assert_eq!(
            pairs,
            vec![
                TestQuestion::new("I am Inge", "Ik ben Inge"),
                TestQuestion::new("I live in Rotterdam", "Ik woon in Rotterdam"),
                TestQuestion::new("How are you", "Hoe gaat het"),
                TestQuestion::new("Only Dutch", "Alleen Nederlands"),
            ]
        );
    }

    #[test]
    fn test_crlf_and_end_of_text() {
        let lesson = "| Dutch | English |\r\n| --- | --- |\r\n| Hallo. | Hello. |";
        let pairs = extract_test_pairs(lesson);
        assert_eq!(pairs, vec![TestQuestion::new("Hello", "Hallo")]);
    }

    #[test]
    fn test_no_table() {
        assert!(extract_test_pairs("no table here").is_empty());
        assert!(extract_test_pairs("| Dutch | English |\nno separator\n| a | b |").is_empty());

        let mut rng = StdRng::seed_from_u64(7);
        assert!(generate_test("", DEFAULT_TEST_SIZE, &mut rng).questions.is_empty());
    }

    #[test]
    fn test_sampling() {
        let mut lesson = String::from("| Dutch | English |\n|---|---|\n");
        for i in 0..25 {
            lesson.push_str(&format!("| Zin {i}. | Sentence {i}. |\n"));
        }

        let mut rng = StdRng::seed_from_u64(42);
        let test = generate_test(&lesson, DEFAULT_TEST_SIZE, &mut rng);
        assert_eq!(test.questions.len(), 10);

        let distinct: HashSet<&str> = test.questions.iter().map(|q| q.dutch.as_str()).collect();
        assert_eq!(distinct.len(), 10);
        for q in &test.questions {
            let n = q.dutch.trim_start_matches("Zin ");
            assert_eq!(q.english, format!("Sentence {n}"));
        }

        // Small lessons are returned whole
        let test = generate_test(LESSON, DEFAULT_TEST_SIZE, &mut rng);
        assert_eq!(test.questions.len(), 4);
    }
}
