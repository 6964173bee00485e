//! Test scoring
//!
//! Two scorers share the attempt format:
//!
//! - `score_locally`: all-or-nothing, used by the client when the backend
//!   cannot evaluate a test
//! - `evaluate_attempt`: partial credit for correct words, near-miss
//!   spellings and word order, used by the backend

use regex::Regex;
use std::sync::OnceLock;

use crate::assessment::types::TestAttempt;

/// Minimum similarity for a word to count as a misspelling
pub const CLOSE_MATCH_CUTOFF: f64 = 0.8;

/// Points available for words; the rest is for word order
const WORD_POINTS: f64 = 8.0;
const ORDER_POINTS: f64 = 2.0;

/// Detail notes shown after the headline feedback
const MAX_DETAILS: usize = 3;

fn word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\b\w+\b").expect("word pattern is valid"))
}

/// Round half to even
pub fn round_half_even(x: f64) -> f64 {
    let rounded = x.round();
    if (x - x.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded - x.signum()
    } else {
        rounded
    }
}

/// Percentage of `earned` over `possible`, halves rounding up
fn percent_score(earned: u32, possible: u32) -> u32 {
    if possible == 0 {
        return 0;
    }
    (earned as f64 / possible as f64 * 100.0 + 0.5).floor() as u32
}

/// Binary scoring: an exact case-insensitive match earns full points
pub fn score_locally(attempt: &mut TestAttempt) {
    for q in attempt.questions.iter_mut() {
        if q.user_answer.to_lowercase() == q.dutch.to_lowercase() {
            q.points = q.max_points;
            q.feedback = Some("Perfect!".to_string());
        } else {
            q.points = 0;
            q.feedback = Some("Incorrect".to_string());
        }
    }

    attempt.score = percent_score(attempt.earned_points(), attempt.total_points);
    tracing::debug!(score = attempt.score, "Scored test locally");
}

/// Score a single answer with partial credit
///
/// Returns the points (0 to 10) and a feedback line.
pub fn evaluate_answer(user_answer: &str, correct_answer: &str) -> (u32, String) {
    if user_answer.trim().is_empty() {
        return (0, "No answer provided".to_string());
    }

    let user_lower = user_answer.to_lowercase();
    let correct_lower = correct_answer.to_lowercase();

    if user_lower == correct_lower {
        return (10, "Perfect!".to_string());
    }

    let mut user_words: Vec<&str> = word_pattern()
        .find_iter(&user_lower)
        .map(|m| m.as_str())
        .collect();
    let correct_words: Vec<&str> = word_pattern()
        .find_iter(&correct_lower)
        .map(|m| m.as_str())
        .collect();

    let mut matched = 0.0;
    let mut details = Vec::new();

    for word in &correct_words {
        if let Some(pos) = user_words.iter().position(|w| w == word) {
            matched += 1.0;
            user_words.remove(pos);
        } else if let Some(close) = closest_match(word, &user_words, CLOSE_MATCH_CUTOFF) {
            matched += 0.5;
            details.push(format!("'{}' should be '{}'", user_words[close], word));
            user_words.remove(close);
        } else {
            details.push(format!("Missing word: '{}'", word));
        }
    }

    for word in &user_words {
        details.push(format!("Extra word: '{}'", word));
    }

    let word_score = if correct_words.is_empty() {
        0
    } else {
        round_half_even(matched / correct_words.len() as f64 * WORD_POINTS).min(WORD_POINTS) as u32
    };

    let order_score = if word_score > 0 {
        round_half_even(similarity_ratio(&user_lower, &correct_lower) * ORDER_POINTS) as u32
    } else {
        0
    };

    let total = word_score + order_score;

    let mut feedback = if total >= 9 {
        "Almost perfect! Minor issues with spelling or word order."
    } else if total >= 7 {
        "Good attempt! Most words correct but some issues."
    } else if total >= 5 {
        "Partial credit. Some correct words but needs improvement."
    } else if total > 0 {
        "Few correct words but significant errors."
    } else {
        "Completely incorrect answer."
    }
    .to_string();

    if !details.is_empty() {
        feedback.push(' ');
        feedback.push_str(&details[..details.len().min(MAX_DETAILS)].join(" "));
        if details.len() > MAX_DETAILS {
            feedback.push_str(" and other issues.");
        }
    }

    (total, feedback)
}

/// Score every question of an attempt with partial credit
///
/// `total_points` becomes the sum of the questions' `max_points`.
pub fn evaluate_attempt(attempt: &mut TestAttempt) {
    let mut earned = 0;
    let mut possible = 0;

    for q in attempt.questions.iter_mut() {
        let (points, feedback) = evaluate_answer(&q.user_answer, &q.dutch);
        q.points = points;
        q.feedback = Some(feedback);
        earned += points;
        possible += q.max_points;
    }

    attempt.score = if possible > 0 {
        round_half_even(earned as f64 / possible as f64 * 100.0) as u32
    } else {
        0
    };
    attempt.total_points = possible;
}

/// Index of the candidate most similar to `word`, if above `cutoff`
///
/// Ties go to the lexicographically greatest candidate.
fn closest_match(word: &str, candidates: &[&str], cutoff: f64) -> Option<usize> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| (similarity_ratio(c, word), *c, i))
        .filter(|(ratio, _, _)| *ratio >= cutoff)
        .max_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(b.1)))
        .map(|(_, _, i)| i)
}

/// Ratcliff/Obershelp similarity, `2 * matches / total length`
///
/// Two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Characters covered by recursively found longest common blocks
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }
    size + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + size..], &b[j + size..])
}

/// Longest common substring, earliest in `a` then earliest in `b`
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            let k = curr[j + 1];
            if k > best.2 {
                best = (i + 1 - k, j + 1 - k, k);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::types::{TestAttempt, TestQuestion};
    use chrono::Utc;

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(0.5), 0.0);
        assert_eq!(round_half_even(1.5), 2.0);
        assert_eq!(round_half_even(2.5), 2.0);
        assert_eq!(round_half_even(2.4), 2.0);
        assert_eq!(round_half_even(2.6), 3.0);
        assert_eq!(round_half_even(7.0), 7.0);
    }

    #[test]
    fn test_similarity_ratio() {
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("abc", ""), 0.0);
        assert_eq!(similarity_ratio("huis", "huis"), 1.0);
        // "abcd" vs "bcde": common block "bcd"
        assert!((similarity_ratio("abcd", "bcde") - 0.75).abs() < 1e-9);
        // woon / wonn: "wo" + "n"
        assert!((similarity_ratio("wonn", "woon") - 0.75).abs() < 1e-9);
        assert!((similarity_ratio("rotterdm", "rotterdam") - 16.0 / 17.0).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_empty_and_exact() {
        assert_eq!(evaluate_answer("", "Ik ben Inge"), (0, "No answer provided".to_string()));
        assert_eq!(evaluate_answer("   ", "Ik ben Inge"), (0, "No answer provided".to_string()));
        assert_eq!(evaluate_answer("ik BEN inge", "Ik ben Inge"), (10, "Perfect!".to_string()));
    }

    #[test]
    fn test_evaluate_misspelling() {
        let (points, feedback) = evaluate_answer("Ik woon in Rotterdm", "Ik woon in Rotterdam");
        // 3.5 of 4 words -> 7 word points, plus 2 for order
        assert_eq!(points, 9);
        assert_eq!(
            feedback,
            "Almost perfect! Minor issues with spelling or word order. 'rotterdm' should be 'rotterdam'"
        );
    }

    #[test]
    fn test_evaluate_missing_and_extra() {
        let (points, feedback) = evaluate_answer("Ik ben hier", "Ik ben Inge");
        // 2 of 3 words -> round(5.33) = 5 word points
        assert!(points >= 5 && points < 10);
        assert!(feedback.contains("Missing word: 'inge'"));
        assert!(feedback.contains("Extra word: 'hier'"));
    }

    #[test]
    fn test_evaluate_completely_wrong() {
        let (points, feedback) = evaluate_answer("xyz", "Ik ben Inge");
        assert_eq!(points, 0);
        assert!(feedback.starts_with("Completely incorrect answer."));
        assert!(feedback.ends_with(" and other issues."));
    }

    #[test]
    fn test_score_locally_is_binary() {
        let questions = vec![
            TestQuestion::new("I am Inge", "Ik ben Inge"),
            TestQuestion::new("I live in Rotterdam", "Ik woon in Rotterdam"),
            TestQuestion::new("Hello", "Hallo"),
        ];
        let answers = vec![
            "ik ben inge".to_string(),
            "Ik woon in Rotterdm".to_string(),
            String::new(),
        ];
        let mut attempt = TestAttempt::new(&questions, &answers, 10, Utc::now());
        score_locally(&mut attempt);

        let points: Vec<u32> = attempt.questions.iter().map(|q| q.points).collect();
        assert_eq!(points, vec![10, 0, 0]);
        assert_eq!(attempt.score, 33);
        assert_eq!(attempt.questions[1].feedback.as_deref(), Some("Incorrect"));
    }

    #[test]
    fn test_evaluate_attempt_gives_partial_credit() {
        let questions = vec![
            TestQuestion::new("I am Inge", "Ik ben Inge"),
            TestQuestion::new("I live in Rotterdam", "Ik woon in Rotterdam"),
        ];
        let answers = vec!["Ik ben Inge".to_string(), "Ik woon in Rotterdm".to_string()];
        let mut attempt = TestAttempt::new(&questions, &answers, 10, Utc::now());
        evaluate_attempt(&mut attempt);

        assert_eq!(attempt.questions[0].points, 10);
        assert_eq!(attempt.questions[1].points, 9);
        assert_eq!(attempt.total_points, 20);
        assert_eq!(attempt.score, 95);
    }

    #[test]
    fn test_evaluate_empty_attempt() {
        let mut attempt = TestAttempt::new(&[], &[], 10, Utc::now());
        evaluate_attempt(&mut attempt);
        assert_eq!(attempt.score, 0);
        assert_eq!(attempt.total_points, 0);
    }
}
