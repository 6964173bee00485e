//! Lesson test data types
//!
//! Wire names follow the backend JSON (`user_answer`, `max_points`,
//! `total_points`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points a single question is worth unless stated otherwise
pub const DEFAULT_MAX_POINTS: u32 = 10;

fn default_max_points() -> u32 {
    DEFAULT_MAX_POINTS
}

/// A sentence to translate into the target language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestQuestion {
    pub english: String,
    pub dutch: String,
}

impl TestQuestion {
    pub fn new(english: impl Into<String>, dutch: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            dutch: dutch.into(),
        }
    }
}

/// Questions returned by `generate_test`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedTest {
    pub questions: Vec<TestQuestion>,
}

/// How a question was answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Partial,
    Incorrect,
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::Correct => "Perfect!",
            Grade::Partial => "Partially correct",
            Grade::Incorrect => "Incorrect",
        };
        f.write_str(label)
    }
}

/// One answered question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub english: String,
    pub dutch: String,
    #[serde(default)]
    pub user_answer: String,
    #[serde(default)]
    pub points: u32,
    #[serde(default = "default_max_points")]
    pub max_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl QuestionResult {
    /// An unscored answer to `question`
    pub fn unscored(question: &TestQuestion, answer: &str, max_points: u32) -> Self {
        Self {
            english: question.english.clone(),
            dutch: question.dutch.clone(),
            user_answer: answer.trim().to_string(),
            points: 0,
            max_points,
            feedback: None,
        }
    }

    pub fn grade(&self) -> Grade {
        if self.points >= self.max_points {
            Grade::Correct
        } else if self.points > 0 {
            Grade::Partial
        } else {
            Grade::Incorrect
        }
    }

    /// Stored feedback, or a label derived from the points
    pub fn display_feedback(&self) -> String {
        match &self.feedback {
            Some(feedback) if !feedback.is_empty() => feedback.clone(),
            _ => self.grade().to_string(),
        }
    }
}

/// One submitted test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestAttempt {
    /// Percent, 0 to 100
    #[serde(default)]
    pub score: u32,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub total_points: u32,
    pub questions: Vec<QuestionResult>,
}

impl TestAttempt {
    /// Pair questions with answers into an unscored attempt
    ///
    /// Missing answers count as empty.
    pub fn new(
        questions: &[TestQuestion],
        answers: &[String],
        max_points: u32,
        date: DateTime<Utc>,
    ) -> Self {
        let questions: Vec<QuestionResult> = questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                let answer = answers.get(i).map(String::as_str).unwrap_or("");
                QuestionResult::unscored(q, answer, max_points)
            })
            .collect();

        Self {
            score: 0,
            date,
            total_points: questions.len() as u32 * max_points,
            questions,
        }
    }

    /// Sum of points over all questions
    pub fn earned_points(&self) -> u32 {
        self.questions.iter().map(|q| q.points).sum()
    }
}

/// All attempts of one lesson
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonProgress {
    #[serde(default)]
    pub tests: Vec<TestAttempt>,
}

impl LessonProgress {
    /// Key used in `learning_progress.json`
    pub fn key(folder: &str, lesson: &str) -> String {
        format!("{}/{}", folder, lesson)
    }

    pub fn latest(&self) -> Option<&TestAttempt> {
        self.tests.last()
    }

    /// Best score across attempts
    pub fn best_score(&self) -> Option<u32> {
        self.tests.iter().map(|t| t.score).max()
    }
}
