//! Lesson tests
//!
//! Generation of translation tests from a lesson table, local and
//! partial-credit scoring, and CSV export of the attempt history.

pub mod error;
pub mod export;
pub mod generate;
pub mod scoring;
pub mod types;

pub use error::{AssessmentError, AssessmentResult};
pub use export::{attempts_to_csv, export_to_file, write_attempts_csv};
pub use generate::{extract_test_pairs, generate_test, DEFAULT_TEST_SIZE};
pub use scoring::{evaluate_answer, evaluate_attempt, score_locally, similarity_ratio};
pub use types::{
    GeneratedTest, Grade, LessonProgress, QuestionResult, TestAttempt, TestQuestion,
    DEFAULT_MAX_POINTS,
};
