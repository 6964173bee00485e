//! CSV export of test history
//!
//! One row per question. The test number, score and date are written on
//! the first row of each attempt only.

use std::io::Write;
use std::path::Path;

use crate::assessment::error::{AssessmentError, AssessmentResult};
use crate::assessment::types::TestAttempt;

pub const CSV_HEADERS: [&str; 9] = [
    "Test Number",
    "Score (%)",
    "Date",
    "Question (English)",
    "Your Answer (Dutch)",
    "Correct Answer (Dutch)",
    "Points",
    "Max Points",
    "Feedback",
];

const NO_ANSWER: &str = "(no answer)";

/// Write attempts as CSV to any writer
pub fn write_attempts_csv<W: Write>(attempts: &[TestAttempt], writer: W) -> AssessmentResult<()> {
    if attempts.is_empty() {
        return Err(AssessmentError::NothingToExport);
    }

    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;

    for (n, attempt) in attempts.iter().enumerate() {
        let test_number = (n + 1).to_string();
        let score = attempt.score.to_string();
        let date = attempt.date.format("%Y-%m-%d").to_string();

        for (q_index, q) in attempt.questions.iter().enumerate() {
            let first = q_index == 0;
            let answer = if q.user_answer.is_empty() {
                NO_ANSWER
            } else {
                q.user_answer.as_str()
            };
            let points = q.points.to_string();
            let max_points = q.max_points.to_string();
            let feedback = q.display_feedback();

            csv.write_record([
                if first { test_number.as_str() } else { "" },
                if first { score.as_str() } else { "" },
                if first { date.as_str() } else { "" },
                q.english.as_str(),
                answer,
                q.dutch.as_str(),
                points.as_str(),
                max_points.as_str(),
                feedback.as_str(),
            ])?;
        }
    }

    csv.flush()?;
    Ok(())
}

/// Render attempts as a CSV string
pub fn attempts_to_csv(attempts: &[TestAttempt]) -> AssessmentResult<String> {
    let mut buf = Vec::new();
    write_attempts_csv(attempts, &mut buf)?;
    String::from_utf8(buf).map_err(|e| AssessmentError::Encoding(e.to_string()))
}

/// Write attempts to a CSV file
pub fn export_to_file(attempts: &[TestAttempt], path: &Path) -> AssessmentResult<()> {
    let file = std::fs::File::create(path)?;
    write_attempts_csv(attempts, file)?;
    tracing::info!(path = %path.display(), attempts = attempts.len(), "Exported test history");
    Ok(())
}

/// Default file name offered for a lesson's export
pub fn export_file_name(lesson: &str) -> String {
    let lesson = if lesson.is_empty() { "lesson" } else { lesson };
    format!("test_progress_{}.csv", lesson)
}
