//! Assessment error types

use thiserror::Error;

/// Errors that can occur while exporting or submitting tests
#[derive(Error, Debug)]
pub enum AssessmentError {
    /// Export was requested for a lesson without attempts
    #[error("No test attempts to export")]
    NothingToExport,

    /// CSV writer failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Output was not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// File system failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for assessment operations
pub type AssessmentResult<T> = Result<T, AssessmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(AssessmentError::NothingToExport.to_string(), "No test attempts to export");

        let err: AssessmentError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert_eq!(err.to_string(), "IO error: disk full");
    }
}
