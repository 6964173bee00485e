//! Practice error types
//!
//! Errors raised by the practice domain: bad markers, bad ratings,
//! out-of-range sentence indices and exhausted sessions.

use thiserror::Error;

/// Errors that can occur in the practice layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PracticeError {
    /// Sentence index does not exist in the loaded lesson
    #[error("Sentence index {index} out of range (lesson has {len} sentences)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Unknown difficulty marker
    #[error("Invalid difficulty marker: {0}")]
    InvalidDifficulty(String),

    /// Unknown self-rating
    #[error("Invalid rating: {0}. Use hard, medium or easy")]
    InvalidRating(String),

    /// Progress key does not follow any known key family
    #[error("Invalid progress key: {0}")]
    InvalidKey(String),

    /// Unknown practice mode
    #[error("Invalid practice mode: {0}. Use sentence, blank or reverse")]
    InvalidMode(String),

    /// Session has no word left to practice
    #[error("Session finished")]
    SessionFinished,

    /// Session was started without any usable word
    #[error("No usable words in the word list")]
    EmptyWordList,
}

/// Result type alias for practice operations
pub type PracticeResult<T> = Result<T, PracticeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PracticeError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "Sentence index 7 out of range (lesson has 3 sentences)"
        );

        let err = PracticeError::InvalidRating("meh".to_string());
        assert_eq!(err.to_string(), "Invalid rating: meh. Use hard, medium or easy");
    }
}
