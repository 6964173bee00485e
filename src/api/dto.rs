//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON and are shared
//! with the HTTP client.

use serde::{Deserialize, Serialize};

use crate::assessment::TestAttempt;
use crate::practice::{ProgressRecord, SentencePair, WordEntry};

// ============================================
// PRACTICE DTOs
// ============================================

/// Query for `GET /practice/files`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct FolderQuery {
    #[serde(default)]
    pub folder: String,
}

/// Query naming a lesson file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LessonQuery {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub folder: String,
}

/// Parsed lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadTextResponse {
    pub sentences: Vec<SentencePair>,
    pub keywords: Vec<String>,
    pub content: String,
}

/// Practice progress of a lesson
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressResponse {
    #[serde(default)]
    pub progress: ProgressRecord,
}

/// Body of `POST /practice/progress`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveProgressRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub folder: String,
    #[serde(default)]
    pub progress: ProgressRecord,
}

/// Body of `POST /practice/progress/reset`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetProgressRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub folder: String,
}

/// Body of `POST /practice/translate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub sentence: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub sentence: String,
    pub translation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// ============================================
// WORDBANK DTOs
// ============================================

/// Raw wordbank markdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordbankResponse {
    pub content: String,
}

/// Body of `POST /wordbank/save_word`
///
/// Fields are optional so a missing one is reported as a validation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveWordRequest {
    #[serde(default)]
    pub dutch: Option<String>,
    #[serde(default)]
    pub english: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

impl From<&WordEntry> for SaveWordRequest {
    fn from(entry: &WordEntry) -> Self {
        Self {
            dutch: Some(entry.dutch.clone()),
            english: Some(entry.english.clone()),
            difficulty: Some(entry.difficulty.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Typo words, shaped like wordbank entries
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TyposResponse {
    #[serde(default)]
    pub typos: Vec<WordEntry>,
}

// ============================================
// TEST DTOs
// ============================================

/// Body carrying one test attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRequest {
    #[serde(default)]
    pub test: Option<TestAttempt>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "unhealthy"
    pub status: String,
    /// Store status: "ok" or "error"
    pub storage: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}
