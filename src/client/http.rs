//! TyporaX REST API Client
//!
//! HTTP client for the practice, wordbank and test endpoints of the
//! TyporaX backend.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::api::dto::{
    HealthResponse, LoadTextResponse, MessageResponse, ProgressResponse, ResetProgressRequest,
    SaveProgressRequest, SaveWordRequest, SuccessResponse, TestRequest, TranslateRequest,
    TranslateResponse, TyposResponse, WordbankResponse,
};
use crate::assessment::{GeneratedTest, LessonProgress, TestAttempt};
use crate::practice::{PracticeError, ProgressRecord, TypoEntry, WordEntry};

/// Configuration for the TyporaX client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "http://localhost:5000")
    pub base_url: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// TyporaX REST API client
#[derive(Debug, Clone)]
pub struct TyporaClient {
    client: Client,
    config: ClientConfig,
}

impl TyporaClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// `/progress/...` path of a lesson, segments percent-encoded
    fn lesson_path(prefix: &str, folder: &str, lesson: &str) -> ClientResult<String> {
        if folder.is_empty() {
            return Err(ClientError::MissingFolder);
        }
        Ok(format!(
            "{}/{}/{}",
            prefix,
            urlencoding::encode(folder),
            urlencoding::encode(lesson)
        ))
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        let response = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;

        decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        decode(response).await
    }

    // ============================================
    // Practice
    // ============================================

    pub async fn list_folders(&self) -> ClientResult<Vec<String>> {
        self.get_json("/practice/folders", &[]).await
    }

    pub async fn list_files(&self, folder: &str) -> ClientResult<Vec<String>> {
        self.get_json("/practice/files", &[("folder", folder)]).await
    }

    pub async fn load_text(&self, folder: &str, filename: &str) -> ClientResult<LoadTextResponse> {
        self.get_json(
            "/practice/load_text",
            &[("filename", filename), ("folder", folder)],
        )
        .await
    }

    pub async fn load_progress(&self, folder: &str, filename: &str) -> ClientResult<ProgressRecord> {
        let response: ProgressResponse = self
            .get_json(
                "/practice/progress",
                &[("filename", filename), ("folder", folder)],
            )
            .await?;
        Ok(response.progress)
    }

    pub async fn save_progress(
        &self,
        folder: &str,
        filename: &str,
        record: &ProgressRecord,
    ) -> ClientResult<()> {
        let body = SaveProgressRequest {
            filename: Some(filename.to_string()),
            folder: folder.to_string(),
            progress: record.clone(),
        };
        let _: SuccessResponse = self.post_json("/practice/progress", &body).await?;
        Ok(())
    }

    pub async fn reset_progress(&self, folder: &str, filename: &str) -> ClientResult<()> {
        let body = ResetProgressRequest {
            filename: Some(filename.to_string()),
            folder: folder.to_string(),
        };
        let _: SuccessResponse = self.post_json("/practice/progress/reset", &body).await?;
        Ok(())
    }

    pub async fn translate(
        &self,
        folder: &str,
        filename: &str,
        sentence: &str,
    ) -> ClientResult<String> {
        let body = TranslateRequest {
            sentence: sentence.to_string(),
            filename: Some(filename.to_string()),
            folder: folder.to_string(),
        };
        let response: TranslateResponse = self.post_json("/practice/translate", &body).await?;
        Ok(response.translation)
    }

    // ============================================
    // Wordbank
    // ============================================

    pub async fn wordbank(&self) -> ClientResult<String> {
        let response: WordbankResponse = self.get_json("/wordbank/", &[]).await?;
        Ok(response.content)
    }

    pub async fn saved_words(&self) -> ClientResult<String> {
        let response: WordbankResponse = self.get_json("/wordbank/saved", &[]).await?;
        Ok(response.content)
    }

    pub async fn save_word(&self, entry: &WordEntry) -> ClientResult<()> {
        let _: MessageResponse = self
            .post_json("/wordbank/save_word", &SaveWordRequest::from(entry))
            .await?;
        Ok(())
    }

    pub async fn save_typo(&self, typo: &TypoEntry) -> ClientResult<()> {
        let _: MessageResponse = self.post_json("/typo/wordbank/save_typo", typo).await?;
        Ok(())
    }

    /// Logged typos as hard wordbank entries
    pub async fn typo_words(&self) -> ClientResult<Vec<WordEntry>> {
        let response: TyposResponse = self.get_json("/typo/wordbank/get_typos", &[]).await?;
        Ok(response.typos)
    }

    // ============================================
    // Tests
    // ============================================

    pub async fn all_progress(&self) -> ClientResult<BTreeMap<String, LessonProgress>> {
        self.get_json("/progress/all", &[]).await
    }

    pub async fn lesson_progress(&self, folder: &str, lesson: &str) -> ClientResult<LessonProgress> {
        let path = Self::lesson_path("/progress", folder, lesson)?;
        self.get_json(&path, &[]).await
    }

    pub async fn save_test(
        &self,
        folder: &str,
        lesson: &str,
        attempt: &TestAttempt,
    ) -> ClientResult<()> {
        let path = Self::lesson_path("/progress", folder, lesson)?;
        let body = TestRequest {
            test: Some(attempt.clone()),
        };
        let _: MessageResponse = self.post_json(&path, &body).await?;
        Ok(())
    }

    pub async fn generate_test(&self, folder: &str, lesson: &str) -> ClientResult<GeneratedTest> {
        let path = Self::lesson_path("/progress/generate_test", folder, lesson)?;
        self.get_json(&path, &[]).await
    }

    /// Partial-credit scoring by the backend
    pub async fn evaluate_test(
        &self,
        folder: &str,
        lesson: &str,
        attempt: &TestAttempt,
    ) -> ClientResult<TestAttempt> {
        let path = Self::lesson_path("/progress/evaluate_test", folder, lesson)?;
        let body = TestRequest {
            test: Some(attempt.clone()),
        };
        self.post_json(&path, &body).await
    }

    /// Check if the backend is available
    pub async fn health_check(&self) -> ClientResult<HealthResponse> {
        self.get_json("/health", &[]).await
    }
}

/// Map a transport failure to a typed error
fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Unavailable
    } else {
        ClientError::Request(e)
    }
}

/// Error body of the backend; only the message is needed
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    response
        .json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the backend
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Backend unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Please select a folder first")]
    MissingFolder,

    #[error(transparent)]
    Practice(#[from] PracticeError),
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_url_joins_base() {
        let client = TyporaClient::new(ClientConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(client.url("/health"), "http://localhost:5000/health");
    }

    #[test]
    fn test_lesson_path_encodes_segments() {
        let path = TyporaClient::lesson_path("/progress", "Les 1", "week 2.md").unwrap();
        assert_eq!(path, "/progress/Les%201/week%202.md");

        assert!(matches!(
            TyporaClient::lesson_path("/progress", "", "les.md"),
            Err(ClientError::MissingFolder)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_unavailable() {
        // Port 9 (discard) is closed on test machines
        let client = TyporaClient::new(ClientConfig::new("http://127.0.0.1:9")).unwrap();
        let err = client.list_folders().await.unwrap_err();
        assert!(matches!(err, ClientError::Unavailable), "got {:?}", err);
    }
}
