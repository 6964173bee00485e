//! Backend seam
//!
//! Sessions talk to the backend through [`PracticeBackend`] so they can run
//! against the HTTP client or an in-memory double.

use async_trait::async_trait;

use crate::api::dto::LoadTextResponse;
use crate::assessment::{GeneratedTest, LessonProgress, TestAttempt};
use crate::client::http::{ClientResult, TyporaClient};
use crate::practice::{ProgressRecord, TypoEntry, WordEntry};

/// Backend operations used by the practice sessions
#[async_trait]
pub trait PracticeBackend: Send + Sync {
    async fn load_text(&self, folder: &str, filename: &str) -> ClientResult<LoadTextResponse>;

    async fn load_progress(&self, folder: &str, filename: &str) -> ClientResult<ProgressRecord>;

    /// Replace the stored record
    async fn save_progress(
        &self,
        folder: &str,
        filename: &str,
        record: &ProgressRecord,
    ) -> ClientResult<()>;

    async fn reset_progress(&self, folder: &str, filename: &str) -> ClientResult<()>;

    async fn wordbank(&self) -> ClientResult<String>;

    async fn typo_words(&self) -> ClientResult<Vec<WordEntry>>;

    async fn save_word(&self, entry: &WordEntry) -> ClientResult<()>;

    async fn save_typo(&self, typo: &TypoEntry) -> ClientResult<()>;

    async fn generate_test(&self, folder: &str, lesson: &str) -> ClientResult<GeneratedTest>;

    async fn evaluate_test(
        &self,
        folder: &str,
        lesson: &str,
        attempt: &TestAttempt,
    ) -> ClientResult<TestAttempt>;

    /// Append an attempt to the lesson history
    async fn save_test(&self, folder: &str, lesson: &str, attempt: &TestAttempt) -> ClientResult<()>;

    async fn lesson_progress(&self, folder: &str, lesson: &str) -> ClientResult<LessonProgress>;
}

#[async_trait]
impl PracticeBackend for TyporaClient {
    async fn load_text(&self, folder: &str, filename: &str) -> ClientResult<LoadTextResponse> {
        TyporaClient::load_text(self, folder, filename).await
    }

    async fn load_progress(&self, folder: &str, filename: &str) -> ClientResult<ProgressRecord> {
        TyporaClient::load_progress(self, folder, filename).await
    }

    async fn save_progress(
        &self,
        folder: &str,
        filename: &str,
        record: &ProgressRecord,
    ) -> ClientResult<()> {
        TyporaClient::save_progress(self, folder, filename, record).await
    }

    async fn reset_progress(&self, folder: &str, filename: &str) -> ClientResult<()> {
        TyporaClient::reset_progress(self, folder, filename).await
    }

    async fn wordbank(&self) -> ClientResult<String> {
        TyporaClient::wordbank(self).await
    }

    async fn typo_words(&self) -> ClientResult<Vec<WordEntry>> {
        TyporaClient::typo_words(self).await
    }

    async fn save_word(&self, entry: &WordEntry) -> ClientResult<()> {
        TyporaClient::save_word(self, entry).await
    }

    async fn save_typo(&self, typo: &TypoEntry) -> ClientResult<()> {
        TyporaClient::save_typo(self, typo).await
    }

    async fn generate_test(&self, folder: &str, lesson: &str) -> ClientResult<GeneratedTest> {
        TyporaClient::generate_test(self, folder, lesson).await
    }

    async fn evaluate_test(
        &self,
        folder: &str,
        lesson: &str,
        attempt: &TestAttempt,
    ) -> ClientResult<TestAttempt> {
        TyporaClient::evaluate_test(self, folder, lesson, attempt).await
    }

    async fn save_test(&self, folder: &str, lesson: &str, attempt: &TestAttempt) -> ClientResult<()> {
        TyporaClient::save_test(self, folder, lesson, attempt).await
    }

    async fn lesson_progress(&self, folder: &str, lesson: &str) -> ClientResult<LessonProgress> {
        TyporaClient::lesson_progress(self, folder, lesson).await
    }
}
