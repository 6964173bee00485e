//! Wordbank helpers
//!
//! Fetching words for the vocabulary and fill-in-the-blank exercises, and
//! saving the words and typos they produce. Saves are fire-and-forget: a
//! failure is logged and reported as a [`SaveStatus`], never retried.

use std::sync::Arc;

use crate::client::backend::PracticeBackend;
use crate::client::http::ClientResult;
use crate::practice::fill_blanks::SAVE_FAILED_MESSAGE;
use crate::practice::wordbank::parse_wordbank;
use crate::practice::{BlankOutcome, FillBlanksSession, VocabSession, WordEntry};

/// Outcome of a fire-and-forget save
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    /// Message to show inline
    Failed(String),
}

impl SaveStatus {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveStatus::Saved)
    }
}

pub struct WordbankSession {
    backend: Arc<dyn PracticeBackend>,
}

impl WordbankSession {
    pub fn new(backend: Arc<dyn PracticeBackend>) -> Self {
        Self { backend }
    }

    /// Words of the organized wordbank
    pub async fn words(&self) -> ClientResult<Vec<WordEntry>> {
        let content = self.backend.wordbank().await?;
        let words = parse_wordbank(&content);
        tracing::debug!(count = words.len(), "Loaded wordbank");
        Ok(words)
    }

    /// Typo words for personalized practice
    pub async fn typo_words(&self) -> ClientResult<Vec<WordEntry>> {
        self.backend.typo_words().await
    }

    /// Vocabulary session over the wordbank, resumed at `last_completed`
    pub async fn vocab_session(&self, last_completed: usize) -> ClientResult<VocabSession> {
        let words = self.words().await?;
        Ok(VocabSession::new(words)?.resume_at(last_completed))
    }

    /// Switch a session to its typo words
    pub async fn enter_personalized(&self, session: &mut VocabSession) -> ClientResult<()> {
        let typos = self.typo_words().await?;
        session.enter_personalized(typos)?;
        Ok(())
    }

    pub async fn fill_blanks_session(&self) -> ClientResult<FillBlanksSession> {
        let content = self.backend.wordbank().await?;
        Ok(FillBlanksSession::from_wordbank(&content)?)
    }

    pub async fn save_word(&self, entry: &WordEntry) -> SaveStatus {
        match self.backend.save_word(entry).await {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                tracing::error!(word = %entry.dutch, error = %e, "Error saving word");
                SaveStatus::Failed(SAVE_FAILED_MESSAGE.to_string())
            }
        }
    }

    /// Save the word of an incorrect fill-blank answer
    ///
    /// Correct outcomes save nothing.
    pub async fn save_missed(&self, outcome: &BlankOutcome) -> Option<SaveStatus> {
        match outcome {
            BlankOutcome::Incorrect { to_save, .. } => Some(self.save_word(to_save).await),
            BlankOutcome::Correct { .. } => None,
        }
    }

    /// Save the typos a session has queued
    ///
    /// Returns one status per typo.
    pub async fn flush_typos(&self, session: &mut VocabSession) -> Vec<SaveStatus> {
        let mut statuses = Vec::new();
        for typo in session.take_pending_typos() {
            let status = match self.backend.save_typo(&typo).await {
                Ok(()) => SaveStatus::Saved,
                Err(e) => {
                    tracing::error!(key = %typo.key(), error = %e, "Error saving typo");
                    SaveStatus::Failed(e.to_string())
                }
            };
            statuses.push(status);
        }
        statuses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::MemoryBackend;
    use crate::practice::{Difficulty, SubmitOutcome};
    use chrono::{TimeZone, Utc};

    const WORDBANK: &str = "\
# Wordbank

- **huis** \u{1F7E5} *a house; \"Dit is mijn huis.\" (This is my house)*
- **kat** \u{1F7E9} *cat*
- **boom** \u{1F7E8} *tree; \"De boom is hoog.\"*
";

    fn session(backend: &Arc<MemoryBackend>) -> WordbankSession {
        let shared: Arc<dyn PracticeBackend> = backend.clone();
        WordbankSession::new(shared)
    }

    #[tokio::test]
    async fn test_words_and_blanks() {
        let backend = Arc::new(MemoryBackend::new().with_wordbank(WORDBANK));
        let helper = session(&backend);

        let words = helper.words().await.unwrap();
        assert_eq!(words.len(), 3);
        assert_eq!(words[1], WordEntry::new("kat", "cat", Difficulty::Easy));

        let blanks = helper.fill_blanks_session().await.unwrap();
        assert_eq!(blanks.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_wordbank_is_an_error() {
        let backend = Arc::new(MemoryBackend::new());
        assert!(session(&backend).words().await.is_err());
    }

    #[tokio::test]
    async fn test_save_missed_word() {
        let backend = Arc::new(MemoryBackend::new().with_wordbank(WORDBANK));
        let helper = session(&backend);
        let mut blanks = helper.fill_blanks_session().await.unwrap();

        let outcome = blanks.check("woning").unwrap();
        assert_eq!(helper.save_missed(&outcome).await, Some(SaveStatus::Saved));

        let outcome = blanks.check("boom").unwrap();
        assert_eq!(helper.save_missed(&outcome).await, None);

        let saved = backend.stored_words();
        assert_eq!(saved, vec![WordEntry::new("huis", "a house", Difficulty::Hard)]);
    }

    #[tokio::test]
    async fn test_failed_save_reports_message() {
        let backend = Arc::new(MemoryBackend::new().with_wordbank(WORDBANK).failing_saves());
        let helper = session(&backend);

        let status = helper
            .save_word(&WordEntry::new("huis", "house", Difficulty::Hard))
            .await;
        assert_eq!(status, SaveStatus::Failed("Failed to save word".to_string()));
    }

    #[tokio::test]
    async fn test_typos_flush_then_personalize() {
        let backend = Arc::new(MemoryBackend::new().with_wordbank(WORDBANK));
        let helper = session(&backend);
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();

        let mut vocab = helper.vocab_session(0).await.unwrap();
        assert_eq!(vocab.submit("hius", now).unwrap(), SubmitOutcome::Incorrect);
        assert_eq!(vocab.submit("hius", now).unwrap(), SubmitOutcome::Incorrect);

        let statuses = helper.flush_typos(&mut vocab).await;
        assert_eq!(statuses, vec![SaveStatus::Saved]);
        assert!(helper.flush_typos(&mut vocab).await.is_empty());

        helper.enter_personalized(&mut vocab).await.unwrap();
        assert!(vocab.is_personalized());
        assert_eq!(vocab.current().unwrap().dutch, "huis");
        assert_eq!(vocab.current().unwrap().difficulty, Difficulty::Hard);
    }

    #[tokio::test]
    async fn test_personalize_without_typos_fails() {
        let backend = Arc::new(MemoryBackend::new().with_wordbank(WORDBANK));
        let helper = session(&backend);
        let mut vocab = helper.vocab_session(1).await.unwrap();

        assert!(helper.enter_personalized(&mut vocab).await.is_err());
        assert!(!vocab.is_personalized());
        assert_eq!(vocab.progress(), (1, 3));
    }
}
