//! Practice client
//!
//! HTTP client for the TyporaX backend and the sessions built on it.
//!
//! # Example
//!
//! ```rust,ignore
//! use typorax::client::{ClientConfig, PracticeBackend, PracticeSession, TyporaClient};
//! use std::sync::Arc;
//!
//! let client: Arc<dyn PracticeBackend> = Arc::new(TyporaClient::new(ClientConfig::default())?);
//! let mut session = PracticeSession::load(client, "Week 1", "les1.md", chrono::Utc::now()).await?;
//! session.mark_mastered(PracticeMode::Sentence, 0).await?;
//! ```

pub mod backend;
pub mod http;
pub mod session;
pub mod wordbank;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::PracticeBackend;
pub use http::{ClientConfig, ClientError, ClientResult, TyporaClient};
pub use session::{LessonTests, PracticeSession, ReverseCheck, TestSubmission};
pub use wordbank::{SaveStatus, WordbankSession};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{build_router, ApiConfig, AppState};
    use crate::practice::{Difficulty, PracticeMode, Rating, WordEntry};
    use crate::store::{WORDBANK_FILE, WORDBANK_FOLDER};
    use chrono::Utc;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    const LESSON: &str = "\
| Dutch | English |
|---|---|
| Het huis is groot. | The house is big. |

| Target Language | Native Language |
|---|---|
| Ik ben Inge. Ik woon in Rotterdam. | I am Inge. I live in Rotterdam. |
";

    /// Serve the real router on an ephemeral port
    async fn spawn_backend() -> (TyporaClient, TempDir) {
        let dir = tempdir().unwrap();
        let config = ApiConfig {
            data_dir: dir.path().to_path_buf(),
            ..ApiConfig::default()
        };
        let store = config.open_store().unwrap();
        store.write_text("Week 1", "les 1.md", LESSON).unwrap();
        store
            .write_text(WORDBANK_FOLDER, WORDBANK_FILE, "- **huis** \u{1F7E8} *house*\n")
            .unwrap();

        let router = build_router(AppState::new(store, config));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let client = TyporaClient::new(ClientConfig::new(format!("http://{}", addr))).unwrap();
        (client, dir)
    }

    #[tokio::test]
    async fn test_browse_lessons() {
        let (client, _dir) = spawn_backend().await;

        assert_eq!(
            client.list_folders().await.unwrap(),
            vec!["Week 1".to_string(), WORDBANK_FOLDER.to_string()]
        );
        assert_eq!(client.list_files("Week 1").await.unwrap(), vec!["les 1.md"]);

        let health = client.health_check().await.unwrap();
        assert_eq!(health.status, "healthy");
    }

    #[tokio::test]
    async fn test_api_error_message() {
        let (client, _dir) = spawn_backend().await;

        let err = client.load_text("Week 1", "nope.md").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(matches!(
            err,
            ClientError::Api { ref message, .. } if message == "File 'nope.md' not found"
        ));
    }

    #[tokio::test]
    async fn test_session_round_trip_through_backend() {
        let (client, _dir) = spawn_backend().await;
        let backend: Arc<dyn PracticeBackend> = Arc::new(client.clone());

        let mut session = PracticeSession::load(Arc::clone(&backend), "Week 1", "les 1.md", Utc::now())
            .await
            .unwrap();
        assert_eq!(session.sentences().len(), 2);

        session.mark_mastered(PracticeMode::Sentence, 1).await.unwrap();
        session.rate(0, Rating::Easy, Utc::now()).await.unwrap();

        let stored = client.load_progress("Week 1", "les 1.md").await.unwrap();
        assert!(stored.is_mastered(PracticeMode::Sentence, 1));
        assert_eq!(stored.spaced_level(0), 1);

        session.reset().await.unwrap();
        assert!(client.load_progress("Week 1", "les 1.md").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_lesson_test_flow() {
        let (client, _dir) = spawn_backend().await;
        let backend: Arc<dyn PracticeBackend> = Arc::new(client.clone());
        let tests = LessonTests::new(backend, "Week 1", "les 1.md");

        let generated = tests.generate().await.unwrap();
        assert_eq!(generated.questions.len(), 1);

        let submission = tests
            .submit(&generated.questions, &["het huis is groot".to_string()], 10, Utc::now())
            .await
            .unwrap();
        assert!(!submission.used_local_fallback);
        assert!(submission.saved);
        assert_eq!(submission.attempt.score, 100);

        assert_eq!(tests.history().await.unwrap().tests.len(), 1);
        assert!(client.all_progress().await.unwrap().contains_key("Week 1/les 1.md"));
    }

    #[tokio::test]
    async fn test_words_and_translation() {
        let (client, _dir) = spawn_backend().await;

        client
            .save_word(&WordEntry::new("kat", "cat", Difficulty::Hard))
            .await
            .unwrap();
        assert!(client.saved_words().await.unwrap().contains("**kat**"));
        assert!(client.wordbank().await.unwrap().contains("huis"));

        let translation = client
            .translate("Week 1", "les 1.md", "Ik ben Inge.")
            .await
            .unwrap();
        assert_eq!(translation, "I am Inge.");
    }
}
