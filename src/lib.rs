//! # TyporaX
//!
//! Practice engine for a markdown language-learning workspace: sentence
//! mastery, spaced repetition, vocabulary and fill-in-the-blank drills, and
//! scored lesson tests.
//!
//! ## Modules
//!
//! - [`practice`]: Parsing and exercise state, no I/O
//! - [`assessment`]: Test generation, scoring and CSV export
//! - [`client`]: HTTP client and the sessions that drive it
//! - [`api`]: Reference backend with Axum
//! - [`store`]: Per-user files behind the backend
//! - [`preferences`]: Local settings and flashcards
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use typorax::client::{ClientConfig, PracticeBackend, PracticeSession, TyporaClient};
//! use typorax::practice::Rating;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client: Arc<dyn PracticeBackend> = Arc::new(TyporaClient::new(ClientConfig::default())?);
//!     let now = chrono::Utc::now();
//!
//!     let mut session = PracticeSession::load(client, "Week 1", "les1.md", now).await?;
//!     for index in session.review_queue(now) {
//!         println!("{}", session.sentences()[index].target_lang);
//!         session.rate(index, Rating::Medium, now).await?;
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod assessment;
pub mod client;
pub mod config;
pub mod logging;
pub mod practice;
pub mod preferences;
pub mod store;

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use client::{
    ClientConfig, ClientError, ClientResult, PracticeBackend, PracticeSession, TyporaClient,
    WordbankSession,
};

pub use config::{Config, ConfigError, LoggingConfig};

pub use practice::{Difficulty, PracticeError, PracticeMode, ProgressRecord, Rating, WordEntry};

pub use store::{StoreError, UserStore};
