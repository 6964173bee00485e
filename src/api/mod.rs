//! TyporaX Practice API
//!
//! Reference HTTP backend for the practice client, built with Axum.
//! Every handler works on the files of one configured user.
//!
//! # Endpoints
//!
//! ## Practice
//! - `GET /practice/folders` - List folders
//! - `GET /practice/files?folder=` - List lesson files
//! - `GET /practice/load_text?filename=&folder=` - Parse a lesson
//! - `GET /practice/progress?filename=&folder=` - Load practice progress
//! - `POST /practice/progress` - Save practice progress
//! - `POST /practice/progress/reset` - Clear practice progress
//! - `POST /practice/translate` - Translate a table sentence
//!
//! ## Wordbank
//! - `GET /wordbank/` - Organized wordbank
//! - `GET /wordbank/saved` - Saved words
//! - `POST /wordbank/save_word` - Save a word
//! - `POST /typo/wordbank/save_typo` - Log a typo
//! - `GET /typo/wordbank/get_typos` - Logged typos
//!
//! ## Tests
//! - `GET /progress/all` - All test history
//! - `GET /progress/:folder/:lesson` - Lesson test history
//! - `POST /progress/:folder/:lesson` - Save a test attempt
//! - `GET /progress/generate_test/:folder/:lesson` - Generate a test
//! - `POST /progress/evaluate_test/:folder/:lesson` - Score a test
//!
//! ## Health
//! - `GET /health` - Store status and uptime
//!
//! # Example
//!
//! ```rust,ignore
//! use typorax::api::{serve, ApiConfig, AppState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::default();
//!     let state = AppState::new(config.open_store()?, config.clone());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let practice_routes = Router::new()
        .route("/folders", get(routes::practice::list_folders))
        .route("/files", get(routes::practice::list_files))
        .route("/load_text", get(routes::practice::load_text))
        .route(
            "/progress",
            get(routes::practice::load_progress).post(routes::practice::save_progress),
        )
        .route("/progress/reset", post(routes::practice::reset_progress))
        .route("/translate", post(routes::practice::translate_sentence));

    let progress_routes = Router::new()
        .route("/all", get(routes::progress::get_all_progress))
        .route(
            "/generate_test/:folder/:lesson",
            get(routes::progress::generate_lesson_test),
        )
        .route(
            "/evaluate_test/:folder/:lesson",
            post(routes::progress::evaluate_test),
        )
        .route(
            "/:folder/:lesson",
            get(routes::progress::get_lesson_progress).post(routes::progress::save_lesson_progress),
        );

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/practice", practice_routes)
        .nest("/progress", progress_routes)
        .route("/wordbank", get(routes::wordbank::get_wordbank))
        .route("/wordbank/", get(routes::wordbank::get_wordbank))
        .route("/wordbank/saved", get(routes::wordbank::get_saved_words))
        .route("/wordbank/save_word", post(routes::wordbank::save_word))
        .route("/typo/wordbank/save_typo", post(routes::typo::save_typo))
        .route("/typo/wordbank/get_typos", get(routes::typo::get_typos))
        .route("/health", get(routes::health::full_health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(user = %config.username, "TyporaX API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("TyporaX API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
