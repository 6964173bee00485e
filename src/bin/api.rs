//! TyporaX API Server
//!
//! Run with: cargo run --bin typorax-api
//!
//! # Configuration
//!
//! Read from `config.toml` (see `typorax config`), then environment:
//! - `TYPORAX_HOST`: Host to bind to (default: 127.0.0.1)
//! - `TYPORAX_PORT`: Port to listen on (default: 5000)
//! - `TYPORAX_DATA_DIR`: Root of the per-user directories
//! - `TYPORAX_USER`: User whose files are served (default: default)
//! - `RUST_LOG`: Log filter (default: typorax=info,tower_http=debug)

use anyhow::Context;
use typorax::api::{serve, AppState};
use typorax::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    typorax::logging::init(&config.logging, "tower_http=debug");

    tracing::info!("Starting TyporaX API server v{}", env!("CARGO_PKG_VERSION"));

    let api_config = config.api_config();
    tracing::info!("Data directory: {:?}", api_config.data_dir);

    let store = api_config
        .open_store()
        .with_context(|| format!("opening store for user '{}'", api_config.username))?;

    let state = AppState::new(store, api_config.clone());
    serve(state, &api_config).await?;

    tracing::info!("TyporaX API server stopped");
    Ok(())
}
