//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::assessment::DEFAULT_TEST_SIZE;
use crate::store::UserStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Files of the served user; the lock serializes read-modify-write of
    /// the JSON files
    pub store: Arc<RwLock<UserStore>>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: UserStore, config: ApiConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Root of the per-user directories
    pub data_dir: PathBuf,
    /// User the server acts for
    pub username: String,
    /// Questions per generated test
    pub test_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            data_dir: PathBuf::from("./data"),
            username: "default".to_string(),
            test_size: DEFAULT_TEST_SIZE,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Open the store of the configured user
    pub fn open_store(&self) -> crate::store::StoreResult<UserStore> {
        UserStore::open(&self.data_dir, &self.username)
    }
}
