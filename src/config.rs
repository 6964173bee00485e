//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::ApiConfig;
use crate::assessment::{DEFAULT_MAX_POINTS, DEFAULT_TEST_SIZE};
use crate::client::ClientConfig;
use crate::practice::DEFAULT_MASTERY_THRESHOLD;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientSection,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub practice: PracticeSection,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend the CLI talks to
#[derive(Debug, Clone, Deserialize)]
pub struct ClientSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Reference backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_username")]
    pub username: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("typorax").to_string_lossy().to_string())
        .unwrap_or_else(|| "./typorax_data".to_string())
}

fn default_username() -> String {
    "default".to_string()
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            username: default_username(),
        }
    }
}

/// Exercise tuning
#[derive(Debug, Clone, Deserialize)]
pub struct PracticeSection {
    #[serde(default = "default_test_size")]
    pub test_size: usize,

    #[serde(default = "default_mastery_threshold")]
    pub mastery_threshold: u32,

    #[serde(default = "default_max_points")]
    pub max_points: u32,
}

fn default_test_size() -> usize {
    DEFAULT_TEST_SIZE
}

fn default_mastery_threshold() -> u32 {
    DEFAULT_MASTERY_THRESHOLD
}

fn default_max_points() -> u32 {
    DEFAULT_MAX_POINTS
}

impl Default for PracticeSection {
    fn default() -> Self {
        Self {
            test_size: default_test_size(),
            mastery_threshold: default_mastery_threshold(),
            max_points: default_max_points(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("typorax").join("config.toml")),
            Some(PathBuf::from("/etc/typorax/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("TYPORAX_URL") {
            self.client.base_url = url;
        }

        if let Some(host) = var("TYPORAX_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("TYPORAX_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid TYPORAX_PORT"),
            }
        }
        if let Some(data_dir) = var("TYPORAX_DATA_DIR") {
            self.server.data_dir = data_dir;
        }
        if let Some(user) = var("TYPORAX_USER") {
            self.server.username = user;
        }

        if let Some(level) = var("TYPORAX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("TYPORAX_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.client.base_url.clone(),
            request_timeout_secs: self.client.request_timeout_secs,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            host: self.server.host.clone(),
            port: self.server.port,
            data_dir: PathBuf::from(&self.server.data_dir),
            username: self.server.username.clone(),
            test_size: self.practice.test_size,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# TyporaX Configuration
#
# Environment variables override these settings:
# - TYPORAX_URL
# - TYPORAX_HOST
# - TYPORAX_PORT
# - TYPORAX_DATA_DIR
# - TYPORAX_USER
# - TYPORAX_LOG_LEVEL
# - TYPORAX_LOG_FORMAT

[client]
# Backend used by the typorax command
base_url = "http://localhost:5000"

# Request timeout (seconds)
request_timeout_secs = 10

[server]
# Address typorax-api binds to
host = "127.0.0.1"
port = 5000

# Root of the per-user directories
data_dir = "~/.local/share/typorax"

# User whose files are served
username = "default"

[practice]
# Questions drawn per lesson test
test_size = 10

# Correct reverse answers before a sentence counts as mastered
mastery_threshold = 3

# Points per test question
max_points = 10

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty, json
format = "pretty"
"#
    .to_string()
}
