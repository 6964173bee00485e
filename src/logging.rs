//! Tracing setup shared by both binaries

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(config: &LoggingConfig, extra: &str) -> String {
    let mut filter = format!("typorax={}", config.level);
    if !extra.is_empty() {
        filter.push(',');
        filter.push_str(extra);
    }
    filter
}

/// Install the global subscriber
///
/// `RUST_LOG` wins over the configured level. `extra` adds directives for
/// other crates, e.g. `tower_http=debug` for the server.
pub fn init(config: &LoggingConfig, extra: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config, extra).into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
