//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Pick the log level from `RUST_LOG`, falling back to config
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Request ID is attached as a field on every request-scoped event

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(log_level: &str) -> String {
    format!("news_gateway={level},tower_http={level}", level = log_level)
}

/// Install the global subscriber. Call once, from `main`.
pub fn init(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_targets_crate_and_http_layer() {
        let filter = default_filter("debug");
        assert_eq!(filter, "news_gateway=debug,tower_http=debug");
        assert!(EnvFilter::try_new(&filter).is_ok());
    }
}
