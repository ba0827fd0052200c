//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, page size > 0)
//! - Keep the request time limit above the worst case of two upstream deadlines
//! - Validate addresses and upstream URLs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid socket address for {field}: '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("invalid upstream URL for {field}: '{value}' ({reason})")]
    InvalidUpstream {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("audit.path must not be empty when auditing is enabled")]
    EmptyAuditPath,

    /// The request time limit must outlast two sequential upstream calls.
    #[error("timeouts.request_secs ({request_ms}ms) must exceed twice timeouts.upstream_ms ({upstream_ms}ms)")]
    RequestTimeoutTooShort { request_ms: u64, upstream_ms: u64 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    let upstreams = [
        ("upstreams.news", &config.upstreams.news),
        ("upstreams.comments", &config.upstreams.comments),
        ("upstreams.moderation", &config.upstreams.moderation),
    ];
    for (field, value) in upstreams {
        if let Err(reason) = check_upstream_url(value) {
            errors.push(ValidationError::InvalidUpstream {
                field,
                value: value.clone(),
                reason,
            });
        }
    }

    if config.pagination.page_size == 0 {
        errors.push(ValidationError::Zero("pagination.page_size"));
    }
    if config.timeouts.upstream_ms == 0 {
        errors.push(ValidationError::Zero("timeouts.upstream_ms"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }
    // `/comments/store` makes two upstream calls back to back.
    let request_ms = config.timeouts.request_secs.saturating_mul(1000);
    let upstream_ms = config.timeouts.upstream_ms;
    if request_ms > 0 && upstream_ms > 0 && request_ms <= upstream_ms.saturating_mul(2) {
        errors.push(ValidationError::RequestTimeoutTooShort {
            request_ms,
            upstream_ms,
        });
    }

    if config.audit.enabled && config.audit.path.trim().is_empty() {
        errors.push(ValidationError::EmptyAuditPath);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_upstream_url(value: &str) -> Result<(), String> {
    let url = Url::parse(value).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.cannot_be_a_base() || url.host().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
