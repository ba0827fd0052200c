//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the news gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Base addresses of the backend services.
    pub upstreams: UpstreamsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Pagination settings for list endpoints.
    pub pagination: PaginationConfig,

    /// Request audit log settings.
    pub audit: AuditConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Base URLs of the services the gateway aggregates.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamsConfig {
    /// News store (latest, filter, detailed).
    pub news: String,

    /// Comment store (list by post, store).
    pub comments: String,

    /// Content moderation service.
    pub moderation: String,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            news: "http://127.0.0.1:8081".to_string(),
            comments: "http://127.0.0.1:8082".to_string(),
            moderation: "http://127.0.0.1:8083".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a single upstream call in milliseconds.
    pub upstream_ms: u64,

    /// Ceiling for handling one inbound request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_ms: 5_000,
            request_secs: 30,
        }
    }
}

/// Pagination configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Number of news items per page. Fixed for the process lifetime.
    pub page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { page_size: 15 }
    }
}

/// Audit log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Write one record per request.
    pub enabled: bool,

    /// File the records are appended to.
    pub path: String,

    /// Fail the request with 500 when the record cannot be written.
    /// Off by default: auditing is best-effort.
    pub fail_closed: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "./logfile.txt".to_string(),
            fail_closed: false,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
