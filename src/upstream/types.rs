//! Upstream service identifiers and error definitions.

use axum::body::Bytes;
use thiserror::Error;

/// Backend services reachable from the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    News,
    Comments,
    Moderation,
}

impl Service {
    /// Short label used in logs, metrics and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::News => "news",
            Service::Comments => "comments",
            Service::Moderation => "moderation",
        }
    }
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from a single upstream call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// Transport failure or deadline expiry; no usable response.
    #[error("{service} service unreachable: {reason}")]
    Unreachable { service: Service, reason: String },

    /// The service answered with something other than 200.
    #[error("{service} service responded with status {status}: {body}")]
    Rejected {
        service: Service,
        status: u16,
        body: String,
    },
}

/// Result type for upstream calls.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Errors while building the upstream client at startup.
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error("invalid {service} upstream URL: {source}")]
    InvalidUrl {
        service: Service,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Request body sent to an upstream.
#[derive(Debug, Clone)]
pub struct Payload {
    pub content_type: &'static str,
    pub bytes: Bytes,
}

impl Payload {
    /// Raw text body.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: "text/plain; charset=utf-8",
            bytes: Bytes::from(text.into()),
        }
    }

    /// Already-encoded JSON body.
    pub fn json(bytes: Bytes) -> Self {
        Self {
            content_type: "application/json",
            bytes,
        }
    }
}
