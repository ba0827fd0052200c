//! Error taxonomy and its rendering to clients.
//!
//! # Design Decisions
//! - Every failure is terminal for the inbound request
//! - Plain-text body, 400 for client mistakes, 500 for everything else
//! - Rejections carry the upstream's own body text

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::upstream::{Service, UpstreamError};

/// Errors surfaced to gateway clients.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Malformed client input.
    #[error("{0}")]
    BadRequest(String),

    /// Transport failure or deadline expiry talking to a backend.
    #[error("{service} service unreachable: {reason}")]
    UpstreamUnreachable { service: Service, reason: String },

    /// A backend answered with a non-200 status.
    #[error("{service} service responded with status {status}: {body}")]
    UpstreamRejected {
        service: Service,
        status: u16,
        body: String,
    },

    /// A backend answered 200 with a body that does not decode.
    #[error("{service} service returned malformed JSON: {source}")]
    DecodeFailure {
        service: Service,
        #[source]
        source: serde_json::Error,
    },

    /// Local failure (encoding, audit log, buffering).
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn decode(service: Service, source: serde_json::Error) -> Self {
        GatewayError::DecodeFailure { service, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<UpstreamError> for GatewayError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Unreachable { service, reason } => {
                GatewayError::UpstreamUnreachable { service, reason }
            }
            UpstreamError::Rejected {
                service,
                status,
                body,
            } => GatewayError::UpstreamRejected {
                service,
                status,
                body,
            },
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (
            self.status(),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            format!("{}\n", self),
        )
            .into_response()
    }
}
