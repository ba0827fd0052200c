//! Request-side helpers.
//!
//! # Responsibilities
//! - Correlation ID type threaded from the middleware into handlers
//! - Parse numeric query parameters (`page`, `id`) with client-error semantics
//!
//! # Design Decisions
//! - Absent or empty numeric parameters default to zero
//! - Non-numeric or negative values are a 400, never coerced

use std::collections::HashMap;
use std::str::FromStr;

use uuid::Uuid;

use crate::http::response::GatewayError;

/// Query parameter carrying the correlation ID, inbound and outbound.
pub const REQUEST_ID_PARAM: &str = "request_id";

/// Opaque token identifying one inbound request across all upstream calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh random (UUID v4) ID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse the client's `request_id` if it sent a non-empty one.
    pub fn from_query(query: Option<&str>) -> Option<Self> {
        let query = query?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == REQUEST_ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .map(Self)
    }

    /// Reuse the inbound ID or mint a new one.
    pub fn from_query_or_generate(query: Option<&str>) -> Self {
        Self::from_query(query).unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse an optional non-negative integer query parameter.
pub fn parse_index<T>(params: &HashMap<String, String>, name: &str) -> Result<T, GatewayError>
where
    T: FromStr + Default,
    T::Err: std::fmt::Display,
{
    match params.get(name).map(String::as_str) {
        None | Some("") => Ok(T::default()),
        Some(raw) => raw.parse::<T>().map_err(|e| {
            GatewayError::BadRequest(format!("invalid '{}' parameter '{}': {}", name, raw, e))
        }),
    }
}
