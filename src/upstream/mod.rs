//! Upstream service access.
//!
//! # Data Flow
//! ```text
//! handler / fan-out task
//!     → client.rs (build URL, attach request_id, send with deadline)
//!     → types.rs (UpstreamResult: body bytes or UpstreamError)
//!     → caller decodes the body
//! ```

pub mod client;
pub mod types;

pub use client::{Endpoints, UpstreamClient};
pub use types::{ClientInitError, Payload, Service, UpstreamError, UpstreamResult};
