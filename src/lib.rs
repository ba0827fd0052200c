//! News aggregation gateway library.
//!
//! Fronts the news, comment and moderation services with four public
//! endpoints, fans the detailed view out to two backends concurrently and
//! tags every request with a correlation ID that follows it upstream and
//! into the audit log.

pub mod aggregate;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod resilience;
pub mod upstream;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
