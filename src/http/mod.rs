//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, layers)
//!     → middleware/correlation.rs (request ID, response capture, audit)
//!     → request.rs (query parsing)
//!     → handlers.rs (upstream calls, aggregation)
//!     → response.rs (error rendering)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{CorrelationId, REQUEST_ID_PARAM};
pub use response::GatewayError;
pub use server::{AppState, GatewayServer, StartupError};
