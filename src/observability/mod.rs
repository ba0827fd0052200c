//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Correlation middleware produces:
//!     → audit.rs (one record per request, append-only file)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through all subsystems as a log field
//! - Metrics are cheap (atomic increments) and optional to export
//! - Audit records are best-effort unless configured fail-closed

pub mod audit;
pub mod logging;
pub mod metrics;

pub use audit::{AuditLog, AuditRecord};
