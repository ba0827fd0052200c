//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to upstream:
//!     → timeouts.rs (enforce per-call deadline)
//!     → On expiry: classified as an unreachable upstream by the caller
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream call has a deadline
//! - No retries: every failure is terminal for the inbound request

pub mod timeouts;

pub use timeouts::{with_deadline, DeadlineExceeded};
