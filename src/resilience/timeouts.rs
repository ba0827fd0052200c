//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap upstream calls with a deadline
//! - Cancel the in-flight call cleanly when the deadline passes
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors; callers decide how to classify them

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// The wrapped operation did not finish in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("deadline of {}ms exceeded", .0.as_millis())]
pub struct DeadlineExceeded(pub Duration);

/// Run `fut` to completion unless `deadline` elapses first.
pub async fn with_deadline<F, T>(deadline: Duration, fut: F) -> Result<T, DeadlineExceeded>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(deadline, fut)
        .await
        .map_err(|_| DeadlineExceeded(deadline))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_within_deadline() {
        let value = with_deadline(Duration::from_millis(500), async { 42 }).await;
        assert_eq!(value, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expires() {
        let result = with_deadline(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err, DeadlineExceeded(Duration::from_millis(50)));
        assert_eq!(err.to_string(), "deadline of 50ms exceeded");
    }
}
