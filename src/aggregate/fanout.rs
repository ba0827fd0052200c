//! Concurrent fetch of a post and its comments.
//!
//! # State Machine
//! ```text
//! Start ──spawn post + comments──▶ Awaiting ──both Ok──▶ Complete
//!                                     │
//!                                     └──first Err──▶ Failed
//! ```
//!
//! Both fetches run on their own tasks and always run to completion. Each
//! reports through a oneshot channel, which holds exactly one value and never
//! blocks the sender, so a fetch whose result is no longer wanted just finishes
//! and drops its value.

use std::time::Instant;

use reqwest::Method;
use tokio::sync::oneshot;

use crate::http::request::CorrelationId;
use crate::http::response::GatewayError;
use crate::models::{decode_comments, Comment, DetailedNewsResult, NewsItem};
use crate::upstream::{Service, UpstreamClient};

/// Result slots filled as the two fetches report back.
#[derive(Debug, Default)]
struct DetailedSlots {
    post: Option<NewsItem>,
    comments: Option<Vec<Comment>>,
}

impl DetailedSlots {
    fn is_complete(&self) -> bool {
        self.post.is_some() && self.comments.is_some()
    }

    fn into_result(self) -> Option<DetailedNewsResult> {
        Some(DetailedNewsResult {
            post: self.post?,
            comments: self.comments?,
        })
    }
}

/// Fetch post `news_id` and its comments concurrently and merge them.
///
/// Returns the first error observed from either side; the other side's
/// outcome is then discarded.
pub async fn fetch_detailed(
    client: &UpstreamClient,
    news_id: u64,
    correlation: &CorrelationId,
) -> Result<DetailedNewsResult, GatewayError> {
    let start = Instant::now();

    let (post_tx, mut post_rx) = oneshot::channel();
    let (comments_tx, mut comments_rx) = oneshot::channel();

    {
        let client = client.clone();
        let correlation = correlation.clone();
        tokio::spawn(async move {
            let result = fetch_post(&client, news_id, &correlation).await;
            // Receiver is gone if the comments fetch already failed.
            let _ = post_tx.send(result);
        });
    }
    {
        let client = client.clone();
        let correlation = correlation.clone();
        tokio::spawn(async move {
            let result = fetch_comments(&client, news_id, &correlation).await;
            let _ = comments_tx.send(result);
        });
    }

    let mut slots = DetailedSlots::default();
    while !slots.is_complete() {
        let outcome = tokio::select! {
            received = &mut post_rx, if slots.post.is_none() => {
                settle(received, Service::News).map(|post| slots.post = Some(post))
            }
            received = &mut comments_rx, if slots.comments.is_none() => {
                settle(received, Service::Comments).map(|comments| slots.comments = Some(comments))
            }
        };

        if let Err(e) = outcome {
            tracing::warn!(
                request_id = %correlation,
                news_id,
                error = %e,
                "Detailed fetch failed"
            );
            return Err(e);
        }
    }

    tracing::debug!(
        request_id = %correlation,
        news_id,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Detailed fetch complete"
    );

    slots
        .into_result()
        .ok_or_else(|| GatewayError::Internal("detailed result incomplete".to_string()))
}

fn settle<T>(
    received: Result<Result<T, GatewayError>, oneshot::error::RecvError>,
    service: Service,
) -> Result<T, GatewayError> {
    received.map_err(|_| {
        GatewayError::Internal(format!("{} fetch task ended without a result", service))
    })?
}

async fn fetch_post(
    client: &UpstreamClient,
    news_id: u64,
    correlation: &CorrelationId,
) -> Result<NewsItem, GatewayError> {
    let id = news_id.to_string();
    let body = client
        .call(Method::GET, Service::News, &["detailed", id.as_str()], correlation, None)
        .await?;
    serde_json::from_slice(&body).map_err(|e| GatewayError::decode(Service::News, e))
}

async fn fetch_comments(
    client: &UpstreamClient,
    news_id: u64,
    correlation: &CorrelationId,
) -> Result<Vec<Comment>, GatewayError> {
    let id = news_id.to_string();
    let body = client
        .call(Method::GET, Service::Comments, &["comments", id.as_str()], correlation, None)
        .await?;
    decode_comments(&body).map_err(|e| GatewayError::decode(Service::Comments, e))
}
