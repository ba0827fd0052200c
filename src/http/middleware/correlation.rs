//! Correlation and audit middleware.
//!
//! Wraps every route:
//! 1. Reuse the inbound `request_id` query parameter or generate a UUID v4
//! 2. Insert the [`CorrelationId`] into request extensions for handlers
//! 3. Run the handler and capture its whole response in memory
//! 4. Append an audit record (ID, time, remote address, status)
//! 5. Return the captured status, headers and body unchanged
//!
//! Steps 3 and 4 run on their own task, so a client that disconnects
//! mid-request still leaves an audit record behind.
//!
//! Audit failures are logged and counted. With `fail_closed` they replace the
//! response with a 500 instead.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{ConnectInfo, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::CorrelationId;
use crate::http::response::GatewayError;
use crate::observability::{metrics, AuditLog, AuditRecord};

/// Paths with their own metric label; anything else is "unmatched".
const KNOWN_ROUTES: &[&str] = &["/news/latest", "/news/filter", "/news/detailed", "/comments/store"];

/// State for [`correlation_middleware`].
#[derive(Debug, Clone)]
pub struct CorrelationState {
    pub audit: Arc<AuditLog>,
    pub fail_closed: bool,
}

impl CorrelationState {
    pub fn new(audit: Arc<AuditLog>, fail_closed: bool) -> Self {
        Self { audit, fail_closed }
    }
}

pub async fn correlation_middleware(
    State(state): State<CorrelationState>,
    mut req: Request,
    next: Next,
) -> Response {
    let correlation = CorrelationId::from_query_or_generate(req.uri().query());
    let exchange = Exchange {
        start: Instant::now(),
        correlation: correlation.clone(),
        remote_addr: req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr),
        route: route_label(req.uri().path()),
        method: req.method().clone(),
    };

    req.extensions_mut().insert(correlation.clone());

    // Detached so the audit record is written even if the client hangs up
    // and this future is dropped.
    let task = tokio::spawn(exchange.run(state, req, next));
    match task.await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %correlation, error = %e, "Request task failed");
            GatewayError::Internal(format!("request task failed: {}", e)).into_response()
        }
    }
}

/// Request facts captured before the handler runs.
struct Exchange {
    start: Instant,
    correlation: CorrelationId,
    remote_addr: Option<SocketAddr>,
    route: &'static str,
    method: Method,
}

impl Exchange {
    async fn run(self, state: CorrelationState, req: Request, next: Next) -> Response {
        let Exchange {
            start,
            correlation,
            remote_addr,
            route,
            method,
        } = self;

        let (parts, body) = next.run(req).await.into_parts();
        let captured = match axum::body::to_bytes(body, usize::MAX).await {
            Ok(bytes) => Response::from_parts(parts, Body::from(bytes)),
            Err(e) => {
                tracing::error!(request_id = %correlation, error = %e, "Failed to capture handler response");
                GatewayError::Internal(format!("failed to buffer response: {}", e)).into_response()
            }
        };
        let status = captured.status();

        let record = AuditRecord::now(correlation.clone(), remote_addr, status.as_u16());
        if let Err(e) = state.audit.append(&record).await {
            metrics::record_audit_failure();
            tracing::error!(
                request_id = %correlation,
                error = %e,
                fail_closed = state.fail_closed,
                "Failed to write audit record"
            );
            if state.fail_closed {
                let response =
                    GatewayError::Internal(format!("audit log write failed: {}", e)).into_response();
                metrics::record_request(route, response.status().as_u16(), start);
                return response;
            }
        }

        metrics::record_request(route, status.as_u16(), start);
        tracing::info!(
            request_id = %correlation,
            method = %method,
            route,
            status = status.as_u16(),
            remote_addr = ?remote_addr,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        captured
    }
}

fn route_label(path: &str) -> &'static str {
    KNOWN_ROUTES
        .iter()
        .copied()
        .find(|route| *route == path)
        .unwrap_or("unmatched")
}
