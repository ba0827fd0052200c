//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by route, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency by route
//! - `gateway_upstream_calls_total` (counter): upstream calls by service, outcome
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency by service
//! - `gateway_audit_failures_total` (counter): audit records that could not be written
//!
//! Recording is a no-op until a recorder is installed, so tests need no setup.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::upstream::Service;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished inbound request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("gateway_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one finished upstream call.
pub fn record_upstream_call(service: Service, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "gateway_upstream_calls_total",
        "service" => service.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("gateway_upstream_duration_seconds", "service" => service.as_str())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_audit_failure() {
    metrics::counter!("gateway_audit_failures_total").increment(1);
}
