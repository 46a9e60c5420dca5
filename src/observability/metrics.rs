//! Metrics collection and exposition.
//!
//! # Metrics
//! - `csrf_checks_total` (counter): guard verdicts by route, outcome
//! - `http_requests_total` (counter): requests by route, status
//! - `http_request_duration_seconds` (histogram): latency by route, measured
//!   from route resolution to the final response

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a guard verdict for a protected route.
pub fn record_csrf_check(route: &str, outcome: &'static str) {
    counter!(
        "csrf_checks_total",
        "route" => route.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a completed request.
pub fn record_request(route: &str, status: u16, start: Instant) {
    counter!(
        "http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
