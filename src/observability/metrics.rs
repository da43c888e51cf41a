//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): dispatched requests by method, status
//! - `relay_request_duration_seconds` (histogram): latency distribution

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            describe_counter!(
                "relay_requests_total",
                "Dispatched requests by method and status"
            );
            describe_histogram!(
                "relay_request_duration_seconds",
                "Request latency distribution"
            );
            tracing::info!(address = %addr, "metrics exporter listening");
        }
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

/// Record the outcome of one dispatched request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "relay_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
