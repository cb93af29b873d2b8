//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): requests by mode, status
//! - `relay_upstream_duration_seconds` (histogram): time to upstream headers
//! - `relay_active_streams` (gauge): streamed exchanges holding a lease
//! - `relay_stream_releases_total` (counter): lease releases by reason
//!
//! # Design Decisions
//! - Exporter is opt-in; without it every call below is a no-op
//! - Labels are static strings except the status code

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and serve it on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(mode: &'static str, status: u16) {
    ::metrics::counter!("relay_requests_total", "mode" => mode, "status" => status.to_string())
        .increment(1);
}

pub fn record_upstream_latency(mode: &'static str, start: Instant) {
    ::metrics::histogram!("relay_upstream_duration_seconds", "mode" => mode)
        .record(start.elapsed().as_secs_f64());
}

pub fn stream_opened() {
    ::metrics::gauge!("relay_active_streams").increment(1.0);
}

pub fn stream_released(reason: &'static str) {
    ::metrics::gauge!("relay_active_streams").decrement(1.0);
    ::metrics::counter!("relay_stream_releases_total", "reason" => reason).increment(1);
}
