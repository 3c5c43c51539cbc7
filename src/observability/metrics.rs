//! Metrics collection and exposition.
//!
//! # Metrics
//! - `datacollector_events_total` (counter): registration events by outcome
//! - `datacollector_calls_total` (counter): retried calls by kind and outcome
//! - `datacollector_call_attempts_total` (counter): HTTP attempts by kind
//! - `datacollector_provision_duration_seconds` (histogram): time per event
//!
//! Without an installed exporter the macros are no-ops.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a handled registration event ("provisioned", "partial", "failed").
pub fn record_event(outcome: &'static str) {
    counter!("datacollector_events_total", "outcome" => outcome).increment(1);
}

/// Record one retried call.
pub fn record_call(kind: &'static str, attempts: u32, succeeded: bool) {
    let outcome = if succeeded { "success" } else { "exhausted" };
    counter!("datacollector_calls_total", "call" => kind, "outcome" => outcome).increment(1);
    counter!("datacollector_call_attempts_total", "call" => kind).increment(u64::from(attempts));
}

/// Record how long one event took to provision.
pub fn record_provision_duration(start: Instant) {
    histogram!("datacollector_provision_duration_seconds").record(start.elapsed().as_secs_f64());
}
