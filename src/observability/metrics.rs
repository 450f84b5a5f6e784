//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_requests_total` (counter): requests by method, route, status
//! - `api_request_duration_seconds` (histogram): request latency by route
//! - `transfers_total` (counter): transfers by outcome
//! - `transfer_duration_seconds` (histogram): end-to-end transfer latency
//! - `rpc_calls_total` (counter): RPC calls by method and result
//! - `rpc_call_duration_seconds` (histogram): RPC latency by method
//!
//! Without an installed recorder every call here is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "api_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("api_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record a finished transfer. `outcome` is `success`, `insufficient_balance` or `failed`.
pub fn record_transfer(outcome: &'static str, start: Instant) {
    counter!("transfers_total", "outcome" => outcome).increment(1);
    histogram!("transfer_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one RPC round trip.
pub fn record_rpc_call(method: &'static str, ok: bool, start: Instant) {
    let result = if ok { "ok" } else { "error" };
    counter!("rpc_calls_total", "method" => method, "result" => result).increment(1);
    histogram!("rpc_call_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}
