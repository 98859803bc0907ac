//! Metrics collection and exposition.
//!
//! # Metrics
//! - `fleet_requests_total` (counter): logical operations by outcome
//! - `fleet_retries_total` (counter): backoff retries by operation
//! - `fleet_token_refresh_total` (counter): 401-triggered re-authentications
//! - `fleet_session_transitions_total` (counter): session state changes
//! - `fleet_sessions` (gauge): sessions by startup result
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;

/// Install the Prometheus recorder and its HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(operation: &'static str, outcome: &'static str) {
    ::metrics::counter!("fleet_requests_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
}

pub fn record_retry(operation: &'static str) {
    ::metrics::counter!("fleet_retries_total", "operation" => operation).increment(1);
}

pub fn record_token_refresh(operation: &'static str) {
    ::metrics::counter!("fleet_token_refresh_total", "operation" => operation).increment(1);
}

pub fn record_session_transition(state: &'static str) {
    ::metrics::counter!("fleet_session_transitions_total", "state" => state).increment(1);
}

pub fn record_fleet_sessions(started: usize, failed: usize) {
    ::metrics::gauge!("fleet_sessions", "status" => "started").set(started as f64);
    ::metrics::gauge!("fleet_sessions", "status" => "failed").set(failed as f64);
}
