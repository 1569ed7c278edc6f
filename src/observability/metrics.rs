//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_matches_total` (counter): lookups by outcome
//!   (`matched`, `not_found`, `method_not_allowed`)
//! - `router_match_duration_seconds` (histogram): lookup latency
//! - `router_reloads_total` (counter): reloads by result (`ok`, `error`)
//! - `router_routes` (gauge): routes in the published tree
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs a recorder, so the
//!   library can be embedded without an exporter

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::MatchError;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Label for a lookup outcome.
pub fn outcome_label(result: Result<(), &MatchError>) -> &'static str {
    match result {
        Ok(()) => "matched",
        Err(MatchError::NotFound) => "not_found",
        Err(MatchError::MethodNotAllowed { .. }) => "method_not_allowed",
    }
}

/// Record one lookup.
pub fn record_match(outcome: &'static str, started: Instant) {
    counter!("router_matches_total", "outcome" => outcome).increment(1);
    histogram!("router_match_duration_seconds").record(started.elapsed().as_secs_f64());
}

/// Record a reload attempt.
pub fn record_reload(success: bool) {
    let result = if success { "ok" } else { "error" };
    counter!("router_reloads_total", "result" => result).increment(1);
}

/// Record the size of the published tree.
pub fn record_route_count(routes: usize) {
    gauge!("router_routes").set(routes as f64);
}
