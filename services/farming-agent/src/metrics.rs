//! Prometheus metrics
//!
//! Counters emitted by the decision loop:
//!
//! - `farming_claims_total` (counter): label `account`
//! - `farming_starts_total` (counter): label `account`
//! - `farming_rotations_total` (counter)
//! - `farming_cycle_errors_total` (counter): label `kind`
//!
//! Without an installed recorder every call is a no-op, so the exporter is
//! only installed when `telemetry.metrics_listen_addr` is configured.

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with an HTTP scrape listener on `addr`.
pub fn install_exporter(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus exporter on {addr}: {e}"))
}

pub fn record_claim(account: &str) {
    metrics::counter!("farming_claims_total", "account" => account.to_string()).increment(1);
}

pub fn record_start(account: &str) {
    metrics::counter!("farming_starts_total", "account" => account.to_string()).increment(1);
}

pub fn record_rotation() {
    metrics::counter!("farming_rotations_total").increment(1);
}

/// Record a failed cycle; `kind` is `transport`, `status`, `decode`, or `credential`.
pub fn record_cycle_error(kind: &'static str) {
    metrics::counter!("farming_cycle_errors_total", "kind" => kind).increment(1);
}
