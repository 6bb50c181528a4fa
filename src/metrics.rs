use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder, HistogramVec,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::time::Instant;

use crate::{EdgeMetricsError, Result};

lazy_static! {
    // Request metrics
    pub static ref TRAFFIC_REQUESTS: IntCounter = register_int_counter!(
        "traffic_requests_total",
        "Total number of /traffic requests received"
    ).unwrap();

    pub static ref MISSING_CREDENTIALS: IntCounter = register_int_counter!(
        "missing_credentials_total",
        "Requests rejected because no credentials could be resolved"
    ).unwrap();

    // Backend metrics
    pub static ref BACKEND_CALLS: IntCounterVec = register_int_counter_vec!(
        "backend_calls_total",
        "Total number of cloud API calls by action",
        &["action"]
    ).unwrap();

    pub static ref BACKEND_FAILURES: IntCounterVec = register_int_counter_vec!(
        "backend_failures_total",
        "Total number of failed cloud API calls by action",
        &["action"]
    ).unwrap();

    pub static ref BACKEND_CALL_DURATION: HistogramVec = register_histogram_vec!(
        "backend_call_duration_seconds",
        "Cloud API call duration in seconds",
        &["action"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0]
    ).unwrap();
}

pub fn record_traffic_request() {
    TRAFFIC_REQUESTS.inc();
}

pub fn record_missing_credentials() {
    MISSING_CREDENTIALS.inc();
}

pub fn record_backend_failure(action: &str) {
    BACKEND_FAILURES.with_label_values(&[action]).inc();
}

/// Counts a backend call on creation and observes its latency on drop.
pub struct BackendCallTimer {
    action: &'static str,
    start: Instant,
}

impl BackendCallTimer {
    pub fn new(action: &'static str) -> Self {
        BACKEND_CALLS.with_label_values(&[action]).inc();
        Self {
            action,
            start: Instant::now(),
        }
    }
}

impl Drop for BackendCallTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        BACKEND_CALL_DURATION
            .with_label_values(&[self.action])
            .observe(duration);
    }
}

/// Prometheus text exposition of the default registry.
pub fn render() -> Result<String> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| EdgeMetricsError::Internal(format!("Failed to encode metrics: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| EdgeMetricsError::Internal(format!("Metrics are not UTF-8: {}", e)))
}
