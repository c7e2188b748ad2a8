use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};
use std::time::Instant;

use crate::convert::Verdict;

lazy_static! {
    // Request metrics
    pub static ref REQUEST_COUNTER: IntCounterVec = register_int_counter_vec!(
        "healthcheck_requests_total",
        "Total number of requests received",
        &["endpoint"]
    ).unwrap();

    pub static ref REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "healthcheck_request_duration_seconds",
        "Request duration in seconds",
        &["endpoint"],
        vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    ).unwrap();

    // Aggregation metrics
    pub static ref AGGREGATIONS: IntCounterVec = register_int_counter_vec!(
        "healthcheck_aggregations_total",
        "Metric query aggregations by verdict",
        &["verdict"]
    ).unwrap();

    // Storage metrics
    pub static ref STORE_OPERATIONS: IntCounterVec = register_int_counter_vec!(
        "healthcheck_store_operations_total",
        "Document store operations by outcome",
        &["operation", "result"]
    ).unwrap();
}

/// Counts a request on creation and records its latency when dropped.
pub struct RequestTimer {
    endpoint: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn new(endpoint: &'static str) -> Self {
        REQUEST_COUNTER.with_label_values(&[endpoint]).inc();
        Self {
            endpoint,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        REQUEST_DURATION
            .with_label_values(&[self.endpoint])
            .observe(duration);
    }
}

pub fn record_verdict(verdict: Verdict) {
    AGGREGATIONS.with_label_values(&[verdict.as_str()]).inc();
}

pub fn record_store_operation(operation: &str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    STORE_OPERATIONS
        .with_label_values(&[operation, result])
        .inc();
}

/// Renders every registered metric in the Prometheus text format.
pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!("failed to encode metrics: {}", e);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
