//! Prometheus metrics for quote consumption
//!
//! Exposes metrics for:
//! - Calldata records built
//! - Swap submissions per route
//! - Failures by reason
//! - Settlement path latency

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

lazy_static! {
    pub static ref CALLDATA_BUILT: CounterVec = register_counter_vec!(
        "swap_executor_calldata_built_total",
        "Total calldata records built",
        &["operation"]
    ).unwrap();

    pub static ref SWAPS_SUBMITTED: CounterVec = register_counter_vec!(
        "swap_executor_swaps_submitted_total",
        "Total swaps submitted",
        &["route", "operation"]
    ).unwrap();

    pub static ref SWAPS_FAILED: CounterVec = register_counter_vec!(
        "swap_executor_swaps_failed_total",
        "Total swap executions that failed",
        &["reason"]
    ).unwrap();

    pub static ref SUBMISSION_LATENCY: HistogramVec = register_histogram_vec!(
        "swap_executor_submission_latency_seconds",
        "Time spent inside the settlement path",
        &["route"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    ).unwrap();
}

/// Record a calldata record built for an operation
pub fn record_calldata_built(operation: &str) {
    CALLDATA_BUILT.with_label_values(&[operation]).inc();
}

/// Record a successful submission
pub fn record_swap_submitted(route: &str, operation: &str) {
    SWAPS_SUBMITTED.with_label_values(&[route, operation]).inc();
}

/// Record a failed execution
pub fn record_swap_failed(reason: &str) {
    SWAPS_FAILED.with_label_values(&[reason]).inc();
}

pub fn record_submission_latency(route: &str, latency_secs: f64) {
    SUBMISSION_LATENCY
        .with_label_values(&[route])
        .observe(latency_secs);
}

/// Render all registered metrics in the text exposition format
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_rendered_output() {
        record_swap_failed("metrics_test");
        let before = SWAPS_FAILED.with_label_values(&["metrics_test"]).get();
        record_swap_failed("metrics_test");
        assert_eq!(SWAPS_FAILED.with_label_values(&["metrics_test"]).get(), before + 1.0);

        assert!(render().contains("swap_executor_swaps_failed_total"));
    }
}
