//! Metrics collection and Prometheus export.
//!
//! Initializes the exporter behind `/metrics` and records per-model
//! provider signals: attempts by HTTP outcome, latency, failures by reason
//! and the final result of each generation.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global handle to the Prometheus recorder.
pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are logged and ignored.
pub fn init_metrics() {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if METRICS_HANDLE.set(handle).is_err() {
                tracing::warn!("Metrics handle already initialized");
            }
        }
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Get the current metrics in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

/// Record one HTTP exchange with the provider.
///
/// `outcome` is `success`, `quota_exceeded`, `overloaded`, `upstream_error`
/// or `transport_error`.
pub fn record_provider_attempt(model: &str, outcome: &'static str, duration_secs: f64) {
    counter!(
        "sitegen_provider_attempts_total",
        "model" => model.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!(
        "sitegen_provider_latency_seconds",
        "model" => model.to_string()
    )
    .record(duration_secs);
}

/// Record a model that failed and was skipped.
pub fn record_model_failure(model: &str, reason: &'static str) {
    counter!(
        "sitegen_model_failures_total",
        "model" => model.to_string(),
        "reason" => reason
    )
    .increment(1);
}

/// Record how a whole generation ended. `model` is empty on exhaustion.
pub fn record_generation(outcome: &'static str, model: &str, models_tried: usize) {
    counter!(
        "sitegen_generations_total",
        "outcome" => outcome,
        "model" => model.to_string()
    )
    .increment(1);
    histogram!("sitegen_models_tried", "outcome" => outcome).record(models_tried as f64);
}
