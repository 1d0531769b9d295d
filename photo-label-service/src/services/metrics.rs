//! Prometheus metrics for photo-label-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram, CounterVec, Histogram, TextEncoder,
};

/// Labeling requests by outcome.
pub static LABEL_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "photo_label_requests_total",
        "Total number of photo labeling requests",
        &["status"]
    )
    .expect("Failed to register photo_label_requests_total")
});

/// Backend deliveries by outcome.
pub static BACKEND_DELIVERIES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "photo_label_backend_deliveries_total",
        "Label deliveries to the backend",
        &["status"]
    )
    .expect("Failed to register photo_label_backend_deliveries_total")
});

/// Vision model latency.
pub static LABEL_LATENCY: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "photo_label_model_latency_seconds",
        "Vision model latency in seconds",
        vec![0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]
    )
    .expect("Failed to register photo_label_model_latency_seconds")
});

pub fn init_metrics() {
    Lazy::force(&LABEL_REQUESTS_TOTAL);
    Lazy::force(&BACKEND_DELIVERIES_TOTAL);
    Lazy::force(&LABEL_LATENCY);
}

pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
