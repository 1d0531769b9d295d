//! Prometheus metrics for ocr-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec, TextEncoder,
};

/// OCR requests by endpoint and outcome.
pub static OCR_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "ocr_requests_total",
        "Total number of OCR requests",
        &["endpoint", "status"]
    )
    .expect("Failed to register ocr_requests_total")
});

/// Provider call latency.
pub static OCR_PROVIDER_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ocr_provider_latency_seconds",
        "OCR provider latency in seconds",
        &["provider"],
        vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .expect("Failed to register ocr_provider_latency_seconds")
});

/// Nutrition fields found per label.
pub static NUTRITION_FIELDS_FOUND: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "ocr_nutrition_fields_found",
        "Top-level nutrition fields extracted per label",
        &["provider"],
        vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]
    )
    .expect("Failed to register ocr_nutrition_fields_found")
});

pub fn init_metrics() {
    Lazy::force(&OCR_REQUESTS_TOTAL);
    Lazy::force(&OCR_PROVIDER_LATENCY);
    Lazy::force(&NUTRITION_FIELDS_FOUND);
}

pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
