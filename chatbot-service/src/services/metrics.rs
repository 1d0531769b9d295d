//! Prometheus metrics for chatbot-service.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, register_int_gauge, CounterVec, HistogramVec,
    IntGauge, TextEncoder,
};

/// Chat turns by endpoint kind (text, multimodal) and outcome.
pub static CHAT_TURNS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "chatbot_turns_total",
        "Total number of chat turns",
        &["kind", "status"]
    )
    .expect("Failed to register chatbot_turns_total")
});

/// Model calls by model and outcome.
pub static LLM_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "chatbot_llm_requests_total",
        "Total number of chat model calls",
        &["model", "status"]
    )
    .expect("Failed to register chatbot_llm_requests_total")
});

/// Model call latency.
pub static LLM_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "chatbot_llm_latency_seconds",
        "Chat model call latency in seconds",
        &["model"],
        vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]
    )
    .expect("Failed to register chatbot_llm_latency_seconds")
});

/// Sessions currently held in memory.
pub static ACTIVE_SESSIONS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "chatbot_active_sessions",
        "Number of chat sessions held in memory"
    )
    .expect("Failed to register chatbot_active_sessions")
});

/// Initialize all metrics (forces lazy initialization).
pub fn init_metrics() {
    Lazy::force(&CHAT_TURNS_TOTAL);
    Lazy::force(&LLM_REQUESTS_TOTAL);
    Lazy::force(&LLM_LATENCY);
    Lazy::force(&ACTIVE_SESSIONS);
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
