//! Prometheus metrics for food-recommend-service.

use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, register_counter_vec, register_histogram_vec, CounterVec, HistogramVec,
    TextEncoder,
};

/// Food catalogue query duration.
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "food_recommend_db_query_duration_seconds",
            "Food catalogue query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Recommendation requests by outcome.
pub static RECOMMENDATIONS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "food_recommend_requests_total",
        "Total number of meal plan recommendations",
        &["status"]
    )
    .expect("Failed to register RECOMMENDATIONS_TOTAL")
});

/// Items placed per meal.
pub static MEAL_ITEMS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "food_recommend_meal_items",
        "Number of foods selected per meal",
        &["meal_type"],
        vec![0.0, 1.0, 2.0, 3.0, 4.0]
    )
    .expect("Failed to register MEAL_ITEMS")
});

pub fn init_metrics() {
    Lazy::force(&DB_QUERY_DURATION);
    Lazy::force(&RECOMMENDATIONS_TOTAL);
    Lazy::force(&MEAL_ITEMS);
}

pub fn get_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode_to_string(&metric_families)
        .unwrap_or_default()
}
