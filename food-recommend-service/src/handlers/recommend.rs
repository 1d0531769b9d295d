use crate::dtos::{ApiResponse, MealSection, RecommendRequest, RecommendResult};
use crate::services::metrics::{MEAL_ITEMS, RECOMMENDATIONS_TOTAL};
use crate::services::{plan_meals, Preferences};
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use service_core::error::AppError;

#[tracing::instrument(skip(state, payload))]
pub async fn recommend(
    State(state): State<AppState>,
    Json(payload): Json<RecommendRequest>,
) -> Result<impl IntoResponse, AppError> {
    let candidates = state.source.fetch_all().await.map_err(|e| {
        RECOMMENDATIONS_TOTAL.with_label_values(&["error"]).inc();
        tracing::error!(error = %e, source = state.source.name(), "Failed to load foods");
        e
    })?;
    let candidate_count = candidates.len();

    let prefs = Preferences {
        allergies: payload.allergies,
        diets: payload.diets,
        recent_foods: payload
            .food_history
            .into_iter()
            .map(|h| h.food_name)
            .collect(),
    };

    let mut rng = StdRng::from_entropy();
    let plan = plan_meals(candidates, &prefs, &mut rng);
    let plan_id: u32 = rng.gen_range(1000..=9999);

    for meal in &plan {
        MEAL_ITEMS
            .with_label_values(&[meal.meal_type.as_str()])
            .observe(meal.items.len() as f64);
    }
    RECOMMENDATIONS_TOTAL.with_label_values(&["ok"]).inc();

    tracing::info!(
        plan_id = plan_id,
        candidates = candidate_count,
        allergies = prefs.allergies.len(),
        diets = prefs.diets.len(),
        selected = plan.iter().map(|m| m.items.len()).sum::<usize>(),
        "Meal plan generated"
    );

    Ok(Json(ApiResponse::ok(RecommendResult {
        plan_id,
        plan_date: chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
        sections: plan.into_iter().map(MealSection::from).collect(),
    })))
}
