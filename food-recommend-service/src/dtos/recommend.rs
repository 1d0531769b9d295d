use crate::models::{FoodRecord, MealType, PlannedMeal};
use serde::{Deserialize, Serialize};

pub const SUCCESS_CODE: &str = "COMMON200";
pub const SUCCESS_MESSAGE: &str = "성공입니다.";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub birth_date: String,
    pub due_date: String,
    #[serde(default)]
    pub other_health_factors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodHistoryEntry {
    pub meal_type: String,
    pub food_name: String,
    pub intake_percent: i32,
    /// Carried as sent; only `food_name` affects selection.
    pub created_at: String,
}

/// `user` and `healths` are accepted but do not influence selection yet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub user: UserProfile,
    #[serde(default)]
    pub healths: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub diets: Vec<String>,
    #[serde(default)]
    pub food_history: Vec<FoodHistoryEntry>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub food_id: i64,
    pub name: String,
    pub portion_label: String,
    pub est_calories: i64,
    pub food_category: String,
}

impl From<FoodRecord> for FoodItem {
    fn from(food: FoodRecord) -> Self {
        Self {
            food_id: food.id,
            name: food.name,
            portion_label: food.portion_label,
            est_calories: food.calories,
            food_category: food.category,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSection {
    pub meal_type: MealType,
    pub total_kcal: i64,
    pub items: Vec<FoodItem>,
}

impl From<PlannedMeal> for MealSection {
    fn from(meal: PlannedMeal) -> Self {
        Self {
            meal_type: meal.meal_type,
            total_kcal: meal.total_kcal,
            items: meal.items.into_iter().map(FoodItem::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResult {
    pub plan_id: u32,
    pub plan_date: String,
    pub sections: Vec<MealSection>,
}

/// Response envelope shared with the main backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub is_success: bool,
    pub code: String,
    pub message: String,
    pub result: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(result: T) -> Self {
        Self {
            is_success: true,
            code: SUCCESS_CODE.to_string(),
            message: SUCCESS_MESSAGE.to_string(),
            result,
        }
    }
}
