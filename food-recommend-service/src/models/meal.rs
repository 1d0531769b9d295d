use crate::models::FoodRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 3] = [MealType::Breakfast, MealType::Lunch, MealType::Dinner];

    /// Calorie total the greedy pick aims for.
    pub fn target_kcal(&self) -> i64 {
        match self {
            MealType::Breakfast => 500,
            MealType::Lunch => 600,
            MealType::Dinner => 550,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "BREAKFAST",
            MealType::Lunch => "LUNCH",
            MealType::Dinner => "DINNER",
        }
    }
}

/// One meal of a plan. `total_kcal` is always the sum of `items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMeal {
    pub meal_type: MealType,
    pub items: Vec<FoodRecord>,
    pub total_kcal: i64,
}

impl PlannedMeal {
    pub fn new(meal_type: MealType, items: Vec<FoodRecord>) -> Self {
        let total_kcal = items.iter().map(|f| f.calories).sum();
        Self {
            meal_type,
            items,
            total_kcal,
        }
    }
}
