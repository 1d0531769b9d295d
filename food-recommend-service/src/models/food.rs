use serde::{Deserialize, Serialize};

/// A food row from the `foods` table. Calories are whole kcal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FoodRecord {
    pub id: i64,
    pub name: String,
    pub calories: i64,
    pub category: String,
    pub portion_label: String,
}

impl FoodRecord {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        calories: i64,
        category: impl Into<String>,
        portion_label: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            calories,
            category: category.into(),
            portion_label: portion_label.into(),
        }
    }
}
