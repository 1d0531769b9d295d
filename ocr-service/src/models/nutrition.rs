//! Nutrition facts extracted from a label. Fields that were not found are
//! left out of the JSON entirely.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Kcal,
    Mg,
    G,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quantity {
    pub value: i64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: i64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Carbohydrates {
    pub total: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sugars: Option<Quantity>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fat {
    pub total: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturated_fat: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_fat: Option<Quantity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NutritionFacts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sodium: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbohydrates: Option<Carbohydrates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat: Option<Fat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<Quantity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein: Option<Quantity>,
}

impl NutritionFacts {
    pub fn is_empty(&self) -> bool {
        *self == NutritionFacts::default()
    }

    /// Number of top-level fields that were found.
    pub fn field_count(&self) -> usize {
        [
            self.calories.is_some(),
            self.sodium.is_some(),
            self.carbohydrates.is_some(),
            self.fat.is_some(),
            self.cholesterol.is_some(),
            self.protein.is_some(),
        ]
        .iter()
        .filter(|found| **found)
        .count()
    }
}
