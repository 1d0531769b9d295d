pub mod food;
pub mod meal;

pub use food::FoodRecord;
pub use meal::{MealType, PlannedMeal};
