pub mod nutrition;

pub use nutrition::{Carbohydrates, Fat, NutritionFacts, Quantity, Unit};
