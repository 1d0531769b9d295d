pub mod database;
pub mod metrics;
pub mod selector;

pub use database::{FoodSource, MySqlFoodSource, StaticFoodSource};
pub use metrics::{get_metrics, init_metrics};
pub use selector::{plan_meals, Preferences};
