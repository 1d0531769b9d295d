pub mod health;
pub mod recommend;

pub use health::{health_check, metrics, root};
pub use recommend::recommend;
