pub mod health;
pub mod ocr;

pub use health::{health_check, metrics};
pub use ocr::{ocr_nutrition, perform_ocr};
