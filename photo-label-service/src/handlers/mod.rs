pub mod health;
pub mod photo_label;

pub use health::{health_check, metrics, root};
pub use photo_label::label_photo;
