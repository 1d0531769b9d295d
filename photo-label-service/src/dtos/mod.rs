pub mod photo_label;

pub use photo_label::{PhotoLabelRequest, PhotoLabelResponse};
