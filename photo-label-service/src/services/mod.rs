pub mod backend_client;
pub mod labeler;
pub mod metrics;

pub use backend_client::{DeliveryError, HttpResultSink, MockResultSink, ResultSink};
pub use labeler::{parse_label_response, FoodLabel, PhotoLabeler};
pub use metrics::{get_metrics, init_metrics};
