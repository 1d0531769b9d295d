pub mod assistant;
pub mod image_info;
pub mod metrics;
pub mod session_store;

pub use assistant::ChatAssistant;
pub use image_info::{probe, ImageInfo, ImageProbeError};
pub use metrics::{get_metrics, init_metrics};
pub use session_store::{spawn_sweeper, RetentionPolicy, SessionStore};
