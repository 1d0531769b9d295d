pub mod security_headers;
pub mod tracing;

pub use security_headers::security_headers_middleware;
pub use tracing::{REQUEST_ID_HEADER, request_id_middleware};

use axum::{Router, middleware::from_fn};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Layers shared by every service router: request ids, security headers,
/// HTTP tracing and a permissive CORS policy for the web client.
pub fn with_common_layers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
