//! Standard middleware for the Tangle API.

use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Request/response logging via tracing spans.
pub fn trace() -> TraceLayer<tower_http::classify::SharedClassifier<tower_http::classify::ServerErrorsAsFailures>>
{
    TraceLayer::new_for_http()
}

/// The SPA is served from a different origin in development, so the API
/// stays permissive about origins.
pub fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
