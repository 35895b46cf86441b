use axum::http::{Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::ApiConfig;

/// CORS layer for the calendar frontend.
///
/// Development keeps the permissive layer so local dev servers on arbitrary
/// ports can talk to the API; production only admits the configured frontend
/// origin.
pub fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.env.is_development() {
        return CorsLayer::very_permissive();
    }

    let origins = [config.frontend_url.as_str()]
        .into_iter()
        .filter_map(|s| s.parse::<axum::http::HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}
