//! Router configuration for the analysis endpoint.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderName, Method};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use super::AppState;

/// Headers browsers may send on a cross-origin analysis request.
const ALLOWED_HEADERS: [HeaderName; 4] = [
    header::AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    header::CONTENT_TYPE,
];

/// Room for the JSON envelope around the data URL (`fileType`, `fileName`,
/// the `data:<mime>;base64,` prefix).
const ENVELOPE_ALLOWANCE: usize = 64 * 1024;

/// Largest JSON body that can carry a file of `max_upload_bytes` raw bytes.
///
/// The file travels base64-encoded, which grows it by 4/3.
pub fn json_body_limit(max_upload_bytes: usize) -> usize {
    max_upload_bytes
        .div_ceil(3)
        .saturating_mul(4)
        .saturating_add(ENVELOPE_ALLOWANCE)
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS);

    Router::new()
        .route("/analyze-content", post(handlers::analyze_content))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(json_body_limit(
            state.config.max_upload_bytes,
        )))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
