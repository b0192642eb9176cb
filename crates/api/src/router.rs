//! Application router assembly.
//!
//! [`build_app_router`] is used by both `main.rs` and the integration tests so
//! they run behind the same middleware.

use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, StatusCode};
use axum::Router;
use linkumkm_core::uploads::max_upload_bytes;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;
use crate::storage::{StorageBackend, StorageConfig};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Multipart boundaries and part headers on top of the largest file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// `/health`, the JSON API under `/api` and, for local storage, the upload
/// directory under its public prefix.
///
/// Outermost first, requests pass through: request id, tracing, request id
/// echo, CORS, timeout, panic recovery. CORS answers preflights with an empty
/// body, so it sits inside the trace layer whose body has no `Default`.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let api = routes::api_routes().layer(DefaultBodyLimit::max(
        max_upload_bytes() + MULTIPART_OVERHEAD_BYTES,
    ));

    let app = with_upload_files(
        Router::new()
            .merge(routes::health::router())
            .nest("/api", api),
        &config.storage,
    );

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(build_cors_layer(config))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(CatchPanicLayer::new());

    app.layer(middleware).with_state(state)
}

/// Serve stored files directly when they live on local disk. Bucket uploads
/// are served by the bucket.
fn with_upload_files(router: Router<AppState>, storage: &StorageConfig) -> Router<AppState> {
    if storage.backend != StorageBackend::Local {
        return router;
    }
    let prefix = format!("/{}", storage.public_prefix.trim_matches('/'));
    router.nest_service(&prefix, ServeDir::new(&storage.upload_dir))
}

/// CORS for the configured front-end origins. Credentials are allowed so the
/// session cookie is sent cross-origin.
///
/// # Panics
///
/// Panics on an origin that is not a valid header value.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
