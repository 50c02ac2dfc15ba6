use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, Method},
    routing::{get, post},
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    interface::http::import_handler::{
        bulk_import, download_template, healthcheck, next_code, validate_bulk_import,
    },
    state::AppState,
};

/// Multipart framing overhead allowed on top of the configured file cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let body_limit = state.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(healthcheck))
        .route("/api/v1/employees/bulk-import", post(bulk_import))
        .route(
            "/api/v1/employees/bulk-import/validate",
            post(validate_bulk_import),
        )
        .route(
            "/api/v1/employees/bulk-import/template",
            get(download_template),
        )
        .route("/api/v1/employees/bulk-import/next-code", get(next_code))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS]),
        )
        .with_state(state)
}
