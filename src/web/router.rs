//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_child_folder, create_folder, delete_child_entry, delete_entry, get_entry, list_root,
    upload_child_file, upload_file, AppState,
};
use super::middleware::create_cors_layer;

/// Create the drive API router.
///
/// `max_upload_bytes` bounds request bodies, uploads included.
pub fn create_router(
    app_state: Arc<AppState>,
    cors_origins: &[String],
    max_upload_bytes: usize,
) -> Router {
    Router::new()
        .route(
            "/api/drive",
            get(list_root).post(create_folder).put(upload_file),
        )
        .route(
            "/api/drive/:entry",
            get(get_entry)
                .post(create_child_folder)
                .put(upload_child_file)
                .delete(delete_entry),
        )
        .route("/api/drive/:entry/:child", delete(delete_child_entry))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create a router serving the front-end files, if the directory exists.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    if !Path::new(static_path).is_dir() {
        tracing::warn!("Static directory {} not found, front-end disabled", static_path);
        return None;
    }

    Some(Router::new().fallback_service(ServeDir::new(static_path)))
}
