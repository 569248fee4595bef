//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - Image upload, batch upload and delete routes
//! - Health check
//! - Error responses derived from `AppError`

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use imgup_core::storage::StorageService;
use imgup_core::upload::UploadService;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Upload service writing to the configured bucket.
    pub uploads: Arc<UploadService<StorageService>>,
    /// Largest request body the upload routes accept, in bytes.
    pub body_limit: usize,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(DefaultBodyLimit::max(state.body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
