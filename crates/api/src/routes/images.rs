//! Image upload routes.
//!
//! Request bodies are `multipart/form-data`; every part that carries a file
//! name is treated as an uploaded file. Parts are buffered before the upload
//! service sees them.

use std::io::{self, Cursor};

use axum::{
    Json, Router,
    extract::{
        Multipart, Path, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, post},
};
use imgup_core::upload::{UploadError, UploadFile};
use imgup_shared::AppError;
use serde::Serialize;
use tracing::{error, info};

use crate::{AppState, error::ApiError};

/// Creates the image routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/images", post(upload_image))
        .route("/images/batch", post(upload_images))
        .route("/images/{key}", delete(delete_image))
}

// ============================================================================
// Response Types
// ============================================================================

/// Response for a single upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Public URL of the stored image.
    pub url: String,
}

/// Response for a batch upload.
#[derive(Debug, Serialize)]
pub struct BatchUploadResponse {
    /// Public URLs of the stored images, in request order.
    pub urls: Vec<String>,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Classify a multipart failure. A body over the size limit is reported as
/// such; anything else is handed to `otherwise` as an I/O error.
fn multipart_failure(
    err: &MultipartError,
    otherwise: impl FnOnce(io::Error) -> UploadError,
) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text()).into()
    } else {
        otherwise(io::Error::other(err.to_string())).into()
    }
}

/// Buffer one multipart part into an `UploadFile`.
async fn read_field(field: Field<'_>) -> Result<UploadFile, MultipartError> {
    let original_name = field.file_name().map(String::from);
    let content_type = field.content_type().map(String::from);
    let body = field.bytes().await?;
    Ok(UploadFile::new(original_name, content_type, Cursor::new(body)))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/images`
/// Store the first file part as-is.
async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let file = loop {
        let field = multipart
            .next_field()
            .await
            .map_err(|e| multipart_failure(&e, UploadError::NeedImage))?;

        match field {
            Some(field) if field.file_name().is_some() => {
                break read_field(field)
                    .await
                    .map_err(|e| multipart_failure(&e, UploadError::NeedImage))?;
            }
            Some(_) => {}
            None => {
                return Err(AppError::NeedImage("no file part in request".to_string()).into());
            }
        }
    };

    match state.uploads.upload_single(file).await {
        Ok(url) => {
            info!(url = %url, "Image uploaded");
            Ok((StatusCode::CREATED, Json(UploadResponse { url })))
        }
        Err(e) => {
            error!(error = %e, "Failed to upload image");
            Err(e.into())
        }
    }
}

/// POST `/images/batch`
/// Store every image part, scaled down to the configured width.
async fn upload_images(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        multipart_failure(&e, |io| {
            UploadError::file_upload_failed("<request>", UploadError::NeedImage(io))
        })
    })? {
        let Some(name) = field.file_name().map(String::from) else {
            continue;
        };
        let file = read_field(field).await.map_err(|e| {
            multipart_failure(&e, |io| {
                UploadError::file_upload_failed(name, UploadError::NeedImage(io))
            })
        })?;
        files.push(file);
    }

    match state.uploads.upload_many(files).await {
        Ok(urls) => {
            info!(count = urls.len(), "Images uploaded");
            Ok((StatusCode::CREATED, Json(BatchUploadResponse { urls })))
        }
        Err(e) => {
            error!(error = %e, "Failed to upload images");
            Err(e.into())
        }
    }
}

/// DELETE `/images/{key}`
/// Remove a stored image. Unknown keys succeed.
async fn delete_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode, ApiError> {
    match state.uploads.delete(&key).await {
        Ok(()) => {
            info!(key = %key, "Image deleted");
            Ok(StatusCode::NO_CONTENT)
        }
        Err(e) => {
            error!(key = %key, error = %e, "Failed to delete image");
            Err(e.into())
        }
    }
}
