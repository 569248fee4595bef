//! Application-wide error types.

use thiserror::Error;

/// Caller-facing error classification.
///
/// Each upload failure kind maps to exactly one variant so the HTTP layer
/// can render a distinct status and code for it.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed input (e.g. file name without extension).
    #[error("Validation error: {0}")]
    Validation(String),

    /// No readable file was supplied.
    #[error("Image required: {0}")]
    NeedImage(String),

    /// Uploading one of several files failed.
    #[error("File upload failed: {0}")]
    FileUploadFailed(String),

    /// Image could not be decoded, scaled or encoded.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// Payload exceeds the configured size limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Object storage backend error.
    #[error("External service error: {0}")]
    ExternalService(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::NeedImage(_) => 400,
            Self::NotFound(_) => 404,
            Self::PayloadTooLarge(_) => 413,
            Self::ExternalService(_) => 502,
            Self::FileUploadFailed(_) | Self::ImageProcessing(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NeedImage(_) => "NEED_IMAGE",
            Self::FileUploadFailed(_) => "FILE_UPLOAD_FAILED",
            Self::ImageProcessing(_) => "IMAGE_PROCESSING_FAILED",
            Self::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::NeedImage(String::new()), 400, "NEED_IMAGE")]
    #[case(AppError::FileUploadFailed(String::new()), 500, "FILE_UPLOAD_FAILED")]
    #[case(AppError::ImageProcessing(String::new()), 500, "IMAGE_PROCESSING_FAILED")]
    #[case(AppError::PayloadTooLarge(String::new()), 413, "PAYLOAD_TOO_LARGE")]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::ExternalService(String::new()), 502, "EXTERNAL_SERVICE_ERROR")]
    fn test_status_and_code(#[case] err: AppError, #[case] status: u16, #[case] code: &str) {
        assert_eq!(err.status_code(), status);
        assert_eq!(err.error_code(), code);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::NeedImage("msg".into()).to_string(),
            "Image required: msg"
        );
        assert_eq!(
            AppError::FileUploadFailed("msg".into()).to_string(),
            "File upload failed: msg"
        );
        assert_eq!(
            AppError::ImageProcessing("msg".into()).to_string(),
            "Image processing failed: msg"
        );
        assert_eq!(
            AppError::ExternalService("msg".into()).to_string(),
            "External service error: msg"
        );
    }
}
