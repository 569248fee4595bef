//! Upload error types.

use imgup_shared::AppError;
use thiserror::Error;

use crate::imaging::ResizeError;
use crate::storage::StorageError;

/// Upload operation errors.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Malformed input: a file name without extension or an empty key.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The uploaded file could not be read.
    #[error("an image file is required: {0}")]
    NeedImage(#[source] std::io::Error),

    /// One file of a multi-file upload failed; later files were not tried.
    #[error("failed to upload '{filename}': {source}")]
    FileUploadFailed {
        /// Original name of the failing file.
        filename: String,
        /// What went wrong with it.
        #[source]
        source: Box<UploadError>,
    },

    /// Image could not be decoded, scaled or encoded.
    #[error("image processing failed: {0}")]
    ImageProcessingFailed(#[from] ResizeError),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl UploadError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Wrap a per-file failure of a multi-file upload.
    #[must_use]
    pub fn file_upload_failed(filename: impl Into<String>, source: UploadError) -> Self {
        Self::FileUploadFailed {
            filename: filename.into(),
            source: Box::new(source),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::InvalidInput(msg)
            | UploadError::Storage(StorageError::InvalidKey(msg)) => Self::Validation(msg),
            UploadError::NeedImage(e) => Self::NeedImage(e.to_string()),
            e @ UploadError::FileUploadFailed { .. } => Self::FileUploadFailed(e.to_string()),
            UploadError::ImageProcessingFailed(e) => Self::ImageProcessing(e.to_string()),
            UploadError::Storage(e @ StorageError::FileTooLarge { .. }) => {
                Self::PayloadTooLarge(e.to_string())
            }
            UploadError::Storage(e @ StorageError::NotFound { .. }) => Self::NotFound(e.to_string()),
            UploadError::Storage(e) => Self::ExternalService(e.to_string()),
        }
    }
}
