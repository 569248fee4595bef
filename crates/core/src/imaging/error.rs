//! Resize error types.

use thiserror::Error;

/// Failures while decoding, scaling or encoding an image.
#[derive(Debug, Error)]
pub enum ResizeError {
    /// No encoder is available for the requested format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// Bytes are not a decodable image.
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Decoded image has a zero dimension.
    #[error("image has no pixels ({width}x{height})")]
    Empty {
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },

    /// Scaled image could not be encoded.
    #[error("failed to encode image as {format}: {source}")]
    Encode {
        /// Target format name.
        format: String,
        /// Underlying encoder error.
        #[source]
        source: image::ImageError,
    },

    /// The resize task did not run to completion.
    #[error("resize task aborted: {0}")]
    Aborted(String),
}
