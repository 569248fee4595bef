//! Width-capped image resizing.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

use super::error::ResizeError;
use super::format::format_for_subtype;

/// Bytes ready to be stored, with the content type they are stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Encoded image bytes.
    pub bytes: Bytes,
    /// MIME type of `bytes`.
    pub content_type: String,
}

impl ImagePayload {
    /// Length of the encoded bytes.
    #[must_use]
    pub fn content_length(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Height that keeps the aspect ratio when scaling to `target_width`.
///
/// Integer division truncates; the result is at least 1.
#[must_use]
pub fn scaled_height(original_width: u32, original_height: u32, target_width: u32) -> u32 {
    let scaled = u64::from(target_width) * u64::from(original_height)
        / u64::from(original_width.max(1));
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Scale `bytes` down to `target_width` and re-encode it as `format`.
///
/// Images narrower than `target_width` come back untouched. Anything else,
/// including an image exactly `target_width` wide, is scaled to
/// `target_width x scaled_height(..)`, stripped of alpha and re-encoded.
///
/// # Errors
///
/// Returns an error if the bytes do not decode, `format` has no encoder, or
/// encoding fails.
pub fn resize_to_width(
    bytes: Bytes,
    format: &str,
    content_type: &str,
    target_width: u32,
) -> Result<ImagePayload, ResizeError> {
    let image = image::load_from_memory(&bytes).map_err(ResizeError::Decode)?;
    let (width, height) = image.dimensions();

    if width == 0 || height == 0 {
        return Err(ResizeError::Empty { width, height });
    }

    if width < target_width {
        return Ok(ImagePayload {
            bytes,
            content_type: content_type.to_string(),
        });
    }

    let output_format =
        format_for_subtype(format).ok_or_else(|| ResizeError::UnsupportedFormat(format.to_string()))?;

    let new_height = scaled_height(width, height, target_width);
    let resized = image.resize_exact(target_width, new_height, FilterType::Triangle);
    let flattened = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut buf = Cursor::new(Vec::new());
    flattened
        .write_to(&mut buf, output_format)
        .map_err(|source| ResizeError::Encode {
            format: format.to_string(),
            source,
        })?;

    Ok(ImagePayload {
        bytes: Bytes::from(buf.into_inner()),
        content_type: content_type.to_string(),
    })
}
