//! Image handling for uploads: format lookup and width-capped resizing.
//!
//! Scaling keeps the aspect ratio with integer arithmetic only:
//! `new_height = target_width * height / width`, truncated, never below 1.

mod error;
mod format;
mod resize;

pub use error::ResizeError;
pub use format::{content_subtype, format_for_subtype};
pub use resize::{ImagePayload, resize_to_width, scaled_height};
