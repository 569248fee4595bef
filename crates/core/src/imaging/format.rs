//! Content-type to image format mapping.

use image::ImageFormat;

/// Subtype of a MIME type: the text after the last `/`, without parameters.
///
/// `image/png` gives `png`; `image/jpeg; q=0.9` gives `jpeg`. A value with no
/// `/` is returned whole.
#[must_use]
pub fn content_subtype(content_type: &str) -> &str {
    let essence = content_type
        .split_once(';')
        .map_or(content_type, |(essence, _)| essence)
        .trim();
    essence
        .rfind('/')
        .map_or(essence, |idx| &essence[idx + 1..])
}

/// Image format named by a content-type subtype (`png`, `jpeg`, `jpg`, ...).
#[must_use]
pub fn format_for_subtype(subtype: &str) -> Option<ImageFormat> {
    ImageFormat::from_extension(subtype.to_ascii_lowercase())
}
