//! Content-type helpers for uploaded image payloads.
//!
//! Payloads are accepted as raw bytes; the content type is derived from the
//! upload's file name when the caller does not supply one.

use std::path::Path;

/// Content type used when the extension is unknown.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Known image extensions and their content types.
const IMAGE_CONTENT_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
];

/// Resolve the content type for a file name by its extension.
///
/// # Examples
///
/// ```
/// use gallery_common::files::content_type_for;
///
/// assert_eq!(content_type_for("test_image.jpg"), "image/jpeg");
/// assert_eq!(content_type_for("PHOTO.PNG"), "image/png");
/// assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
/// ```
pub fn content_type_for(file_name: &str) -> &'static str {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_CONTENT_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, content_type)| *content_type)
        })
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Check if a file name has an image extension.
pub fn is_image_file(file_name: &str) -> bool {
    content_type_for(file_name) != DEFAULT_CONTENT_TYPE
}
