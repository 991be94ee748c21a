//! Turning stored `featuredImage` values into displayable URLs.

use quill_shared::UPLOADS_PREFIX;

/// Resolve a post's `featuredImage` against the API origin.
///
/// Uploaded images are stored as server-relative paths under the uploads
/// prefix; anything else is taken to be an absolute URL already.
pub fn resolve_image_url(api_origin: &str, featured_image: &str) -> Option<String> {
    let image = featured_image.trim();
    if image.is_empty() {
        return None;
    }

    let is_upload = image
        .strip_prefix(UPLOADS_PREFIX)
        .is_some_and(|rest| rest.starts_with('/'));
    if is_upload {
        Some(format!("{}{}", api_origin.trim_end_matches('/'), image))
    } else {
        Some(image.to_string())
    }
}
