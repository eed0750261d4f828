//! Item image URL helpers.

#[cfg(test)]
#[path = "image_test.rs"]
mod image_test;

/// Turn a stored image path into an absolute URL under `/api/items/images`.
///
/// Absolute `http(s)` URLs pass through; leading slashes and an `uploads/`
/// prefix are dropped from relative paths.
#[must_use]
pub fn image_url(base_url: &str, image_path: &str) -> String {
    if image_path.is_empty() {
        return String::new();
    }
    if image_path.starts_with("http") {
        return image_path.to_owned();
    }
    let trimmed = image_path.trim_start_matches('/');
    let clean = trimmed.strip_prefix("uploads/").unwrap_or(trimmed);
    format!("{}/api/items/images/{clean}", base_url.trim_end_matches('/'))
}

/// Map [`image_url`] over an optional list.
#[must_use]
pub fn image_urls(base_url: &str, image_paths: Option<&[String]>) -> Vec<String> {
    image_paths
        .unwrap_or_default()
        .iter()
        .map(|path| image_url(base_url, path))
        .collect()
}
