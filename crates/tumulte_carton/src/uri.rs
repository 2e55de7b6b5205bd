//! File path to `file://` URI conversion.

use std::path::Path;

use url::Url;

/// Convert an absolute file path to a `file://` URI string.
///
/// Returns `None` for relative paths and synthetic keys that are not files.
pub fn path_to_uri(path: &str) -> Option<String> {
    Url::from_file_path(Path::new(path))
        .ok()
        .map(|url| url.to_string())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_uri() {
        assert_eq!(
            path_to_uri("/w/my app/app.riot").as_deref(),
            Some("file:///w/my%20app/app.riot")
        );
        assert_eq!(path_to_uri("relative/app.riot"), None);
    }
}
