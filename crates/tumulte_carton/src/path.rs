//! File path helpers.
//!
//! Every path stored by the analysis host is normalized to forward slashes so
//! the same file is never tracked under two keys.

/// Suffix of a materialized declaration file (`child.riot` -> `child.riot.d.ts`).
pub const DECLARATION_SUFFIX: &str = ".d.ts";

/// Normalize a file path to forward slashes.
#[inline]
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// The declaration file path for a component or script path.
#[inline]
pub fn declaration_path(path: &str) -> String {
    format!("{path}{DECLARATION_SUFFIX}")
}

/// Strip a trailing `.d.ts`, if any.
#[inline]
pub fn strip_declaration_suffix(path: &str) -> &str {
    path.strip_suffix(DECLARATION_SUFFIX).unwrap_or(path)
}

/// Directory part of a normalized path (`/a/b.riot` -> `/a`).
pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Join `specifier` onto `base` and collapse `.` and `..` segments.
///
/// An absolute specifier replaces the base entirely.
pub fn join_path(base: &str, specifier: &str) -> String {
    let specifier = normalize_path(specifier);
    let joined = if specifier.starts_with('/') || has_drive_prefix(&specifier) || base.is_empty() {
        specifier
    } else {
        format!("{}/{}", base.trim_end_matches('/'), specifier)
    };

    let absolute = joined.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let body = segments.join("/");
    if absolute {
        format!("/{body}")
    } else {
        body
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("a\\b\\c.riot"), "a/b/c.riot");
        assert_eq!(normalize_path("/a/b.riot"), "/a/b.riot");
    }

    #[test]
    fn test_declaration_path() {
        assert_eq!(declaration_path("/w/child.riot"), "/w/child.riot.d.ts");
        assert_eq!(strip_declaration_suffix("/w/child.riot.d.ts"), "/w/child.riot");
        assert_eq!(strip_declaration_suffix("/w/child.riot"), "/w/child.riot");
    }

    #[test]
    fn test_dirname() {
        assert_eq!(dirname("/w/src/app.riot"), "/w/src");
        assert_eq!(dirname("/app.riot"), "/");
        assert_eq!(dirname("app.riot"), "");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/w/src", "./child.riot"), "/w/src/child.riot");
        assert_eq!(join_path("/w/src", "../lib/util"), "/w/lib/util");
        assert_eq!(join_path("/w/src", "/abs/x.ts"), "/abs/x.ts");
        assert_eq!(join_path("/", "../x.ts"), "/x.ts");
        assert_eq!(join_path("C:/w", "./x.ts"), "C:/w/x.ts");
    }
}
