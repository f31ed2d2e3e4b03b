//! Path and URL utilities.
//!
//! - [`normalize_path`]: absolute filesystem path (canonicalize + fallback)
//! - [`normalize_segments`]: lexical `.`/`..` resolution for URL paths
//! - [`is_external_link`]: scheme detection (`https:`, `data:`, ...)
//! - [`public_url`]: logical path under the context path

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first. Falls back to joining with the current
/// directory when the path does not exist yet.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Resolve `.` and `..` in a `/`-separated path without touching the filesystem.
///
/// `..` at the root of an absolute path is dropped. Leading `..` in a
/// relative path is kept.
///
/// # Examples
/// ```ignore
/// assert_eq!(normalize_segments("a/b/../img/x.png"), "a/img/x.png");
/// assert_eq!(normalize_segments("/ctx/./a/../../../x"), "/x");
/// assert_eq!(normalize_segments("../x/./y"), "../x/y");
/// ```
pub fn normalize_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match stack.last() {
                Some(&last) if last != ".." => {
                    stack.pop();
                }
                _ if absolute => {}
                _ => stack.push(".."),
            },
            _ => stack.push(segment),
        }
    }

    let joined = stack.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

/// Check if a link is external (has a URL scheme like http:, data:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Public URL of a logical resource path under `context_path`.
///
/// Joins with exactly one `/`. External and protocol-relative links are
/// returned unchanged.
///
/// # Examples
/// ```ignore
/// assert_eq!(public_url("/ctx", "app/base.js"), "/ctx/app/base.js");
/// assert_eq!(public_url("", "theme/base.css"), "/theme/base.css");
/// assert_eq!(public_url("/ctx", "https://cdn.example.com/x.js"), "https://cdn.example.com/x.js");
/// ```
pub fn public_url(context_path: &str, path: &str) -> String {
    if is_external_link(path) || path.starts_with("//") {
        return path.to_owned();
    }
    format!(
        "{}/{}",
        context_path.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
