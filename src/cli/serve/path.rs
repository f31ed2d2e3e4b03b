//! URL to source file resolution for literal (unbundled) resources.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Resolve a request path to a file under `root`.
///
/// Returns `None` for directories, missing files and anything that escapes
/// `root`, including through symlinks.
pub fn resolve_path(url: &str, root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);
    if clean.is_empty() || clean.split('/').any(|segment| segment == "..") {
        return None;
    }

    let canonical = root.join(&clean).canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;
    (canonical.starts_with(&root_canonical) && canonical.is_file()).then_some(canonical)
}

/// Decode, strip query string, trim slashes
fn normalize_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    decoded.trim_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_resolves_files_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/main.js"), "").unwrap();

        assert!(resolve_path("/app/main.js?v=1", dir.path()).is_some());
        assert!(resolve_path("/app/m%61in.js", dir.path()).is_some());
        assert!(resolve_path("/app/", dir.path()).is_none());
        assert!(resolve_path("/app/other.js", dir.path()).is_none());
    }

    #[test]
    fn test_rejects_traversal() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("web");
        fs::create_dir_all(&root).unwrap();
        fs::write(dir.path().join("secret.txt"), "").unwrap();

        assert!(resolve_path("/../secret.txt", &root).is_none());
        assert!(resolve_path("/%2e%2e/secret.txt", &root).is_none());
    }
}
