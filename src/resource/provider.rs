//! Content providers resolve logical resource paths to bytes.
//!
//! Logical paths are `/`-separated. A path ending in `/` names a directory.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::ProviderError;

/// Read-only view over a tree of web resources.
pub trait ContentProvider: Send + Sync {
    /// Full content of the resource at `path`.
    fn read(&self, path: &str) -> Result<Vec<u8>, ProviderError>;

    /// Immediate children of the directory `dir`, as full logical paths.
    ///
    /// Subdirectories end with `/`.
    fn list(&self, dir: &str) -> Result<Vec<String>, ProviderError>;

    /// Read `path` as text, replacing invalid UTF-8.
    fn read_string(&self, path: &str) -> Result<String, ProviderError> {
        self.read(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Provider backed by a directory on disk. Listings are sorted by name.
#[derive(Debug, Clone)]
pub struct FsProvider {
    root: PathBuf,
}

impl FsProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a logical path onto the filesystem. A leading `/` is relative to root.
    pub fn locate(&self, path: &str) -> PathBuf {
        self.root.join(path.trim_start_matches('/'))
    }

    fn io_error(&self, path: &str, err: std::io::Error) -> ProviderError {
        if err.kind() == ErrorKind::NotFound {
            ProviderError::NotFound(path.to_owned())
        } else {
            ProviderError::Io(self.locate(path), err)
        }
    }
}

impl ContentProvider for FsProvider {
    fn read(&self, path: &str) -> Result<Vec<u8>, ProviderError> {
        fs::read(self.locate(path)).map_err(|err| self.io_error(path, err))
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, ProviderError> {
        let entries = fs::read_dir(self.locate(dir)).map_err(|err| self.io_error(dir, err))?;

        let prefix = if dir.ends_with('/') {
            dir.to_owned()
        } else {
            format!("{dir}/")
        };

        let mut children = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| self.io_error(dir, err))?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            children.push(if is_dir {
                format!("{prefix}{name}/")
            } else {
                format!("{prefix}{name}")
            });
        }
        children.sort();
        Ok(children)
    }
}

/// In-memory provider for tests. Directories are implied by file paths.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryProvider {
    files: rustc_hash::FxHashMap<String, Vec<u8>>,
}

#[cfg(test)]
impl MemoryProvider {
    pub fn new<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(path, content)| (path.to_owned(), content.as_bytes().to_vec()))
                .collect(),
        }
    }
}

#[cfg(test)]
impl ContentProvider for MemoryProvider {
    fn read(&self, path: &str) -> Result<Vec<u8>, ProviderError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(path.to_owned()))
    }

    fn list(&self, dir: &str) -> Result<Vec<String>, ProviderError> {
        let mut children: Vec<String> = self
            .files
            .keys()
            .filter_map(|path| {
                let rest = path.strip_prefix(dir)?;
                Some(match rest.find('/') {
                    Some(i) => format!("{dir}{}", &rest[..=i]),
                    None => path.clone(),
                })
            })
            .collect();
        if children.is_empty() {
            return Err(ProviderError::NotFound(dir.to_owned()));
        }
        children.sort();
        children.dedup();
        Ok(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_provider_reads_relative_to_root() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/a.js"), "var a;").unwrap();

        let provider = FsProvider::new(dir.path());
        assert_eq!(provider.read("/app/a.js").unwrap(), b"var a;");
        assert_eq!(provider.read_string("app/a.js").unwrap(), "var a;");
    }

    #[test]
    fn test_fs_provider_missing_file() {
        let dir = TempDir::new().unwrap();
        let provider = FsProvider::new(dir.path());
        assert!(matches!(
            provider.read("nope.js"),
            Err(ProviderError::NotFound(p)) if p == "nope.js"
        ));
    }

    #[test]
    fn test_fs_provider_lists_sorted_with_dir_markers() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app/view")).unwrap();
        fs::write(dir.path().join("app/b.js"), "").unwrap();
        fs::write(dir.path().join("app/a.js"), "").unwrap();

        let provider = FsProvider::new(dir.path());
        assert_eq!(
            provider.list("/app/").unwrap(),
            vec!["/app/a.js", "/app/b.js", "/app/view/"]
        );
    }

    #[test]
    fn test_memory_provider_lists_one_level() {
        let provider = MemoryProvider::new([
            ("app/a.js", ""),
            ("app/view/main.js", ""),
            ("app/view/list.js", ""),
        ]);
        assert_eq!(provider.list("app/").unwrap(), vec!["app/a.js", "app/view/"]);
    }
}
