//! Destinations for bundled artifacts.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// One bundled, content-addressed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Request path the artifact is served at, e.g. `/res/app<hash>.js`.
    pub path: String,
    /// `<group-root><hash>.<ext>`
    pub file_name: String,
    pub content: Vec<u8>,
    /// Content hash, unquoted.
    pub etag: String,
    pub cache_seconds: u32,
    pub content_type: &'static str,
}

/// Receives artifacts as the bundler produces them.
pub trait Publisher: Send + Sync {
    fn publish(&self, artifact: Artifact) -> io::Result<()>;
}

/// In-memory artifact table shared with the HTTP server.
///
/// Registration only ever adds entries. Re-publishing a path replaces it.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    artifacts: RwLock<FxHashMap<String, Arc<Artifact>>>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &str) -> Option<Arc<Artifact>> {
        self.artifacts.read().get(path).cloned()
    }

    pub fn len(&self) -> usize {
        self.artifacts.read().len()
    }

    /// Registered request paths, sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<_> = self.artifacts.read().keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Publisher for ArtifactRegistry {
    fn publish(&self, artifact: Artifact) -> io::Result<()> {
        self.artifacts
            .write()
            .insert(artifact.path.clone(), Arc::new(artifact));
        Ok(())
    }
}

/// Writes each artifact's file name into a directory.
#[derive(Debug, Clone)]
pub struct DirPublisher {
    dir: PathBuf,
}

impl DirPublisher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Publisher for DirPublisher {
    fn publish(&self, artifact: Artifact) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(&artifact.file_name), &artifact.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact(path: &str, content: &str) -> Artifact {
        Artifact {
            path: path.into(),
            file_name: path.trim_start_matches('/').into(),
            content: content.as_bytes().to_vec(),
            etag: "hash".into(),
            cache_seconds: 60,
            content_type: "text/css",
        }
    }

    #[test]
    fn test_registry_lookup() {
        let registry = ArtifactRegistry::new();
        registry.publish(artifact("/b.css", "b")).unwrap();
        registry.publish(artifact("/a.css", "a")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.paths(), vec!["/a.css", "/b.css"]);
        assert_eq!(registry.get("/a.css").unwrap().content, b"a");
        assert!(registry.get("/c.css").is_none());
    }

    #[test]
    fn test_dir_publisher_writes_file() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("dist");
        DirPublisher::new(&out)
            .publish(artifact("/theme.css", "body{}"))
            .unwrap();

        assert_eq!(fs::read_to_string(out.join("theme.css")).unwrap(), "body{}");
    }
}
