//! Content hashes for cache-busting file names.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// A 128-bit content hash (truncated blake3 output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Hash `content`.
    pub fn of(content: &[u8]) -> Self {
        let digest = blake3::hash(content);
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest.as_bytes()[..16]);
        Self(bytes)
    }

    /// URL-safe base64 without padding, always 22 characters.
    pub fn to_base64(self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_stable() {
        let a = ContentHash::of(b"var a=1;\n");
        let b = ContentHash::of(b"var a=1;\n");
        assert_eq!(a, b);
        assert_eq!(a.to_base64(), b.to_base64());
        assert_ne!(a, ContentHash::of(b"var a=2;\n"));
    }

    #[test]
    fn test_base64_is_url_safe() {
        let encoded = ContentHash::of(b"body{color:red}").to_base64();
        assert_eq!(encoded.len(), 22);
        assert!(
            encoded
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }
}
