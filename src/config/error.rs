//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading `webres.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),
}
