//! Pipeline error types.
//!
//! Only [`BundleError::Compression`] and [`BundleError::Publish`] fail a
//! group. Everything else is reported through a [`Reporter`] and the run
//! continues with less content.
//!
//! [`Reporter`]: crate::logger::Reporter

use std::path::PathBuf;

use thiserror::Error;

use crate::resource::CircularReference;

/// Failure to resolve a logical path through a content provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("`{0}` not found")]
    NotFound(String),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),
}

/// The minifier rejected its input.
#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("javascript: {0}")]
    Js(String),

    #[error("css: {0}")]
    Css(String),
}

/// Errors raised while turning configured groups into artifacts.
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("cannot read config")]
    ConfigRead(#[source] ProviderError),

    #[error("cannot read resource")]
    ResourceRead(#[source] ProviderError),

    #[error(transparent)]
    CircularReference(#[from] CircularReference),

    #[error("cannot minify `{path}` in group `{group}`")]
    Compression {
        group: String,
        path: String,
        #[source]
        source: CompressionError,
    },

    #[error("cannot publish `{0}`")]
    Publish(String, #[source] std::io::Error),

    #[error("group `{0}` must end with `_js` or `_css`")]
    UnknownGroupKind(String),
}

/// Render an error together with its `source()` chain on one line.
pub fn chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_includes_sources() {
        let err = BundleError::ResourceRead(ProviderError::NotFound("app/a.js".into()));
        assert_eq!(chain(&err), "cannot read resource: `app/a.js` not found");
    }

    #[test]
    fn test_compression_error_names_group_and_file() {
        let err = BundleError::Compression {
            group: "app_js".into(),
            path: "app/a.js".into(),
            source: CompressionError::Js("Unexpected token".into()),
        };
        assert_eq!(
            chain(&err),
            "cannot minify `app/a.js` in group `app_js`: javascript: Unexpected token"
        );
    }
}
