//! Expansion of directory entries into concrete file lists.

use super::ContentProvider;
use crate::error::BundleError;
use crate::logger::Reporter;

/// Expand `path` into the files under it that end with `suffix`.
///
/// A path ending in `/` is listed through the provider and walked
/// recursively; any other path yields itself when it has the suffix.
/// Order follows the provider's listing.
pub fn enumerate(
    provider: &dyn ContentProvider,
    path: &str,
    suffix: &str,
    reporter: &dyn Reporter,
) -> Vec<String> {
    let mut files = Vec::new();
    walk(provider, path, suffix, reporter, &mut files);
    files
}

fn walk(
    provider: &dyn ContentProvider,
    path: &str,
    suffix: &str,
    reporter: &dyn Reporter,
    files: &mut Vec<String>,
) {
    if !path.ends_with('/') {
        if path.ends_with(suffix) {
            files.push(path.to_owned());
        }
        return;
    }

    match provider.list(path) {
        Ok(children) => {
            for child in children {
                walk(provider, &child, suffix, reporter, files);
            }
        }
        Err(err) => reporter.error("enumerate", &BundleError::ResourceRead(err)),
    }
}
