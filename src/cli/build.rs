//! `webres build`: bundle every group into the output directory.
//!
//! Writes one file per artifact plus `webres.json`, a map from group name
//! to the HTML tags that load it.

use std::fs;

use anyhow::{Context, Result, bail};

use crate::bundle::{BundleReport, DirPublisher, OxcMinifier};
use crate::config::AppConfig;
use crate::logger::TerminalReporter;
use crate::pipeline::Pipeline;
use crate::resource::FsProvider;
use crate::utils::plural_count;
use crate::{debug, log};

/// Manifest written next to the artifacts.
pub const MANIFEST_NAME: &str = "webres.json";

pub fn build(config: &AppConfig) -> Result<BundleReport> {
    let bundle = &config.bundle;
    let provider = FsProvider::new(&bundle.root);
    let publisher = DirPublisher::new(&bundle.output);

    let report =
        Pipeline::new(bundle, &provider, &OxcMinifier, &TerminalReporter).process(&publisher);

    for group in &report.groups {
        log!("bundle"; "{} ({})", group.name, plural_count(group.paths.len(), "path"));
        for path in &group.paths {
            debug!("bundle"; "  {}", path);
        }
    }

    let vars = report.template_vars(&bundle.context_path);
    fs::create_dir_all(&bundle.output)
        .with_context(|| format!("Failed to create {}", bundle.output.display()))?;
    let manifest = bundle.output.join(MANIFEST_NAME);
    fs::write(&manifest, serde_json::to_string_pretty(&vars)?)
        .with_context(|| format!("Failed to write {}", manifest.display()))?;
    log!("bundle"; "wrote {}", manifest.display());

    if !report.is_ok() {
        bail!("{} failed", plural_count(report.failures.len(), "group"));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BundleConfig;
    use tempfile::TempDir;

    #[test]
    fn test_build_writes_artifacts_and_manifest() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("web");
        fs::create_dir_all(&root).unwrap();
        fs::write(
            root.join("webresources.txt"),
            "site_css:\nsite.css\nsite_js:\nsite.js\n",
        )
        .unwrap();
        fs::write(root.join("site.css"), "body { color: red; }").unwrap();
        fs::write(root.join("site.js"), "var answer = 42;").unwrap();

        let config = AppConfig {
            bundle: BundleConfig {
                root: root.clone(),
                output: dir.path().join("dist"),
                properties: String::new(),
                ..BundleConfig::default()
            },
            ..AppConfig::default()
        };

        let report = build(&config).unwrap();
        assert_eq!(report.groups.len(), 2);

        let out = dir.path().join("dist");
        for group in &report.groups {
            let file = group.paths[0].trim_start_matches('/');
            assert!(out.join(file).is_file(), "{file} missing");
        }

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join(MANIFEST_NAME)).unwrap()).unwrap();
        assert!(manifest["site_css"].as_str().unwrap().starts_with("<link rel=\"stylesheet\""));
        assert!(manifest["site_js"].as_str().unwrap().starts_with("<script src=\"/site"));
    }

    #[test]
    fn test_build_fails_on_compression_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("webresources.txt"), "bad_js:\nbad.js\n").unwrap();
        fs::write(dir.path().join("bad.js"), "function (").unwrap();

        let config = AppConfig {
            bundle: BundleConfig {
                root: dir.path().to_path_buf(),
                output: dir.path().join("dist"),
                properties: String::new(),
                ..BundleConfig::default()
            },
            ..AppConfig::default()
        };

        assert!(build(&config).is_err());
        assert!(dir.path().join("dist").join(MANIFEST_NAME).is_file());
    }
}
