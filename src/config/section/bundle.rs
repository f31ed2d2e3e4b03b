//! `[bundle]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [bundle]
//! root = "web"                        # content root, relative to webres.toml
//! resources = "webresources.txt"      # group configuration, relative to root
//! properties = "version.properties"   # `{key}` variables, "" disables
//! production = true                   # bundle (true) or emit one tag per file
//! cache_seconds = 31536000
//! servlet_path = "/res"               # where artifacts are published
//! context_path = ""                   # prefix of generated tags and css urls
//! ignore_reorder = ["/lib/ext-all.js"]
//! output = "dist"                     # `webres build` target directory
//!
//! [bundle.minify]
//! js_line_break = 120                 # 0 disables
//! css_line_break = 120
//! mangle = false
//! verbose = false
//! preserve_semicolons = true
//! disable_optimizations = true
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::bundle::{BundleSettings, CssOptions, JsOptions};
use crate::resource::Mode;

/// Source discovery and publishing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BundleConfig {
    /// Root directory the content provider serves from.
    pub root: PathBuf,

    /// Group configuration file, as a logical path under `root`.
    pub resources: String,

    /// Property file for `{key}` substitution. Empty disables it.
    pub properties: String,

    pub production: bool,

    /// `max-age` of published artifacts.
    pub cache_seconds: u32,

    pub servlet_path: String,

    pub context_path: String,

    /// Files placed first and never reordered.
    pub ignore_reorder: Vec<String>,

    /// Directory `webres build` writes artifacts into.
    pub output: PathBuf,

    pub minify: MinifyConfig,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            resources: "webresources.txt".into(),
            properties: "version.properties".into(),
            production: true,
            cache_seconds: 31_536_000,
            servlet_path: String::new(),
            context_path: String::new(),
            ignore_reorder: Vec::new(),
            output: PathBuf::from("dist"),
            minify: MinifyConfig::default(),
        }
    }
}

impl BundleConfig {
    pub const fn mode(&self) -> Mode {
        Mode::from_production(self.production)
    }

    pub fn properties_path(&self) -> Option<&str> {
        (!self.properties.is_empty()).then_some(self.properties.as_str())
    }

    pub fn settings(&self) -> BundleSettings {
        BundleSettings {
            servlet_path: self.servlet_path.clone(),
            context_path: self.context_path.clone(),
            cache_seconds: self.cache_seconds,
            js: self.minify.js_options(),
            css: self.minify.css_options(),
        }
    }
}

/// Minifier knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MinifyConfig {
    pub js_line_break: usize,
    pub css_line_break: usize,
    pub mangle: bool,
    pub verbose: bool,
    pub preserve_semicolons: bool,
    pub disable_optimizations: bool,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            js_line_break: 120,
            css_line_break: 120,
            mangle: false,
            verbose: false,
            preserve_semicolons: true,
            disable_optimizations: true,
        }
    }
}

impl MinifyConfig {
    pub fn js_options(&self) -> JsOptions {
        JsOptions {
            line_break: (self.js_line_break > 0).then_some(self.js_line_break),
            mangle: self.mangle,
            verbose: self.verbose,
            preserve_semicolons: self.preserve_semicolons,
            disable_optimizations: self.disable_optimizations,
        }
    }

    pub fn css_options(&self) -> CssOptions {
        CssOptions {
            line_break: (self.css_line_break > 0).then_some(self.css_line_break),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{AppConfig, test_parse_config};
    use crate::resource::Mode;

    #[test]
    fn test_bundle_defaults() {
        let config = test_parse_config("");
        let bundle = &config.bundle;
        assert_eq!(bundle.resources, "webresources.txt");
        assert_eq!(bundle.properties_path(), Some("version.properties"));
        assert_eq!(bundle.mode(), Mode::Production);
        assert_eq!(bundle.cache_seconds, 31_536_000);

        let settings = bundle.settings();
        assert_eq!(settings.js.line_break, Some(120));
        assert!(settings.js.disable_optimizations);
        assert!(!settings.js.mangle);
    }

    #[test]
    fn test_bundle_section() {
        let config = test_parse_config(
            r#"
[bundle]
production = false
properties = ""
servlet_path = "/res"
ignore_reorder = ["/lib/ext-all.js"]

[bundle.minify]
js_line_break = 0
mangle = true
"#,
        );
        let bundle = &config.bundle;
        assert_eq!(bundle.mode(), Mode::Development);
        assert_eq!(bundle.properties_path(), None);
        assert_eq!(bundle.ignore_reorder, vec!["/lib/ext-all.js"]);

        let settings = bundle.settings();
        assert_eq!(settings.servlet_path, "/res");
        assert_eq!(settings.js.line_break, None);
        assert!(settings.js.mangle);
        assert_eq!(settings.css.line_break, Some(120));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(AppConfig::parse("[bundle]\nminfy = true").is_err());
        assert!(AppConfig::parse("[bundle.minify]\nwrap = 1").is_err());
    }
}
