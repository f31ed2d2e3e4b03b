//! Bundling: concatenate, minify and content-address resource groups.
//!
//! One engine serves two consumers:
//!
//! - [`Bundler::process`] publishes every artifact and is used by `build`
//!   and `serve`. [`BundleReport::template_vars`] turns the result into
//!   ready-to-embed HTML tags.
//! - [`Bundler::collect`] publishes nothing and is used by `list`.
//!   [`BundleReport::resource_paths`] flattens the result, CSS first.
//!
//! # Failure handling
//!
//! | Failure               | Effect                                  |
//! |-----------------------|-----------------------------------------|
//! | unreadable source     | reported, entry skipped                 |
//! | unknown group suffix  | reported, group skipped                 |
//! | minifier rejection    | group dropped, error in report          |
//! | publish IO error      | group dropped, error in report          |

mod clean;
mod hash;
mod minify;
mod publish;

pub use clean::{rewrite_css_urls, strip_debug_blocks, strip_directives};
pub use hash::ContentHash;
pub use minify::{CssOptions, JsOptions, Minifier, OxcMinifier};
pub use publish::{Artifact, ArtifactRegistry, DirPublisher, Publisher};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{BundleError, CompressionError};
use crate::logger::Reporter;
use crate::resource::{ContentProvider, GroupKind, ResourceGroups, WebResource};
use crate::utils::path::public_url;

/// Knobs that shape bundler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSettings {
    /// Root under which artifacts are published. Empty means `/`.
    pub servlet_path: String,
    /// Prefix of every public URL: tags and rewritten CSS urls.
    pub context_path: String,
    pub cache_seconds: u32,
    pub js: JsOptions,
    pub css: CssOptions,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            servlet_path: String::new(),
            context_path: String::new(),
            cache_seconds: 31_536_000,
            js: JsOptions::default(),
            css: CssOptions::default(),
        }
    }
}

impl BundleSettings {
    /// Request path of an artifact file.
    pub fn servlet_path_of(&self, file_name: &str) -> String {
        match self.servlet_path.as_str() {
            "" => format!("/{file_name}"),
            root if root.ends_with('/') => format!("{root}{file_name}"),
            root => format!("{root}/{file_name}"),
        }
    }
}

/// Output of one group: literal paths in order, then the bundle path if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOutput {
    pub name: String,
    pub kind: GroupKind,
    pub paths: Vec<String>,
}

/// Result of one bundling run.
#[derive(Debug, Default)]
pub struct BundleReport {
    /// Groups with at least one path, in configuration order.
    pub groups: Vec<GroupOutput>,
    /// Groups that were dropped, one error each.
    pub failures: Vec<BundleError>,
}

impl BundleReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    /// Per group, the concatenated HTML tags that load its paths.
    ///
    /// Local paths are placed under `context_path`, external links are kept.
    pub fn template_vars(&self, context_path: &str) -> TemplateVars {
        TemplateVars(
            self.groups
                .iter()
                .map(|group| {
                    let html: String = group
                        .paths
                        .iter()
                        .map(|path| group.kind.tag(&public_url(context_path, path)))
                        .collect();
                    (group.name.clone(), html)
                })
                .collect(),
        )
    }

    /// Every path of every group, CSS groups before JS groups.
    pub fn resource_paths(&self) -> Vec<String> {
        let (css, js): (Vec<&GroupOutput>, Vec<&GroupOutput>) = self
            .groups
            .iter()
            .partition(|group| group.kind == GroupKind::Css);
        css.into_iter()
            .chain(js)
            .flat_map(|group| group.paths.iter().cloned())
            .collect()
    }
}

/// Group name to HTML tags, in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVars(Vec<(String, String)>);

impl TemplateVars {
    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, html)| html.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Serialize for TemplateVars {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, html) in &self.0 {
            map.serialize_entry(name, html)?;
        }
        map.end()
    }
}

/// Turns [`ResourceGroups`] into artifacts.
pub struct Bundler<'a> {
    provider: &'a dyn ContentProvider,
    minifier: &'a dyn Minifier,
    reporter: &'a dyn Reporter,
    settings: &'a BundleSettings,
}

impl<'a> Bundler<'a> {
    pub fn new(
        provider: &'a dyn ContentProvider,
        minifier: &'a dyn Minifier,
        reporter: &'a dyn Reporter,
        settings: &'a BundleSettings,
    ) -> Self {
        Self {
            provider,
            minifier,
            reporter,
            settings,
        }
    }

    /// Bundle every group and hand each artifact to `publisher`.
    pub fn process(&self, groups: &ResourceGroups, publisher: &dyn Publisher) -> BundleReport {
        self.run(groups, Some(publisher))
    }

    /// Bundle every group without publishing, for path collection only.
    pub fn collect(&self, groups: &ResourceGroups) -> BundleReport {
        self.run(groups, None)
    }

    fn run(&self, groups: &ResourceGroups, publisher: Option<&dyn Publisher>) -> BundleReport {
        let mut report = BundleReport::default();

        for (name, entries) in groups.iter() {
            let Some(kind) = GroupKind::of(name) else {
                self.reporter
                    .error("bundle", &BundleError::UnknownGroupKind(name.to_owned()));
                continue;
            };

            match self.bundle_group(name, kind, entries, publisher) {
                Ok(paths) if paths.is_empty() => {}
                Ok(paths) => report.groups.push(GroupOutput {
                    name: name.to_owned(),
                    kind,
                    paths,
                }),
                Err(err) => {
                    self.reporter.error("bundle", &err);
                    report.failures.push(err);
                }
            }
        }

        report
    }

    fn bundle_group(
        &self,
        name: &str,
        kind: GroupKind,
        entries: &[WebResource],
        publisher: Option<&dyn Publisher>,
    ) -> Result<Vec<String>, BundleError> {
        let mut paths = Vec::new();
        let mut content = String::new();

        for entry in entries {
            if !entry.bundle {
                paths.push(entry.path.clone());
                continue;
            }

            let source = match self.provider.read_string(&entry.path) {
                Ok(source) => source,
                Err(err) => {
                    self.reporter.error("bundle", &BundleError::ResourceRead(err));
                    continue;
                }
            };

            let processed = self
                .minify(kind, &entry.path, &source)
                .map_err(|source| BundleError::Compression {
                    group: name.to_owned(),
                    path: entry.path.clone(),
                    source,
                })?;
            if !processed.is_empty() {
                content.push_str(&processed);
                content.push('\n');
            }
        }

        if content.is_empty() {
            return Ok(paths);
        }

        let artifact = self.artifact(name, kind, content.into_bytes());
        let path = artifact.path.clone();
        self.reporter.debug(
            "bundle",
            &format!("{name} -> {path} ({} bytes)", artifact.content.len()),
        );
        if let Some(publisher) = publisher {
            publisher
                .publish(artifact)
                .map_err(|err| BundleError::Publish(path.clone(), err))?;
        }
        paths.push(path);
        Ok(paths)
    }

    fn minify(
        &self,
        kind: GroupKind,
        path: &str,
        source: &str,
    ) -> Result<String, CompressionError> {
        let source = strip_debug_blocks(source);
        match kind {
            GroupKind::Js => self
                .minifier
                .minify_js(&strip_directives(&source), &self.settings.js),
            GroupKind::Css => {
                let css_url = public_url(&self.settings.context_path, path);
                let css = rewrite_css_urls(&source, &css_url);
                self.minifier.minify_css(&css, &self.settings.css)
            }
        }
    }

    fn artifact(&self, group: &str, kind: GroupKind, content: Vec<u8>) -> Artifact {
        let hash = ContentHash::of(&content).to_base64();
        let file_name = format!("{}{hash}.{}", kind.root(group), kind.extension());
        Artifact {
            path: self.settings.servlet_path_of(&file_name),
            file_name,
            content,
            etag: hash,
            cache_seconds: self.settings.cache_seconds,
            content_type: kind.content_type(),
        }
    }
}
