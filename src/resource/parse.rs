//! Parser for the `webresources.txt` group configuration.
//!
//! ```text
//! # comment
//! app_js:
//!   lib/{ver}/ext-all.js[s]     literal tag in production
//!   app/                        every .js file below app/
//!   app/debug.js[d]             development only
//! theme_css:
//!   theme/base.css[dp]
//! ```
//!
//! Mode letters: `p` production, `d` development, `s` literal tag.
//! An entry without brackets is `[p]`.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use rustc_hash::{FxHashMap, FxHashSet};

use super::{ContentProvider, GroupKind, ResourceGroups, WebResource, enumerate, reorder};
use crate::error::BundleError;
use crate::logger::Reporter;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{([^{}\s]+)\}").unwrap());

/// Which entries of the configuration are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Production,
    Development,
}

impl Mode {
    pub const fn from_production(production: bool) -> Self {
        if production {
            Self::Production
        } else {
            Self::Development
        }
    }
}

/// Replace every `{key}` in `line` with its value. Unknown keys stay as-is.
pub fn substitute<'a>(line: &'a str, vars: &FxHashMap<String, String>) -> Cow<'a, str> {
    if vars.is_empty() {
        return Cow::Borrowed(line);
    }
    PLACEHOLDER.replace_all(line, |caps: &Captures| match vars.get(&caps[1]) {
        Some(value) => value.clone(),
        None => caps[0].to_owned(),
    })
}

/// Parse a flat `.properties` file.
///
/// Supports `key=value`, `key: value` and `key value`, with `#` and `!`
/// comment lines. Keys and values are trimmed.
pub fn parse_properties(text: &str) -> FxHashMap<String, String> {
    let mut vars = FxHashMap::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let split = line
            .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
            .unwrap_or(line.len());
        let key = line[..split].trim();
        let mut value = line[split..].trim_start();
        if let Some(rest) = value.strip_prefix(['=', ':']) {
            value = rest.trim_start();
        }
        if !key.is_empty() {
            vars.insert(key.to_owned(), value.trim_end().to_owned());
        }
    }
    vars
}

/// Split a trailing `[modes]` suffix off an entry.
fn split_mode(entry: &str) -> (&str, &str) {
    if entry.ends_with(']')
        && let Some(open) = entry.rfind('[')
    {
        return (entry[..open].trim_end(), &entry[open + 1..entry.len() - 1]);
    }
    (entry, "p")
}

/// Reads the group configuration into [`ResourceGroups`] for one [`Mode`].
pub struct ConfigParser<'a> {
    provider: &'a dyn ContentProvider,
    reporter: &'a dyn Reporter,
    mode: Mode,
    ignore: FxHashSet<String>,
}

impl<'a> ConfigParser<'a> {
    pub fn new(provider: &'a dyn ContentProvider, reporter: &'a dyn Reporter, mode: Mode) -> Self {
        Self {
            provider,
            reporter,
            mode,
            ignore: FxHashSet::default(),
        }
    }

    /// Files that keep their position ahead of reordered ones.
    pub fn ignore_reorder<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Read the configuration and optional property file through the provider.
    ///
    /// An unreadable configuration yields no groups. An unreadable property
    /// file yields no variables.
    pub fn load(&self, config: &str, properties: Option<&str>) -> ResourceGroups {
        let vars = match properties {
            Some(path) => match self.provider.read_string(path) {
                Ok(text) => parse_properties(&text),
                Err(err) => {
                    self.reporter.error("config", &BundleError::ConfigRead(err));
                    FxHashMap::default()
                }
            },
            None => FxHashMap::default(),
        };

        match self.provider.read_string(config) {
            Ok(text) => self.parse(&text, &vars),
            Err(err) => {
                self.reporter.error("config", &BundleError::ConfigRead(err));
                ResourceGroups::new()
            }
        }
    }

    /// Parse configuration text with the given substitution variables.
    pub fn parse(&self, text: &str, vars: &FxHashMap<String, String>) -> ResourceGroups {
        let mut groups = ResourceGroups::new();
        let mut current: Option<(String, GroupKind)> = None;

        for raw in text.lines() {
            let line = substitute(raw, vars);
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_suffix(':') {
                let name = name.trim();
                current = match GroupKind::of(name) {
                    Some(kind) => Some((name.to_owned(), kind)),
                    None => {
                        self.reporter
                            .error("config", &BundleError::UnknownGroupKind(name.to_owned()));
                        None
                    }
                };
                continue;
            }

            let Some((group, kind)) = &current else {
                continue;
            };
            let (path, mode) = split_mode(line);
            self.push_entry(&mut groups, group, *kind, path, mode);
        }

        groups
    }

    fn push_entry(
        &self,
        groups: &mut ResourceGroups,
        group: &str,
        kind: GroupKind,
        path: &str,
        mode: &str,
    ) {
        match self.mode {
            Mode::Production if mode.contains('p') => {
                if mode.contains('s') {
                    groups.push(WebResource::literal(group, path));
                } else {
                    for file in self.expand(kind, path) {
                        groups.push(WebResource::bundle(group, file));
                    }
                }
            }
            Mode::Development if mode.contains('d') => {
                if path.ends_with('/') {
                    for file in self.expand(kind, path) {
                        groups.push(WebResource::literal(group, file));
                    }
                } else {
                    groups.push(WebResource::literal(group, path));
                }
            }
            _ => {}
        }
    }

    fn expand(&self, kind: GroupKind, path: &str) -> Vec<String> {
        let files = enumerate(self.provider, path, kind.file_suffix(), self.reporter);
        if kind == GroupKind::Js && files.len() > 1 {
            reorder(files, self.provider, &self.ignore, self.reporter)
        } else {
            files
        }
    }
}
