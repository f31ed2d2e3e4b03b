//! Resource discovery: configuration, enumeration and dependency ordering.
//!
//! # Pipeline
//!
//! ```text
//! webresources.txt ──► ConfigParser ──► enumerate ──► reorder (js only) ──► ResourceGroups
//!                          ▲                                  │
//!                 version.properties                   scan + DependencyGraph
//! ```

mod enumerate;
mod graph;
mod order;
mod parse;
mod provider;
mod scan;

pub use enumerate::enumerate;
pub use graph::{CircularReference, DependencyGraph};
pub use order::reorder;
pub use parse::{ConfigParser, Mode};
pub use provider::{ContentProvider, FsProvider};
pub use scan::scan;

#[cfg(test)]
pub use provider::MemoryProvider;

/// Asset type of a group, taken from the group name suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Js,
    Css,
}

impl GroupKind {
    /// `app_js` is a JS group, `theme_css` a CSS group.
    pub fn of(group: &str) -> Option<Self> {
        if group.ends_with("_js") {
            Some(Self::Js)
        } else if group.ends_with("_css") {
            Some(Self::Css)
        } else {
            None
        }
    }

    /// Group name suffix, including the underscore.
    pub const fn group_suffix(self) -> &'static str {
        match self {
            Self::Js => "_js",
            Self::Css => "_css",
        }
    }

    /// File extension of bundled output, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Css => "css",
        }
    }

    /// Suffix that enumerated files must carry.
    pub const fn file_suffix(self) -> &'static str {
        match self {
            Self::Js => ".js",
            Self::Css => ".css",
        }
    }

    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Js => "application/javascript",
            Self::Css => "text/css",
        }
    }

    /// Group name without its type suffix: `app_js` becomes `app`.
    pub fn root(self, group: &str) -> &str {
        group.strip_suffix(self.group_suffix()).unwrap_or(group)
    }

    /// HTML tag that loads `href`.
    pub fn tag(self, href: &str) -> String {
        match self {
            Self::Js => format!(r#"<script src="{href}"></script>"#),
            Self::Css => format!(r#"<link rel="stylesheet" href="{href}">"#),
        }
    }
}

/// One configured resource entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResource {
    pub group: String,
    pub path: String,
    /// Concatenate and minify when true, reference as a literal tag otherwise.
    pub bundle: bool,
}

impl WebResource {
    pub fn bundle(group: &str, path: impl Into<String>) -> Self {
        Self {
            group: group.to_owned(),
            path: path.into(),
            bundle: true,
        }
    }

    pub fn literal(group: &str, path: impl Into<String>) -> Self {
        Self {
            group: group.to_owned(),
            path: path.into(),
            bundle: false,
        }
    }
}

/// Resource groups in configuration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceGroups {
    groups: Vec<(String, Vec<WebResource>)>,
}

impl ResourceGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `resource` to its group, opening the group on first use.
    pub fn push(&mut self, resource: WebResource) {
        match self.groups.iter_mut().find(|(name, _)| *name == resource.group) {
            Some((_, entries)) => entries.push(resource),
            None => self.groups.push((resource.group.clone(), vec![resource])),
        }
    }

    #[cfg(test)]
    pub fn get(&self, group: &str) -> Option<&[WebResource]> {
        self.groups
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, entries)| entries.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[WebResource])> {
        self.groups
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_kind_from_suffix() {
        assert_eq!(GroupKind::of("app_js"), Some(GroupKind::Js));
        assert_eq!(GroupKind::of("theme_css"), Some(GroupKind::Css));
        assert_eq!(GroupKind::of("images"), None);
        assert_eq!(GroupKind::Js.root("app_js"), "app");
        assert_eq!(GroupKind::Css.root("theme_css"), "theme");
    }

    #[test]
    fn test_tags() {
        assert_eq!(
            GroupKind::Js.tag("/ctx/app.js"),
            r#"<script src="/ctx/app.js"></script>"#
        );
        assert_eq!(
            GroupKind::Css.tag("/t.css"),
            r#"<link rel="stylesheet" href="/t.css">"#
        );
    }

    #[test]
    fn test_groups_keep_insertion_order() {
        let mut groups = ResourceGroups::new();
        groups.push(WebResource::bundle("b_js", "b1.js"));
        groups.push(WebResource::bundle("a_css", "a.css"));
        groups.push(WebResource::literal("b_js", "b2.js"));

        let names: Vec<_> = groups.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["b_js", "a_css"]);

        let b = groups.get("b_js").unwrap();
        assert_eq!(b[0].path, "b1.js");
        assert!(!b[1].bundle);
        assert_eq!(groups.len(), 2);
    }
}
