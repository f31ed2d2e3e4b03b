//! Source clean-up applied before minification.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::utils::path::{is_external_link, normalize_segments};

static DEBUG_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\* <debug> \*/.*?/\* </debug> \*/").unwrap());

static DIRECTIVES: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    ["requires", "uses"]
        .map(|key| Regex::new(&format!(r"(?s)\b{key}\s*?:\s*?\[.*?\]\s*?,")).unwrap())
});

static CSS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(url\s*\(\s*['"]?)([^'")]*?)(\?[^'")]*)?(['"]?\s*\))"#).unwrap()
});

/// Token used by old IE `behavior` rules. Never a path.
const VML_BEHAVIOR: &str = "#default#VML";

/// Remove `/* <debug> */ ... /* </debug> */` blocks.
pub fn strip_debug_blocks(source: &str) -> Cow<'_, str> {
    DEBUG_BLOCK.replace_all(source, "")
}

/// Remove `requires: [...],` and `uses: [...],` class directives.
///
/// The bundle already loads every dependency in order, so the class loader
/// must not fetch them again.
pub fn strip_directives(source: &str) -> String {
    let mut out = source.to_owned();
    for re in DIRECTIVES.iter() {
        if let Cow::Owned(replaced) = re.replace_all(&out, "") {
            out = replaced;
        }
    }
    out
}

/// Rewrite relative `url(...)` references in a stylesheet served from `css_path`.
///
/// Each relative URL is resolved against the stylesheet's directory and
/// normalised, so it stays valid once the CSS is bundled elsewhere. Query
/// strings and quotes are preserved. Absolute, fragment, scheme URLs and
/// `#default#VML` are left untouched.
pub fn rewrite_css_urls<'a>(css: &'a str, css_path: &str) -> Cow<'a, str> {
    let base = css_path.rfind('/').map_or("", |i| &css_path[..=i]);

    CSS_URL.replace_all(css, |caps: &Captures| {
        let url = caps[2].trim();
        if url.is_empty()
            || url == VML_BEHAVIOR
            || url.starts_with('/')
            || url.starts_with('#')
            || is_external_link(url)
        {
            return caps[0].to_owned();
        }

        let resolved = normalize_segments(&format!("{base}{url}"));
        format!(
            "{}{}{}{}",
            &caps[1],
            resolved,
            caps.get(3).map_or("", |m| m.as_str()),
            &caps[4]
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_debug_blocks_is_lazy_and_multiline() {
        let source = "a();\n/* <debug> */\nconsole.log(1);\n/* </debug> */\nb();\n/* <debug> */c();/* </debug> */d();";
        assert_eq!(strip_debug_blocks(source), "a();\n\nb();\nd();");
    }

    #[test]
    fn test_strip_directives() {
        let source = "Ext.define('A', {\n    requires: [\n        'B',\n        'C'\n    ],\n    uses: ['D'],\n    extend: 'E'\n});";
        assert_eq!(
            strip_directives(source),
            "Ext.define('A', {\n    \n    \n    extend: 'E'\n});"
        );
    }

    #[test]
    fn test_directive_without_trailing_comma_is_kept() {
        let source = "x = {requires: ['B']}";
        assert_eq!(strip_directives(source), source);
    }

    #[test]
    fn test_relative_url_is_resolved_against_stylesheet() {
        let css = ".a{background:url(../img/x.png)}";
        assert_eq!(
            rewrite_css_urls(css, "a/b/c.css"),
            ".a{background:url(a/img/x.png)}"
        );
    }

    #[test]
    fn test_url_keeps_quotes_and_query() {
        let css = r#"@font-face{src:url('fonts/f.woff?v=3') format('woff'), URL( "./i.svg#icon" )}"#;
        assert_eq!(
            rewrite_css_urls(css, "/ctx/theme/base.css"),
            r#"@font-face{src:url('/ctx/theme/fonts/f.woff?v=3') format('woff'), URL( "/ctx/theme/i.svg#icon" )}"#
        );
    }

    #[test]
    fn test_untouched_urls() {
        let css = "a{behavior:url(#default#VML)}b{background:url(data:image/png;base64,AAA)}\
                   c{background:url(/abs.png)}d{background:url(https://cdn.example.com/x.png)}";
        assert_eq!(rewrite_css_urls(css, "theme/base.css"), css);
    }
}
