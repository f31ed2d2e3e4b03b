//! HTML escaping for the preview page.

use std::borrow::Cow;

/// Escape `<`, `>`, `&`, `"` and `'` for text and attribute contexts.
///
/// Borrows when nothing needs escaping.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script src="a.js"></script>"#),
            "&lt;script src=&quot;a.js&quot;&gt;&lt;/script&gt;"
        );
        assert!(matches!(escape("/app.js"), Cow::Borrowed(_)));
    }
}
