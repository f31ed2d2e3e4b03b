//! HTTP response construction.
//!
//! Responses are built as plain [`Reply`] values so the caching rules can be
//! checked without a socket; [`send`] writes them out through tiny_http.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tiny_http::{Header, Request, Response, StatusCode};

use crate::bundle::{Artifact, TemplateVars};
use crate::utils::date::DateTimeUtc;
use crate::utils::html::escape;
use crate::utils::mime::types::{HTML, PLAIN};

/// A fully built response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Reply {
    fn new(status: u16, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", content_type.to_owned())],
            body,
        }
    }

    #[cfg(test)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Reply for a published artifact.
///
/// A matching `If-None-Match` gets `304 Not Modified` with no body. Anything
/// else gets the full content with long-lived caching headers.
pub fn artifact_reply(artifact: &Artifact, if_none_match: Option<&str>, now: u64) -> Reply {
    let etag = format!("\"{}\"", artifact.etag);

    if if_none_match.is_some_and(|value| etag_matches(value, &etag)) {
        return Reply {
            status: 304,
            headers: vec![("ETag", etag)],
            body: Vec::new(),
        };
    }

    let expires = DateTimeUtc::from_unix(now.saturating_add(u64::from(artifact.cache_seconds)));
    Reply {
        status: 200,
        headers: vec![
            ("Content-Type", artifact.content_type.to_owned()),
            ("Content-Length", artifact.content.len().to_string()),
            ("ETag", etag),
            (
                "Cache-Control",
                format!("public, max-age={}", artifact.cache_seconds),
            ),
            ("Expires", expires.to_http_date()),
        ],
        body: artifact.content.clone(),
    }
}

/// `If-None-Match` may list several tags, weak tags, or `*`.
fn etag_matches(header: &str, etag: &str) -> bool {
    header.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

/// Reply with a source file served as-is.
pub fn file_reply(path: &Path) -> Result<Reply> {
    let body = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut reply = Reply::new(200, crate::utils::mime::from_path(path), body);
    reply.headers.push(("Cache-Control", "no-cache".to_owned()));
    Ok(reply)
}

pub fn not_found() -> Reply {
    Reply::new(404, PLAIN, b"404 Not Found".to_vec())
}

pub fn unavailable() -> Reply {
    Reply::new(503, PLAIN, b"503 Service Unavailable".to_vec())
}

/// Page that loads every group, with the generated tags listed for copying.
pub fn preview_reply(vars: &TemplateVars, artifacts: &[String]) -> Reply {
    let mut head = String::new();
    let mut scripts = String::new();
    let mut listing = String::new();

    for (group, html) in vars.iter() {
        if group.ends_with("_css") {
            head.push_str(html);
        } else {
            scripts.push_str(html);
        }
        listing.push_str(&format!(
            "<h2>{}</h2>\n<pre>{}</pre>\n",
            escape(group),
            escape(html)
        ));
    }

    let artifacts: String = artifacts
        .iter()
        .map(|path| format!("<li><a href=\"{0}\">{0}</a></li>\n", escape(path)))
        .collect();

    let body = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>webres</title>\n{head}\n</head>\n<body>\n{listing}<h2>artifacts</h2>\n<ul>\n{artifacts}</ul>\n{scripts}\n</body>\n</html>\n"
    );
    Reply::new(200, HTML, body.into_bytes())
}

/// Write `reply` to the client. tiny_http omits the body for HEAD requests.
pub fn send(request: Request, reply: Reply) -> Result<()> {
    let mut response = Response::from_data(reply.body).with_status_code(StatusCode(reply.status));
    for (name, value) in &reply.headers {
        if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            response.add_header(header);
        }
    }
    request.respond(response)?;
    Ok(())
}

/// Value of the `If-None-Match` request header.
pub fn if_none_match(request: &Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv("If-None-Match"))
        .map(|h| h.value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact() -> Artifact {
        Artifact {
            path: "/res/appAbC-_123.js".into(),
            file_name: "appAbC-_123.js".into(),
            content: b"var a;\n".to_vec(),
            etag: "AbC-_123".into(),
            cache_seconds: 3600,
            content_type: "application/javascript",
        }
    }

    #[test]
    fn test_full_reply_carries_caching_headers() {
        let reply = artifact_reply(&artifact(), None, 784_108_177);

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, b"var a;\n");
        assert_eq!(reply.header("Content-Type"), Some("application/javascript"));
        assert_eq!(reply.header("Content-Length"), Some("7"));
        assert_eq!(reply.header("ETag"), Some("\"AbC-_123\""));
        assert_eq!(reply.header("Cache-Control"), Some("public, max-age=3600"));
        assert_eq!(reply.header("Expires"), Some("Sun, 06 Nov 1994 08:49:37 GMT"));
    }

    #[test]
    fn test_matching_etag_is_not_modified() {
        let reply = artifact_reply(&artifact(), Some("\"AbC-_123\""), 0);
        assert_eq!(reply.status, 304);
        assert!(reply.body.is_empty());
        assert_eq!(reply.header("ETag"), Some("\"AbC-_123\""));
        assert_eq!(reply.header("Content-Type"), None);
    }

    #[test]
    fn test_mismatched_etag_gets_content() {
        let reply = artifact_reply(&artifact(), Some("\"stale\""), 0);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, b"var a;\n");

        // unquoted value does not match the quoted tag
        let reply = artifact_reply(&artifact(), Some("AbC-_123"), 0);
        assert_eq!(reply.status, 200);
    }

    #[test]
    fn test_etag_lists_and_wildcards() {
        assert!(etag_matches("\"x\", \"AbC\"", "\"AbC\""));
        assert!(etag_matches("W/\"AbC\"", "\"AbC\""));
        assert!(etag_matches("*", "\"AbC\""));
        assert!(!etag_matches("\"x\"", "\"AbC\""));
    }

    #[test]
    fn test_preview_places_css_in_head_and_js_in_body() {
        let mut report = crate::bundle::BundleReport::default();
        report.groups.push(crate::bundle::GroupOutput {
            name: "app_js".into(),
            kind: crate::resource::GroupKind::Js,
            paths: vec!["/app1.js".into()],
        });
        report.groups.push(crate::bundle::GroupOutput {
            name: "theme_css".into(),
            kind: crate::resource::GroupKind::Css,
            paths: vec!["/theme1.css".into()],
        });
        let reply = preview_reply(&report.template_vars(""), &["/app1.js".to_string()]);
        let html = String::from_utf8(reply.body).unwrap();

        let head_end = html.find("</head>").unwrap();
        assert!(html.find(r#"<link rel="stylesheet" href="/theme1.css">"#).unwrap() < head_end);
        assert!(html.rfind(r#"<script src="/app1.js"></script>"#).unwrap() > head_end);
        assert!(html.contains("&lt;script src=&quot;/app1.js&quot;&gt;"));
    }
}
