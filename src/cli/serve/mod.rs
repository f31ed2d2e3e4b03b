//! `webres serve`: bundle in memory and serve the artifacts over HTTP.
//!
//! Requests resolve in this order:
//!
//! 1. `/` → preview page loading every group
//! 2. a published artifact → content with ETag, or `304 Not Modified`
//! 3. a file under the content root (development tags point here)
//! 4. `404 Not Found`

mod lifecycle;
mod path;
mod response;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::Request;

use crate::bundle::{ArtifactRegistry, OxcMinifier, TemplateVars};
use crate::config::AppConfig;
use crate::logger::TerminalReporter;
use crate::pipeline::Pipeline;
use crate::resource::FsProvider;
use crate::utils::date::unix_now;
use crate::utils::plural_count;
use crate::{debug, log};

use response::Reply;

/// Everything a request handler reads. Built once before the server starts.
struct ServeState {
    registry: ArtifactRegistry,
    vars: TemplateVars,
    root: PathBuf,
    context_path: String,
}

pub fn serve(config: &AppConfig) -> Result<()> {
    let state = Arc::new(prepare(config));

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    crate::core::register_server(Arc::clone(&server));
    log!("serve"; "http://{}", addr);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .context("failed to create thread pool")?;

    for request in server.incoming_requests() {
        let state = Arc::clone(&state);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn prepare(config: &AppConfig) -> ServeState {
    let bundle = &config.bundle;
    let provider = FsProvider::new(&bundle.root);
    let registry = ArtifactRegistry::new();

    let report =
        Pipeline::new(bundle, &provider, &OxcMinifier, &TerminalReporter).process(&registry);
    log!(
        "serve";
        "{}, {}",
        plural_count(report.groups.len(), "group"),
        plural_count(registry.len(), "artifact")
    );
    if !report.is_ok() {
        log!("serve"; "{} skipped", plural_count(report.failures.len(), "group"));
    }

    ServeState {
        registry,
        vars: report.template_vars(&bundle.context_path),
        root: bundle.root.clone(),
        context_path: bundle.context_path.clone(),
    }
}

fn handle_request(request: Request, state: &ServeState) -> Result<()> {
    if crate::core::is_shutdown() {
        return response::send(request, response::unavailable());
    }

    debug!("serve"; "{} {}", request.method(), request.url());
    let etag = response::if_none_match(&request);
    let reply = route(request.url(), etag.as_deref(), state, unix_now());
    response::send(request, reply)
}

fn route(url: &str, if_none_match: Option<&str>, state: &ServeState, now: u64) -> Reply {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path
        .strip_prefix(state.context_path.as_str())
        .filter(|rest| rest.is_empty() || rest.starts_with('/'))
        .unwrap_or(path);

    if path.is_empty() || path == "/" {
        return response::preview_reply(&state.vars, &state.registry.paths());
    }

    if let Some(artifact) = state.registry.get(path) {
        return response::artifact_reply(&artifact, if_none_match, now);
    }

    if let Some(file) = path::resolve_path(path, &state.root) {
        return match response::file_reply(&file) {
            Ok(reply) => reply,
            Err(e) => {
                log!("serve"; "{e:#}");
                response::not_found()
            }
        };
    }

    response::not_found()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{Artifact, Publisher};
    use std::fs;
    use tempfile::TempDir;

    fn state(root: PathBuf, context_path: &str) -> ServeState {
        let registry = ArtifactRegistry::new();
        registry
            .publish(Artifact {
                path: "/res/appHASH.js".into(),
                file_name: "appHASH.js".into(),
                content: b"var a;".to_vec(),
                etag: "HASH".into(),
                cache_seconds: 60,
                content_type: "application/javascript",
            })
            .unwrap();
        ServeState {
            registry,
            vars: TemplateVars::default(),
            root,
            context_path: context_path.into(),
        }
    }

    #[test]
    fn test_route_artifact_and_revalidation() {
        let dir = TempDir::new().unwrap();
        let state = state(dir.path().to_path_buf(), "");

        let reply = route("/res/appHASH.js?v=1", None, &state, 0);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, b"var a;");

        let reply = route("/res/appHASH.js", Some("\"HASH\""), &state, 0);
        assert_eq!(reply.status, 304);
    }

    #[test]
    fn test_route_strips_context_path() {
        let dir = TempDir::new().unwrap();
        let state = state(dir.path().to_path_buf(), "/shop");

        assert_eq!(route("/shop/res/appHASH.js", None, &state, 0).status, 200);
        assert_eq!(route("/shop", None, &state, 0).status, 200);
        assert_eq!(route("/shopping/res/appHASH.js", None, &state, 0).status, 404);
    }

    #[test]
    fn test_route_source_files_and_missing() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/main.js"), "var main;").unwrap();
        let state = state(dir.path().to_path_buf(), "");

        let reply = route("/app/main.js", None, &state, 0);
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, b"var main;");
        assert_eq!(reply.header("Cache-Control"), Some("no-cache"));

        assert_eq!(route("/app/missing.js", None, &state, 0).status, 404);
        assert_eq!(route("/../etc/passwd", None, &state, 0).status, 404);
    }

    #[test]
    fn test_route_root_is_preview() {
        let dir = TempDir::new().unwrap();
        let state = state(dir.path().to_path_buf(), "");
        let reply = route("/", None, &state, 0);
        assert_eq!(reply.status, 200);
        assert!(String::from_utf8(reply.body).unwrap().contains("/res/appHASH.js"));
    }
}
