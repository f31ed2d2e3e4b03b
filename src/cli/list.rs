//! `webres list`: print the resource paths a page has to load.

use std::io::{Write, stdout};

use anyhow::Result;

use crate::bundle::OxcMinifier;
use crate::config::AppConfig;
use crate::logger::TerminalReporter;
use crate::pipeline::Pipeline;
use crate::resource::FsProvider;

pub fn list(config: &AppConfig, json: bool) -> Result<()> {
    let provider = FsProvider::new(&config.bundle.root);
    let report =
        Pipeline::new(&config.bundle, &provider, &OxcMinifier, &TerminalReporter).collect();
    let paths = report.resource_paths();

    let mut out = stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&paths)?)?;
    } else {
        for path in &paths {
            writeln!(out, "{path}")?;
        }
    }
    Ok(())
}
