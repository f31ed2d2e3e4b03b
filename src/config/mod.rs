//! Application configuration management for `webres.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── bundle     # [bundle], [bundle.minify]
//! │   └── serve      # [serve]
//! ├── error          # ConfigError
//! └── mod.rs         # AppConfig (this file)
//! ```
//!
//! The file is optional. Without it every section takes its defaults and
//! paths resolve against the current directory.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{BundleConfig, ServeConfig};

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{BundleArgs, Cli, Commands};
use crate::debug;
use crate::utils::path::normalize_path;

/// Root configuration structure representing webres.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Bundling settings
    #[serde(default)]
    pub bundle: BundleConfig,

    /// Artifact server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl AppConfig {
    /// Load configuration for `cli`, then apply its overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let config_path = cwd.join(&cli.config);

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            debug!("config"; "{} not found, using defaults", config_path.display());
            Self::default()
        };

        let base = config_path.parent().map_or(cwd, Path::to_path_buf);
        config.config_path = config_path;
        config.resolve_paths(&base);
        config.apply_command_options(cli);
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::parse(&content)
    }

    /// Make `root` and `output` absolute, relative to the config file's directory.
    fn resolve_paths(&mut self, base: &Path) {
        self.bundle.root = normalize_path(&base.join(&self.bundle.root));
        self.bundle.output = normalize_path(&base.join(&self.bundle.output));
    }

    fn apply_command_options(&mut self, cli: &Cli) {
        let cwd = std::env::current_dir().unwrap_or_default();
        self.apply_bundle_args(cli.command.bundle_args(), &cwd);

        if let Commands::Serve {
            interface, port, ..
        } = &cli.command
        {
            if let Some(interface) = interface {
                self.serve.interface = *interface;
            }
            if let Some(port) = port {
                self.serve.port = *port;
            }
        }
    }

    /// CLI paths are relative to the working directory, not the config file.
    fn apply_bundle_args(&mut self, args: &BundleArgs, cwd: &Path) {
        if let Some(root) = &args.root {
            self.bundle.root = normalize_path(&cwd.join(root));
        }
        if let Some(output) = &args.output {
            self.bundle.output = normalize_path(&cwd.join(output));
        }
        if let Some(production) = args.production_override() {
            self.bundle.production = production;
        }
    }
}

#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    AppConfig::parse(content).unwrap()
}
