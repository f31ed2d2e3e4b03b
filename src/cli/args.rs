//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Web resource bundler: dependency-ordered, minified, content-addressed JS/CSS
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: webres.toml)
    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = "webres.toml",
        value_hint = clap::ValueHint::FilePath
    )]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Bundle every group and write the artifacts to the output directory
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        bundle_args: BundleArgs,
    },

    /// Print the resource paths a page should load, CSS first
    #[command(visible_alias = "l")]
    List {
        #[command(flatten)]
        bundle_args: BundleArgs,

        /// Print a JSON array instead of one path per line
        #[arg(short, long)]
        json: bool,
    },

    /// Bundle in memory and serve the artifacts over HTTP
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        bundle_args: BundleArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Shared arguments for every subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BundleArgs {
    /// Content root directory (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Output directory for `build` (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Bundle and minify, ignoring `[bundle] production`
    #[arg(long, conflicts_with = "development")]
    pub production: bool,

    /// One tag per source file, ignoring `[bundle] production`
    #[arg(short, long)]
    pub development: bool,
}

impl BundleArgs {
    /// `Some` when a mode flag was given on the command line.
    pub const fn production_override(&self) -> Option<bool> {
        match (self.production, self.development) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl Commands {
    pub const fn bundle_args(&self) -> &BundleArgs {
        match self {
            Self::Build { bundle_args }
            | Self::List { bundle_args, .. }
            | Self::Serve { bundle_args, .. } => bundle_args,
        }
    }
}
