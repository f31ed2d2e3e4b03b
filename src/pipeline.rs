//! One full bundling pass: configuration → groups → artifacts.
//!
//! ```text
//! ConfigParser ──► enumerate ──► reorder (js) ──► Bundler ──► Publisher
//! ```

use crate::bundle::{BundleReport, Bundler, Minifier, Publisher};
use crate::config::BundleConfig;
use crate::logger::Reporter;
use crate::resource::{ConfigParser, ContentProvider, ResourceGroups};

/// Collaborators for a single run, wired from [`BundleConfig`].
pub struct Pipeline<'a> {
    config: &'a BundleConfig,
    provider: &'a dyn ContentProvider,
    minifier: &'a dyn Minifier,
    reporter: &'a dyn Reporter,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a BundleConfig,
        provider: &'a dyn ContentProvider,
        minifier: &'a dyn Minifier,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            config,
            provider,
            minifier,
            reporter,
        }
    }

    /// Parse the group configuration for the configured mode.
    pub fn groups(&self) -> ResourceGroups {
        ConfigParser::new(self.provider, self.reporter, self.config.mode())
            .ignore_reorder(self.config.ignore_reorder.iter().cloned())
            .load(&self.config.resources, self.config.properties_path())
    }

    /// Bundle and publish every group.
    pub fn process(&self, publisher: &dyn Publisher) -> BundleReport {
        let groups = self.groups();
        let settings = self.config.settings();
        Bundler::new(self.provider, self.minifier, self.reporter, &settings)
            .process(&groups, publisher)
    }

    /// Bundle every group without publishing anything.
    pub fn collect(&self) -> BundleReport {
        let groups = self.groups();
        let settings = self.config.settings();
        Bundler::new(self.provider, self.minifier, self.reporter, &settings).collect(&groups)
    }
}
