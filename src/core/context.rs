//! Build context threaded through every pipeline.

use std::path::Path;

use crate::config::{BuildConfig, LocationRegistry, ProjectConfig};

use super::BuildMode;

/// Everything a task needs: the registry, build settings and the mode.
///
/// A context starts in development mode. [`BuildContext::production`] is the
/// only transition and consumes the development context, so a task can never
/// observe the mode flip back.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    config: &'a ProjectConfig,
    mode: BuildMode,
}

impl<'a> BuildContext<'a> {
    /// Create a development-mode context.
    pub const fn new(config: &'a ProjectConfig) -> Self {
        Self {
            config,
            mode: BuildMode::Development,
        }
    }

    /// Switch to production mode.
    #[must_use]
    pub const fn production(self) -> Self {
        Self {
            config: self.config,
            mode: BuildMode::Production,
        }
    }

    #[inline]
    pub const fn mode(&self) -> BuildMode {
        self.mode
    }

    #[inline]
    pub const fn is_production(&self) -> bool {
        self.mode.is_production()
    }

    #[inline]
    pub const fn registry(&self) -> &'a LocationRegistry {
        &self.config.packages
    }

    #[inline]
    pub const fn build(&self) -> &'a BuildConfig {
        &self.config.build
    }

    /// Project root (directory of the manifest).
    #[inline]
    pub fn root(&self) -> &'a Path {
        &self.config.root
    }
}
