//! Project configuration: the manifest that registers packages.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   └── packages   # [packages] (location registry)
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # ProjectConfig (this file)
//! ```
//!
//! # Manifests
//!
//! | File             | Registry source           |
//! |------------------|---------------------------|
//! | `assetpipe.toml` | `[packages]` table        |
//! | `package.json`   | `onePackages` object      |
//!
//! `assetpipe.toml` wins when both exist.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{BuildConfig, Location, LocationRegistry};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, debug, log, utils::plural_count};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default manifest name.
pub const MANIFEST_NAME: &str = "assetpipe.toml";

/// Fallback manifest name.
pub const PACKAGE_JSON: &str = "package.json";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration, loaded once per process and immutable afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Absolute path to the manifest (internal use only)
    #[serde(skip)]
    pub manifest_path: PathBuf,

    /// Project root - parent of the manifest (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Registered packages, in manifest order
    pub packages: LocationRegistry,

    /// Build settings
    pub build: BuildConfig,
}

/// The only part of `package.json` we read.
#[derive(Debug, Deserialize)]
struct PackageJson {
    #[serde(rename = "onePackages")]
    one_packages: Option<LocationRegistry>,
}

impl ProjectConfig {
    /// Load configuration for the CLI invocation.
    ///
    /// Uses `--config` when given, otherwise searches upward from cwd for
    /// `assetpipe.toml`, then `package.json`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let manifest = Self::resolve_manifest(&cwd, cli.config.as_deref())?;
        let config = Self::from_manifest(&manifest)?;

        if config.packages.is_empty() {
            log!("warning"; "no packages registered in {}", config.manifest_path.display());
        }
        debug!("config"; "loaded {} from {}",
            plural_count(config.packages.len(), "package"), config.manifest_path.display());
        Ok(config)
    }

    /// Locate the manifest file.
    fn resolve_manifest(cwd: &Path, explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
        if let Some(path) = explicit {
            let path = cwd.join(path);
            return if path.is_file() {
                Ok(path)
            } else {
                Err(ConfigError::NotFound(path))
            };
        }

        find_config_file(cwd, Path::new(MANIFEST_NAME))
            .or_else(|| find_config_file(cwd, Path::new(PACKAGE_JSON)))
            .ok_or_else(|| ConfigError::NotFound(cwd.join(MANIFEST_NAME)))
    }

    /// Read, parse, normalize and validate a manifest.
    pub fn from_manifest(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let is_json = path.extension().is_some_and(|ext| ext == "json");
        let mut config = if is_json {
            Self::from_package_json(&content)?
        } else {
            let (config, ignored) = Self::parse_with_ignored(&content)?;
            if !ignored.is_empty() {
                Self::print_unknown_fields_warning(&ignored, path);
            }
            config
        };

        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.manifest_path = path.to_path_buf();
        config.normalize(&root);
        config.root = root;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Build a configuration from `package.json`'s `onePackages` object.
    ///
    /// Build settings keep their defaults.
    fn from_package_json(content: &str) -> Result<Self, ConfigError> {
        let package: PackageJson = serde_json::from_str(content)?;
        let packages = package.one_packages.ok_or_else(|| {
            ConfigError::Validation("package.json has no `onePackages` object".into())
        })?;

        Ok(Self {
            packages,
            ..Self::default()
        })
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring: {}", display_path, fields.join(", "));
    }

    /// Resolve relative paths against the manifest directory.
    fn normalize(&mut self, root: &Path) {
        self.packages.normalize(root);
        self.build.normalize(root);
    }

    /// Validate the whole configuration, reporting all errors at once.
    fn validate(&mut self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.packages.validate(&mut diag);
        self.build.validate(&mut diag);

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Build a validated configuration for tests.
#[cfg(test)]
pub fn test_config(packages: &[(&str, &Path)], output: &Path) -> ProjectConfig {
    let entries = packages
        .iter()
        .map(|(key, root)| Location::new(*key, *root))
        .collect();
    let mut build = BuildConfig::default();
    build.output = output.to_path_buf();
    let mut config = ProjectConfig {
        packages: LocationRegistry::new(entries),
        build,
        ..ProjectConfig::default()
    };
    config.validate().unwrap();
    config
}

// ============================================================================
// tests
// ============================================================================
