//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! output = "public/assets"         # Output root (relative to manifest dir)
//! browsers = ["last 3 versions"]   # Browserslist queries for CSS prefixing
//! jpeg_quality = 80                # JPEG re-encode quality in production
//! ```

use std::path::{Path, PathBuf};

use lightningcss::targets::{Browsers, Targets};
use serde::Deserialize;

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Output root; each package writes to `<output>/<key>`.
    pub output: PathBuf,

    /// Browserslist queries used for vendor prefixes and syntax lowering.
    pub browsers: Vec<String>,

    /// JPEG quality (1-100) used when compressing images in production.
    pub jpeg_quality: u8,

    /// Resolved `browsers` (internal use only).
    #[serde(skip)]
    resolved_browsers: Option<Browsers>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "public/assets".into(),
            browsers: vec!["last 3 versions".into()],
            jpeg_quality: 80,
            resolved_browsers: None,
        }
    }
}

impl BuildConfig {
    const OUTPUT: FieldPath = FieldPath::new("build.output");
    const BROWSERS: FieldPath = FieldPath::new("build.browsers");
    const JPEG_QUALITY: FieldPath = FieldPath::new("build.jpeg_quality");

    /// Normalize paths relative to the manifest directory.
    pub fn normalize(&mut self, root: &Path) {
        if self.output.is_relative() {
            self.output = root.join(&self.output);
        }
    }

    /// Validate settings and resolve browser targets.
    pub fn validate(&mut self, diag: &mut ConfigDiagnostics) {
        if self.output.as_os_str().is_empty() {
            diag.error(Self::OUTPUT, "output directory is empty");
        }

        if !(1..=100).contains(&self.jpeg_quality) {
            diag.error_with_hint(
                Self::JPEG_QUALITY,
                format!("quality {} is out of range", self.jpeg_quality),
                "use a value between 1 and 100",
            );
        }

        match Browsers::from_browserslist(&self.browsers) {
            Ok(browsers) => self.resolved_browsers = browsers,
            Err(e) => diag.error_with_hint(
                Self::BROWSERS,
                format!("invalid browserslist query: {e}"),
                "see https://browsersl.ist for the query syntax",
            ),
        }
    }

    /// Compilation targets for the style pipeline.
    pub fn targets(&self) -> Targets {
        self.resolved_browsers.map(Targets::from).unwrap_or_default()
    }

    /// Output directory of one package.
    pub fn package_output(&self, key: &str) -> PathBuf {
        self.output.join(key)
    }
}
