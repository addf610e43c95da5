//! Per-file-type transform pipelines.
//!
//! Every pipeline has the same shape: one matched [`AssetFile`] in, one
//! transformed [`AssetFile`] out. The orchestrator in `asset` picks the
//! variant from [`AssetKind`] and knows nothing about file formats.
//!
//! | Kind     | Development            | Production                  |
//! |----------|------------------------|-----------------------------|
//! | `Style`  | bundle + prefix        | bundle + prefix + minify    |
//! | `Script` | syntax check           | syntax check + minify       |
//! | `Markup` | copy                   | collapse whitespace         |
//! | `Image`  | copy                   | re-encode, keep if smaller  |
//! | `Misc`   | copy                   | copy                        |

mod error;
mod markup;
mod media;
pub mod script;
mod style;

pub use error::PipelineError;

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::BuildContext;

// ============================================================================
// AssetKind
// ============================================================================

/// The closed set of pipeline variants, one per asset task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Style,
    Script,
    Markup,
    Image,
    Misc,
}

impl AssetKind {
    /// Order used by `build` and `dist`.
    pub const ALL: [Self; 5] = [
        Self::Markup,
        Self::Script,
        Self::Style,
        Self::Image,
        Self::Misc,
    ];

    /// Glob suffix appended to each package's asset root.
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Style => "/**/*.less",
            Self::Script => "/**/*.js",
            Self::Markup => "/**/*.{ejs,html}",
            Self::Image => "/**/*.{jpg,jpeg,svg,png,gif}",
            Self::Misc => "/**/*.{ico,eot,woff,ttf}",
        }
    }

    /// Task name used in logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Style => "styles",
            Self::Script => "scripts",
            Self::Markup => "markup",
            Self::Image => "images",
            Self::Misc => "misc",
        }
    }

    /// Run this kind's pipeline on one file.
    pub fn transform(self, file: AssetFile, ctx: &BuildContext) -> Result<AssetFile, PipelineError> {
        match self {
            Self::Style => style::compile(file, ctx),
            Self::Script => script::compile(file, ctx),
            Self::Markup => markup::compile(file, ctx),
            Self::Image => media::compress(file, ctx),
            Self::Misc => Ok(file),
        }
    }
}

// ============================================================================
// AssetFile
// ============================================================================

/// One matched file flowing through a pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Source file path (absolute)
    pub source: PathBuf,
    /// Output path relative to the package's output directory
    pub relative: PathBuf,
    /// Current contents
    pub contents: Vec<u8>,
}

impl AssetFile {
    /// Read a matched file from disk.
    pub fn read(source: PathBuf, relative: PathBuf) -> Result<Self, PipelineError> {
        let contents = fs::read(&source).map_err(|e| PipelineError::io(&source, e))?;
        Ok(Self {
            source,
            relative,
            contents,
        })
    }

    /// Contents as UTF-8 text.
    pub fn text(&self) -> Result<&str, PipelineError> {
        std::str::from_utf8(&self.contents)
            .map_err(|e| PipelineError::transform(&self.source, format!("not valid UTF-8: {e}")))
    }

    /// Lowercased source extension.
    pub fn extension(&self) -> String {
        self.source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase()
    }

    /// Replace the contents.
    #[must_use]
    pub fn with_contents(mut self, contents: impl Into<Vec<u8>>) -> Self {
        self.contents = contents.into();
        self
    }

    /// Change the output extension (e.g. `.less` → `.css`).
    #[must_use]
    pub fn with_extension(mut self, ext: &str) -> Self {
        self.relative.set_extension(ext);
        self
    }

    /// Write to `<out_dir>/<relative>`, overwriting any existing file.
    pub fn write_to(&self, out_dir: &Path) -> Result<PathBuf, PipelineError> {
        let output = out_dir.join(&self.relative);
        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        fs::write(&output, &self.contents).map_err(|e| PipelineError::io(&output, e))?;
        Ok(output)
    }
}

#[cfg(test)]
pub(crate) fn test_file(dir: &Path, relative: &str, contents: &[u8]) -> AssetFile {
    let source = dir.join(relative);
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, contents).unwrap();
    AssetFile::read(source, PathBuf::from(relative)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_suffixes_match_task_file_types() {
        assert_eq!(AssetKind::Style.suffix(), "/**/*.less");
        assert_eq!(AssetKind::Script.suffix(), "/**/*.js");
        assert!(AssetKind::ALL.iter().all(|k| k.suffix().starts_with("/**/")));
    }

    #[test]
    fn test_misc_is_pass_through() {
        let dir = TempDir::new().unwrap();
        let config = crate::config::ProjectConfig::default();
        let ctx = BuildContext::new(&config).production();

        let file = test_file(dir.path(), "fonts/a.woff", b"\x00\x01woff");
        let out = AssetKind::Misc.transform(file.clone(), &ctx).unwrap();
        assert_eq!(out, file);
    }

    #[test]
    fn test_with_extension_and_write() {
        let dir = TempDir::new().unwrap();
        let file = test_file(dir.path(), "src/styles/main.less", b"a{}")
            .with_extension("css")
            .with_contents("b{}");

        let out_dir = dir.path().join("out");
        let written = file.write_to(&out_dir).unwrap();
        assert_eq!(written, out_dir.join("src/styles/main.css"));
        assert_eq!(fs::read_to_string(written).unwrap(), "b{}");
    }

    #[test]
    fn test_text_rejects_binary() {
        let dir = TempDir::new().unwrap();
        let file = test_file(dir.path(), "bad.js", &[0xff, 0xfe, 0x00]);
        assert!(matches!(file.text(), Err(PipelineError::Transform { .. })));
    }
}
