//! Pipeline error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while matching, transforming or writing assets.
///
/// Transform errors keep the underlying tool's message unmodified.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid glob pattern `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {message}", path.display())]
    Transform { path: PathBuf, message: String },
}

impl PipelineError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn transform(path: &Path, message: impl ToString) -> Self {
        Self::Transform {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

impl From<glob::GlobError> for PipelineError {
    fn from(err: glob::GlobError) -> Self {
        let path = err.path().to_path_buf();
        Self::Io {
            path,
            source: err.into(),
        }
    }
}
