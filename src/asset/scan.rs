//! Asset scanning (reads the filesystem, writes nothing).

use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::config::Location;
use crate::pipeline::PipelineError;

use super::pattern::{glob_base, location_patterns};

/// A matched source file and its path relative to the glob base.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssetMatch {
    pub source: PathBuf,
    pub relative: PathBuf,
}

/// Files under `location`'s asset root matching `suffix`.
///
/// Directories and private files are skipped. Results are sorted and
/// deduplicated, so overlapping alternatives match a file only once. A
/// missing asset root matches nothing.
pub fn scan_location(location: &Location, suffix: &str) -> Result<Vec<AssetMatch>, PipelineError> {
    let base = location.asset_root().join(glob_base(suffix));
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut matches = Vec::new();
    for pattern in location_patterns(location, suffix) {
        let paths = glob::glob_with(&pattern, options)
            .map_err(|source| PipelineError::Pattern { pattern, source })?;

        for entry in paths {
            let path = entry?;
            if !path.is_file() || is_private(&path) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&base) else {
                continue;
            };
            matches.push(AssetMatch {
                relative: relative.to_path_buf(),
                source: path,
            });
        }
    }

    matches.sort();
    matches.dedup();
    Ok(matches)
}

/// Private files (`_partial.less`) are inputs to other files, never outputs.
pub fn is_private(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('_'))
}
