//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find a manifest by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`
/// Returns the path to the manifest if found
///
/// # Example
/// ```text
/// /home/user/site/packages/core/   ← start
/// /home/user/site/assetpipe.toml   ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    // Absolute names are taken as-is
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        // Move to parent directory
        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_upward() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("packages/core/assets");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("assetpipe.toml"), "").unwrap();

        let found = find_config_file(&nested, Path::new("assetpipe.toml")).unwrap();
        assert_eq!(found, dir.path().join("assetpipe.toml"));
    }

    #[test]
    fn test_find_config_file_prefers_nearest() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("inner");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("package.json"), "{}").unwrap();
        fs::write(nested.join("package.json"), "{}").unwrap();

        let found = find_config_file(&nested, Path::new("package.json")).unwrap();
        assert_eq!(found, nested.join("package.json"));
    }

    #[test]
    fn test_find_config_file_ignores_directories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("assetpipe.toml")).unwrap();

        let found = find_config_file(dir.path(), Path::new("assetpipe.toml"));
        assert_ne!(found, Some(dir.path().join("assetpipe.toml")));
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let manifest = dir.path().join("custom.toml");
        assert_eq!(find_config_file(Path::new("/"), &manifest), None);

        fs::write(&manifest, "").unwrap();
        assert_eq!(find_config_file(Path::new("/"), &manifest), Some(manifest));
    }
}
