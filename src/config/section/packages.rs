//! `[packages]` section: the location registry.
//!
//! Maps a short key to a package root. The key is both the lookup key and
//! the public output sub-path (`<output>/<key>/...`), so registry order is
//! the document order of the manifest.
//!
//! # Example
//!
//! ```toml
//! [packages]
//! core = "packages/core"     # packages/core/assets → public/assets/core
//! blog = "vendor/blog"       # vendor/blog/assets   → public/assets/blog
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashSet;
use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Name of the asset folder inside every package root.
pub const ASSETS_DIR: &str = "assets";

/// A registered package directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Short identifier, also the output sub-path.
    pub key: String,
    /// Package root (absolute after normalization).
    pub root: PathBuf,
}

impl Location {
    pub fn new(key: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            root: root.into(),
        }
    }

    /// `<root>/assets` as a pattern prefix.
    ///
    /// Built by string concatenation so that globs keep the manifest's
    /// spelling of the root.
    pub fn asset_prefix(&self) -> String {
        let root = self.root.to_string_lossy();
        let root = root.trim_end_matches(['/', '\\']);
        format!("{root}/{ASSETS_DIR}")
    }

    /// `<root>/assets` as a path.
    pub fn asset_root(&self) -> PathBuf {
        self.root.join(ASSETS_DIR)
    }
}

/// Ordered, immutable set of locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationRegistry {
    entries: Vec<Location>,
}

impl LocationRegistry {
    /// Build a registry from ordered entries.
    ///
    /// Duplicate keys are rejected by [`LocationRegistry::validate`]; the
    /// deserializer rejects them while parsing.
    pub fn new(entries: Vec<Location>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Location> {
        self.entries.iter().find(|l| l.key == key)
    }

    /// Resolve relative roots against the manifest directory.
    pub fn normalize(&mut self, root: &Path) {
        for entry in &mut self.entries {
            if entry.root.is_relative() {
                entry.root = root.join(&entry.root);
            }
        }
    }

    /// Check that every key is usable as an output sub-path.
    ///
    /// Roots that don't exist only produce a warning: their globs simply
    /// match nothing.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let mut seen = FxHashSet::default();

        for entry in &self.entries {
            let field = FieldPath::package(&entry.key);

            if let Err(msg) = check_key(&entry.key) {
                diag.error_with_hint(
                    field.clone(),
                    msg,
                    "keys become output directories, use a plain name like `core`",
                );
            }
            if !seen.insert(entry.key.as_str()) {
                diag.error(field.clone(), "duplicate package key");
            }
            if entry.root.as_os_str().is_empty() {
                diag.error(field, "package path is empty");
            } else if !entry.asset_root().is_dir() {
                diag.warn(
                    field,
                    format!("`{}` does not exist, nothing will be built", entry.asset_prefix()),
                );
            }
        }
    }
}

impl<'a> IntoIterator for &'a LocationRegistry {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Reject keys that would escape or nest inside the output root.
fn check_key(key: &str) -> Result<(), String> {
    if key.is_empty() {
        return Err("package key is empty".into());
    }
    if key == "." || key == ".." {
        return Err(format!("package key `{key}` is not a directory name"));
    }
    if key.contains(['/', '\\']) {
        return Err(format!("package key `{key}` contains a path separator"));
    }
    Ok(())
}

// ============================================================================
// Deserialization (order preserving, duplicate aware)
// ============================================================================

impl<'de> Deserialize<'de> for LocationRegistry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RegistryVisitor)
    }
}

struct RegistryVisitor;

impl<'de> Visitor<'de> for RegistryVisitor {
    type Value = LocationRegistry;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a table mapping package keys to package paths")
    }

    fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
        let mut entries: Vec<Location> = Vec::with_capacity(map.size_hint().unwrap_or(0));

        while let Some((key, path)) = map.next_entry::<String, PathBuf>()? {
            if entries.iter().any(|l| l.key == key) {
                return Err(de::Error::custom(format!("duplicate package key `{key}`")));
            }
            entries.push(Location::new(key, path));
        }

        Ok(LocationRegistry::new(entries))
    }
}
