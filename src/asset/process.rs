//! Running a task over the registry (side effects: writes output).

use std::path::PathBuf;

use rayon::prelude::*;

use crate::core::BuildContext;
use crate::logger::ProgressLine;
use crate::pipeline::{AssetFile, AssetKind, PipelineError};

use super::scan::scan_location;

/// Output of one task run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub kind: AssetKind,
    /// One entry per location, in registry order.
    pub locations: Vec<LocationReport>,
}

/// Files written for one location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationReport {
    pub key: String,
    pub written: Vec<PathBuf>,
}

impl TaskReport {
    /// Total number of files written.
    pub fn total(&self) -> usize {
        self.locations.iter().map(|l| l.written.len()).sum()
    }
}

/// Run `kind`'s pipeline over every location.
///
/// Locations are processed one after another in registry order; files
/// within a location are transformed in parallel. The first error aborts
/// the task, leaving files already written in place.
pub fn iterate(kind: AssetKind, ctx: &BuildContext) -> Result<TaskReport, PipelineError> {
    let scanned = ctx
        .registry()
        .iter()
        .map(|location| -> Result<_, PipelineError> {
            Ok((location, scan_location(location, kind.suffix())?))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let counts: Vec<_> = scanned
        .iter()
        .map(|(location, matches)| (location.key.as_str(), matches.len()))
        .collect();
    let progress = ProgressLine::new(kind.name(), &counts);

    let mut locations = Vec::with_capacity(scanned.len());
    for (location, matches) in &scanned {
        let out_dir = ctx.build().package_output(&location.key);

        let written = matches
            .par_iter()
            .map(|m| -> Result<PathBuf, PipelineError> {
                let file = AssetFile::read(m.source.clone(), m.relative.clone())?;
                let output = kind.transform(file, ctx)?.write_to(&out_dir)?;
                progress.inc(&location.key);
                Ok(output)
            })
            .collect::<Result<Vec<_>, _>>()?;

        locations.push(LocationReport {
            key: location.key.clone(),
            written,
        });
    }

    progress.finish();
    Ok(TaskReport { kind, locations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    /// All files under `dir`, relative, sorted.
    fn tree(dir: &Path) -> Vec<String> {
        fn walk(dir: &Path, base: &Path, out: &mut Vec<String>) {
            let Ok(entries) = fs::read_dir(dir) else {
                return;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if path.is_dir() {
                    walk(&path, base, out);
                } else {
                    let rel = path.strip_prefix(base).unwrap();
                    out.push(rel.to_string_lossy().replace('\\', "/"));
                }
            }
        }
        let mut out = Vec::new();
        walk(dir, dir, &mut out);
        out.sort();
        out
    }

    #[test]
    fn test_styles_write_entry_only() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("pkgs/a");
        touch(&a, "assets/styles/main.less", "@import \"_vars.less\";\nbody { color: var(--c); }\n");
        touch(&a, "assets/styles/_vars.less", ":root { --c: red; }\n");
        let out = dir.path().join("public");

        let config = test_config(&[("a", a.as_path())], &out);
        let report = iterate(AssetKind::Style, &BuildContext::new(&config)).unwrap();

        assert_eq!(tree(&out), ["a/styles/main.css"]);
        assert_eq!(report.total(), 1);
        assert_eq!(report.locations[0].key, "a");
        let css = fs::read_to_string(out.join("a/styles/main.css")).unwrap();
        assert!(css.contains("red"));
    }

    #[test]
    fn test_plain_css_is_not_a_style_entry() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        touch(&a, "assets/site.less", "body { color: red; }\n");
        touch(&a, "assets/site.css", "body { color: blue; }\n");
        let out = dir.path().join("public");

        let config = test_config(&[("a", a.as_path())], &out);
        let report = iterate(AssetKind::Style, &BuildContext::new(&config)).unwrap();

        assert_eq!(report.total(), 1);
        assert_eq!(tree(&out), ["a/site.css"]);
        let css = fs::read_to_string(out.join("a/site.css")).unwrap();
        assert!(css.contains("red"));
    }

    #[test]
    fn test_private_files_never_written() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        touch(&a, "assets/_hidden.js", "var x = 1;");
        touch(&a, "assets/_page.html", "<p>x</p>");
        touch(&a, "assets/_icon.svg", "<svg xmlns=\"http://www.w3.org/2000/svg\"/>");
        touch(&a, "assets/_font.woff", "woff");
        touch(&a, "assets/_base.css", "a{}");
        touch(&a, "assets/font.woff", "woff");
        let out = dir.path().join("public");

        let config = test_config(&[("a", a.as_path())], &out);
        let ctx = BuildContext::new(&config);
        for kind in AssetKind::ALL {
            iterate(kind, &ctx).unwrap();
        }
        assert_eq!(tree(&out), ["a/font.woff"]);
    }

    #[test]
    fn test_locations_write_to_own_key() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("nested/b");
        touch(&a, "assets/js/app.js", "var a = 1;\n");
        touch(&b, "assets/app.js", "var b = 2;\n");
        let out = dir.path().join("public");

        let config = test_config(&[("b", b.as_path()), ("a", a.as_path())], &out);
        let report = iterate(AssetKind::Script, &BuildContext::new(&config)).unwrap();

        assert_eq!(tree(&out), ["a/js/app.js", "b/app.js"]);
        let keys: Vec<_> = report.locations.iter().map(|l| l.key.as_str()).collect();
        assert_eq!(keys, ["b", "a"]);
        assert_eq!(fs::read_to_string(out.join("b/app.js")).unwrap(), "var b = 2;\n");
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        touch(&a, "assets/index.html", "<div>\n  <p>hi</p>\n</div>\n");
        let out = dir.path().join("public");

        let config = test_config(&[("a", a.as_path())], &out);
        let ctx = BuildContext::new(&config).production();

        iterate(AssetKind::Markup, &ctx).unwrap();
        let first = fs::read(out.join("a/index.html")).unwrap();
        iterate(AssetKind::Markup, &ctx).unwrap();
        let second = fs::read(out.join("a/index.html")).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, b"<div><p>hi</p></div>");
    }

    #[test]
    fn test_stale_outputs_are_kept() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        touch(&a, "assets/new.ttf", "ttf");
        let out = dir.path().join("public");
        touch(&out, "a/old.ttf", "stale");

        let config = test_config(&[("a", a.as_path())], &out);
        iterate(AssetKind::Misc, &BuildContext::new(&config)).unwrap();
        assert_eq!(tree(&out), ["a/new.ttf", "a/old.ttf"]);
    }

    #[test]
    fn test_empty_registry_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("public");

        let config = test_config(&[], &out);
        let ctx = BuildContext::new(&config).production();
        for kind in AssetKind::ALL {
            let report = iterate(kind, &ctx).unwrap();
            assert_eq!(report.total(), 0);
            assert!(report.locations.is_empty());
        }
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_root_is_empty_result() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("public");
        let ghost = dir.path().join("ghost");

        let config = test_config(&[("ghost", ghost.as_path())], &out);
        let report = iterate(AssetKind::Image, &BuildContext::new(&config)).unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(report.locations.len(), 1);
    }

    #[test]
    fn test_transform_error_fails_task() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        touch(&a, "assets/broken.js", "var = ;");
        let out = dir.path().join("public");

        let config = test_config(&[("a", a.as_path())], &out);
        let err = iterate(AssetKind::Script, &BuildContext::new(&config)).unwrap_err();
        match err {
            PipelineError::Transform { path, .. } => assert!(path.ends_with("broken.js")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
