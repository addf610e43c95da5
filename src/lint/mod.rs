//! JavaScript lint task.
//!
//! Parses every script under the packages' asset roots with oxc and reports
//! syntax and semantic errors (redeclarations, invalid `break` targets, ...).
//! Private files are linted too. Nothing is written.

use std::fmt;
use std::path::{Path, PathBuf};

use glob::MatchOptions;
use oxc::allocator::Allocator;
use oxc::parser::Parser;
use oxc::semantic::SemanticBuilder;
use rayon::prelude::*;

use crate::asset::location_patterns;
use crate::core::BuildContext;
use crate::pipeline::{PipelineError, script};

/// Suffix of the scripts to lint.
const LINT_SUFFIX: &str = "/**/*.js";

/// One problem found in a script.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LintDiagnostic {
    pub path: PathBuf,
    /// 1-based
    pub line: usize,
    /// 1-based, in characters
    pub column: usize,
    pub message: String,
}

impl fmt::Display for LintDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.path.display(),
            self.line,
            self.column,
            self.message
        )
    }
}

/// Result of a lint run.
#[derive(Debug, Default)]
pub struct LintReport {
    /// Number of files checked
    pub files: usize,
    /// Sorted by path, then position
    pub diagnostics: Vec<LintDiagnostic>,
}

impl LintReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Lint every `.js` file under the packages' asset roots.
pub fn run(ctx: &BuildContext) -> Result<LintReport, PipelineError> {
    let patterns: Vec<String> = ctx
        .registry()
        .iter()
        .flat_map(|location| location_patterns(location, LINT_SUFFIX))
        .collect();
    let files = collect_scripts(&patterns)?;

    let mut diagnostics = files
        .par_iter()
        .map(|path| -> Result<Vec<LintDiagnostic>, PipelineError> {
            let source = std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
            Ok(lint_source(path, &source))
        })
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();
    diagnostics.sort();

    Ok(LintReport {
        files: files.len(),
        diagnostics,
    })
}

/// Files matching any of `patterns`, sorted and deduplicated.
fn collect_scripts(patterns: &[String]) -> Result<Vec<PathBuf>, PipelineError> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob::glob_with(pattern, options).map_err(|source| PipelineError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        for entry in paths {
            let path = entry?;
            if path.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

/// Lint one script's source.
pub fn lint_source(path: &Path, source: &str) -> Vec<LintDiagnostic> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, source, script::source_type()).parse();

    let errors = if parsed.errors.is_empty() {
        SemanticBuilder::new()
            .with_check_syntax_error(true)
            .build(&parsed.program)
            .errors
    } else {
        parsed.errors
    };

    errors
        .iter()
        .map(|error| {
            let offset = error
                .labels
                .as_ref()
                .and_then(|labels| labels.first())
                .map_or(0, |label| label.offset());
            let (line, column) = line_column(source, offset);
            LintDiagnostic {
                path: path.to_path_buf(),
                line,
                column,
                message: error.to_string(),
            }
        })
        .collect()
}

/// 1-based line and column of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_source() {
        let source = "var a = 1;\nfunction f(b) { return a + b; }\nmodule.exports = f;\n";
        assert!(lint_source(Path::new("ok.js"), source).is_empty());
    }

    #[test]
    fn test_syntax_error_position() {
        let source = "var a = 1;\nvar b = ;\n";
        let diagnostics = lint_source(Path::new("bad.js"), source);

        assert!(!diagnostics.is_empty());
        assert_eq!(diagnostics[0].line, 2);
        assert!(diagnostics[0].to_string().starts_with("bad.js:2:"));
    }

    #[test]
    fn test_semantic_error() {
        let source = "let a = 1;\nlet a = 2;\n";
        let diagnostics = lint_source(Path::new("dup.js"), source);

        assert!(!diagnostics.is_empty());
        assert!(diagnostics[0].message.contains("declared"));
    }

    #[test]
    fn test_line_column() {
        let source = "ab\ncd\né!";
        assert_eq!(line_column(source, 0), (1, 1));
        assert_eq!(line_column(source, 4), (2, 2));
        assert_eq!(line_column(source, 8), (3, 2));
        assert_eq!(line_column(source, 100), (3, 3));
    }

    #[test]
    fn test_run_includes_private_files() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        fs::create_dir_all(a.join("assets/js")).unwrap();
        fs::write(a.join("assets/js/app.js"), "var ok = true;\n").unwrap();
        fs::write(a.join("assets/js/_helper.js"), "var = broken;\n").unwrap();
        fs::write(a.join("assets/js/style.css"), "a{}").unwrap();

        let config = test_config(&[("a", a.as_path())], &dir.path().join("public"));
        let report = run(&BuildContext::new(&config)).unwrap();

        assert_eq!(report.files, 2);
        assert!(!report.is_clean());
        assert!(report.diagnostics.iter().all(|d| d.path.ends_with("_helper.js")));
        assert!(!dir.path().join("public").exists());
    }

    #[test]
    fn test_run_root_with_glob_metacharacters() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("pkg[1]");
        fs::create_dir_all(root.join("assets")).unwrap();
        fs::write(root.join("assets/bad.js"), "var = ;\n").unwrap();

        let config = test_config(&[("one", root.as_path())], &dir.path().join("public"));
        let report = run(&BuildContext::new(&config)).unwrap();

        assert_eq!(report.files, 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_run_empty_registry() {
        let dir = TempDir::new().unwrap();
        let config = test_config(&[], dir.path());
        let report = run(&BuildContext::new(&config)).unwrap();
        assert_eq!(report.files, 0);
        assert!(report.is_clean());
    }
}
