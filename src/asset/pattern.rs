//! Glob pattern helpers (pure functions).
//!
//! Suffixes use `{a,b}` alternation, which the `glob` crate does not
//! support, so they are expanded into plain patterns before matching.

use std::path::PathBuf;

use glob::Pattern;

use crate::config::{Location, LocationRegistry};

/// One pattern per location: `<root>/assets<suffix>`, in registry order.
pub fn globs(registry: &LocationRegistry, suffix: &str) -> Vec<String> {
    registry
        .iter()
        .map(|location| format!("{}{suffix}", location.asset_prefix()))
        .collect()
}

/// Matchable patterns for one location.
///
/// The root is escaped so `[`, `*` or `{` in a directory name match
/// literally; only the suffix is expanded.
pub fn location_patterns(location: &Location, suffix: &str) -> Vec<String> {
    let prefix = Pattern::escape(&location.asset_prefix());
    expand_braces(suffix)
        .into_iter()
        .map(|expanded| format!("{prefix}{expanded}"))
        .collect()
}

/// Expand `{a,b}` alternation, left to right.
///
/// Groups may nest. A group without a comma, or an unclosed `{`, is kept
/// literally.
///
/// ```ignore
/// expand_braces("/**/*.{less,css}") == ["/**/*.less", "/**/*.css"]
/// ```
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_owned()];
    };

    let mut depth = 0usize;
    let mut close = None;
    let mut commas = Vec::new();
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            ',' if depth == 1 => commas.push(open + i),
            _ => {}
        }
    }

    let Some(close) = close else {
        return vec![pattern.to_owned()];
    };

    let rest = &pattern[close + 1..];
    if commas.is_empty() {
        let literal = &pattern[..=close];
        return expand_braces(rest)
            .into_iter()
            .map(|tail| format!("{literal}{tail}"))
            .collect();
    }

    let head = &pattern[..open];
    let mut bounds = Vec::with_capacity(commas.len() + 2);
    bounds.push(open);
    bounds.extend(commas);
    bounds.push(close);

    bounds
        .windows(2)
        .flat_map(|w| expand_braces(&format!("{head}{}{rest}", &pattern[w[0] + 1..w[1]])))
        .collect()
}

/// Literal leading directories of a suffix, up to the first wildcard.
///
/// Matched files keep their path relative to this base, so `/**/*.css`
/// preserves the whole tree under `assets/` while `/img/*.png` drops `img/`.
pub fn glob_base(suffix: &str) -> PathBuf {
    let components: Vec<&str> = suffix.split('/').filter(|c| !c.is_empty()).collect();
    let Some((_, dirs)) = components.split_last() else {
        return PathBuf::new();
    };

    dirs.iter()
        .take_while(|c| !has_wildcard(c))
        .collect()
}

fn has_wildcard(component: &str) -> bool {
    component.contains(['*', '?', '[', '{'])
}
