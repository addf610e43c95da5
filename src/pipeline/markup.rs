//! Markup pipeline for HTML and EJS templates.
//!
//! Production collapses whitespace. Raw-text elements (`pre`, `textarea`,
//! `script`, `style`) and EJS tags (`<% ... %>`) are kept verbatim.
//! Only ASCII whitespace is collapsed; `&nbsp;` written as U+00A0 survives.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::BuildContext;

use super::{AssetFile, PipelineError};

/// Regions copied byte-for-byte.
static RE_VERBATIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<%.*?%>|<pre\b.*?</pre\s*>|<textarea\b.*?</textarea\s*>|<script\b.*?</script\s*>|<style\b.*?</style\s*>",
    )
    .unwrap()
});

/// Whitespace between two tags that spans a line break.
static RE_TAG_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">[ \t\n\r\x0C]*\n[ \t\n\r\x0C]*<").unwrap());

static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\n\r\x0C]+").unwrap());

/// Compile one template.
pub fn compile(file: AssetFile, ctx: &BuildContext) -> Result<AssetFile, PipelineError> {
    if !ctx.is_production() {
        return Ok(file);
    }
    let collapsed = collapse_whitespace(file.text()?);
    Ok(file.with_contents(collapsed))
}

/// Collapse whitespace outside verbatim regions.
pub fn collapse_whitespace(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;

    for m in RE_VERBATIM.find_iter(html) {
        out.push_str(&collapse_text(&html[last..m.start()], last > 0, true));
        out.push_str(m.as_str());
        last = m.end();
    }
    out.push_str(&collapse_text(&html[last..], last > 0, false));

    out.trim_matches(|c: char| c.is_ascii_whitespace()).to_string()
}

/// Collapse one text run.
///
/// `after_tag`/`before_tag` say whether a verbatim region (always starting
/// with `<` and ending with `>`) borders this run, so gaps next to it are
/// treated like gaps between tags.
fn collapse_text(text: &str, after_tag: bool, before_tag: bool) -> String {
    let mut padded = String::with_capacity(text.len() + 2);
    if after_tag {
        padded.push('>');
    }
    padded.push_str(text);
    if before_tag {
        padded.push('<');
    }

    let gaps_removed = RE_TAG_GAP.replace_all(&padded, "><");
    let collapsed = RE_SPACES.replace_all(&gaps_removed, " ");

    // Padding is ASCII and never removed by the replacements above
    let start = usize::from(after_tag);
    let end = collapsed.len() - usize::from(before_tag);
    collapsed[start..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::pipeline::test_file;
    use tempfile::TempDir;

    #[test]
    fn test_collapse_between_tags() {
        let html = "<ul>\n    <li>One   two</li>\n    <li>Three</li>\n</ul>\n";
        assert_eq!(
            collapse_whitespace(html),
            "<ul><li>One two</li><li>Three</li></ul>"
        );
    }

    #[test]
    fn test_inline_spaces_survive_as_single_space() {
        let html = "<p>Hello   <b>world</b> !</p>";
        assert_eq!(collapse_whitespace(html), "<p>Hello <b>world</b> !</p>");
    }

    #[test]
    fn test_pre_and_script_are_verbatim() {
        let html = "<div>\n  <pre>  keep\n   this </pre>\n  <script>\n  var a  = 1;\n</script>\n</div>";
        assert_eq!(
            collapse_whitespace(html),
            "<div><pre>  keep\n   this </pre><script>\n  var a  = 1;\n</script></div>"
        );
    }

    #[test]
    fn test_ejs_tags_are_verbatim() {
        let html = "<ul>\n  <% items.forEach(function (item) {   %>\n    <li><%= item %></li>\n  <% }) %>\n</ul>";
        assert_eq!(
            collapse_whitespace(html),
            "<ul><% items.forEach(function (item) {   %><li><%= item %></li><% }) %></ul>"
        );
    }

    #[test]
    fn test_uppercase_raw_text_elements() {
        let html = "<PRE>\n  a   b\n</PRE>\n<Script>  x  </Script>";
        assert_eq!(collapse_whitespace(html), "<PRE>\n  a   b\n</PRE><Script>  x  </Script>");
    }

    #[test]
    fn test_non_breaking_space_is_kept() {
        assert_eq!(collapse_whitespace("<p>10\u{a0}km</p>"), "<p>10\u{a0}km</p>");
        assert_eq!(collapse_whitespace("\u{a0}<p>x</p>\n"), "\u{a0}<p>x</p>");
    }

    #[test]
    fn test_development_is_pass_through() {
        let dir = TempDir::new().unwrap();
        let source = "<div>\n  <p>hi</p>\n</div>\n";
        let file = test_file(dir.path(), "views/index.ejs", source.as_bytes());

        let config = ProjectConfig::default();
        let dev = compile(file.clone(), &BuildContext::new(&config)).unwrap();
        assert_eq!(dev.contents, source.as_bytes());

        let prod = compile(file, &BuildContext::new(&config).production()).unwrap();
        assert_eq!(prod.contents, b"<div><p>hi</p></div>");
        assert_eq!(prod.relative, std::path::PathBuf::from("views/index.ejs"));
    }
}
