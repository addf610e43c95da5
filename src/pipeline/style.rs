//! Stylesheet pipeline using lightningcss.
//!
//! Entry stylesheets (`*.less`) are bundled: relative `@import`s (usually
//! private `_partials`) are inlined. Vendor prefixes and syntax lowering
//! follow the configured browser targets. Production output is minified.
//!
//! Only the CSS-compatible subset of LESS is accepted: imports, custom
//! properties and nesting. LESS variables (`@c: red;`) and mixins are not
//! evaluated.

use lightningcss::bundler::{Bundler, FileProvider};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions};

use crate::core::BuildContext;

use super::{AssetFile, PipelineError};

/// Compile one entry stylesheet to `.css`.
pub fn compile(file: AssetFile, ctx: &BuildContext) -> Result<AssetFile, PipelineError> {
    let css = bundle(&file, ctx)?;
    Ok(file.with_contents(css).with_extension("css"))
}

fn bundle(file: &AssetFile, ctx: &BuildContext) -> Result<String, PipelineError> {
    let fail = |message: String| PipelineError::transform(&file.source, message);

    let fs = FileProvider::new();
    let mut bundler = Bundler::new(&fs, None, ParserOptions::default());
    let mut stylesheet = bundler
        .bundle(&file.source)
        .map_err(|e| fail(e.to_string()))?;

    // Prefixing happens here, so it runs in both modes
    stylesheet
        .minify(MinifyOptions {
            targets: ctx.build().targets(),
            ..MinifyOptions::default()
        })
        .map_err(|e| fail(e.to_string()))?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: ctx.is_production(),
            targets: ctx.build().targets(),
            ..PrinterOptions::default()
        })
        .map_err(|e| fail(e.to_string()))?;
    Ok(result.code)
}
