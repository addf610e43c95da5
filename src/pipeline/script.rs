//! Script pipeline using oxc.
//!
//! Every script is parsed so syntax errors fail the task. In production the
//! script is compressed, mangled and stripped of comments. Files already
//! named `*.min.js` are passed through untouched.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::core::BuildContext;

use super::{AssetFile, PipelineError};

/// Source type for package scripts (CommonJS, as they were written for a bundler).
pub fn source_type() -> SourceType {
    SourceType::cjs()
}

/// Compile one script.
pub fn compile(file: AssetFile, ctx: &BuildContext) -> Result<AssetFile, PipelineError> {
    let source = file.text()?;

    if !ctx.is_production() || is_minified(&file) {
        check_syntax(source).map_err(|message| PipelineError::transform(&file.source, message))?;
        return Ok(file);
    }

    let minified =
        minify_js(source).map_err(|message| PipelineError::transform(&file.source, message))?;
    Ok(file.with_contents(minified))
}

/// Check whether the source stem ends with `.min`.
fn is_minified(file: &AssetFile) -> bool {
    file.source
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(".min"))
}

/// Parse only, reporting the first syntax error.
fn check_syntax(source: &str) -> Result<(), String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type()).parse();
    match ret.errors.first() {
        Some(error) => Err(error.to_string()),
        None => Ok(()),
    }
}

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Result<String, String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type()).parse();
    if let Some(error) = ret.errors.first() {
        return Err(error.to_string());
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}
