//! Image pipeline.
//!
//! Development copies images byte-for-byte. Production re-encodes them in
//! the same format and keeps the result only when it is not larger:
//!
//! | Format      | Production                                    |
//! |-------------|-----------------------------------------------|
//! | PNG         | best compression, adaptive filtering          |
//! | JPEG        | re-encode at `build.jpeg_quality`             |
//! | SVG         | usvg re-serialization without indentation     |
//! | GIF, others | copy                                          |

use std::io::Cursor;

use ::image::codecs::jpeg::JpegEncoder;
use ::image::codecs::png::{CompressionType, FilterType, PngEncoder};
use ::image::{DynamicImage, ImageFormat};

use crate::core::BuildContext;

use super::{AssetFile, PipelineError};

/// Compress one image.
pub fn compress(file: AssetFile, ctx: &BuildContext) -> Result<AssetFile, PipelineError> {
    if !ctx.is_production() {
        return Ok(file);
    }

    let optimized = match file.extension().as_str() {
        "png" => Some(encode_png(&file)?),
        "jpg" | "jpeg" => Some(encode_jpeg(&file, ctx.build().jpeg_quality)?),
        "svg" => optimize_svg(&file)?,
        _ => None,
    };

    Ok(match optimized {
        Some(data) if data.len() <= file.contents.len() => file.with_contents(data),
        _ => file,
    })
}

fn decode(file: &AssetFile, format: ImageFormat) -> Result<DynamicImage, PipelineError> {
    ::image::load_from_memory_with_format(&file.contents, format)
        .map_err(|e| PipelineError::transform(&file.source, e))
}

fn encode_png(file: &AssetFile) -> Result<Vec<u8>, PipelineError> {
    let image = decode(file, ImageFormat::Png)?;

    let mut data = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut data, CompressionType::Best, FilterType::Adaptive);
    image
        .write_with_encoder(encoder)
        .map_err(|e| PipelineError::transform(&file.source, e))?;
    Ok(data)
}

fn encode_jpeg(file: &AssetFile, quality: u8) -> Result<Vec<u8>, PipelineError> {
    let image = decode(file, ImageFormat::Jpeg)?;
    // JPEG has no alpha channel
    let image = match image {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    };

    let mut data = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut data, quality);
    image
        .write_with_encoder(encoder)
        .map_err(|e| PipelineError::transform(&file.source, e))?;
    Ok(data.into_inner())
}

/// Re-serialize an SVG through usvg.
///
/// Returns `None` for SVGs with text: usvg drops text nodes when no fonts
/// are loaded.
fn optimize_svg(file: &AssetFile) -> Result<Option<Vec<u8>>, PipelineError> {
    if file.contents.windows(5).any(|w| w == b"<text") {
        return Ok(None);
    }

    let tree = usvg::Tree::from_data(&file.contents, &usvg::Options::default())
        .map_err(|e| PipelineError::transform(&file.source, e))?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };
    Ok(Some(tree.to_string(&write_options).into_bytes()))
}
