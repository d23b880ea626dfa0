//! Input ingestion: format sniffing, raster decode, resampling.
//!
//! The pipeline accepts common raster formats plus SVG passthrough.
//! Anything else is rejected here, before any work is done — an
//! unsupported upload must fail fast with a user-correctable error rather
//! than after seconds of tracing.

use std::io::Cursor;

use brand_palette::Bitmap;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::PipelineError;

/// Raster formats the pipeline decodes.
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::WebP,
    ImageFormat::Bmp,
];

/// A successfully ingested input.
#[derive(Debug, Clone)]
pub enum IngestedAsset {
    /// Decoded raster, promoted to RGBA.
    Raster(Bitmap),
    /// SVG source, passed through to post-processing without tracing.
    Vector(String),
}

/// Sniff and decode `bytes`.
///
/// SVG detection looks for an `<svg` root after optional BOM, whitespace,
/// XML prolog, doctype and comments. Raster inputs are decoded and
/// promoted to RGBA so downstream alpha rewrites always have a plane to
/// write.
///
/// # Errors
///
/// Returns [`PipelineError::UnsupportedFormat`] for unrecognized or
/// undecodable inputs.
pub fn ingest(bytes: &[u8]) -> Result<IngestedAsset, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::UnsupportedFormat("empty input".to_string()));
    }

    if looks_like_svg(bytes) {
        return Ok(IngestedAsset::Vector(
            String::from_utf8_lossy(bytes).into_owned(),
        ));
    }

    let format = image::guess_format(bytes)
        .map_err(|_| PipelineError::UnsupportedFormat("unrecognized file type".to_string()))?;
    if !SUPPORTED_FORMATS.contains(&format) {
        return Err(PipelineError::UnsupportedFormat(format!("{:?}", format)));
    }

    let decoded = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| PipelineError::UnsupportedFormat(format!("{:?}: {}", format, e)))?;
    let rgba = decoded.to_rgba8();
    tracing::debug!(
        format = ?format,
        width = rgba.width(),
        height = rgba.height(),
        "Decoded raster input"
    );
    Ok(IngestedAsset::Raster(bitmap_from_rgba_image(rgba)?))
}

/// Scale `bitmap` down so its longer side is at most `max_dim`,
/// preserving aspect ratio. Smaller bitmaps are returned unchanged;
/// upscaling would only feed the tracer invented detail.
pub fn resize_to_max(bitmap: &Bitmap, max_dim: u32) -> Result<Bitmap, PipelineError> {
    let longest = bitmap.width().max(bitmap.height());
    if longest <= max_dim {
        return Ok(bitmap.clone());
    }
    let scale = max_dim as f64 / longest as f64;
    let width = ((bitmap.width() as f64 * scale).round() as u32).max(1);
    let height = ((bitmap.height() as f64 * scale).round() as u32).max(1);
    let resized = image::imageops::resize(&to_rgba_image(bitmap)?, width, height, FilterType::Lanczos3);
    bitmap_from_rgba_image(resized)
}

/// Resample `bitmap` to an exact square thumbnail for color sampling.
///
/// The sampler scans every pixel of its input; resampling to a fixed small
/// resolution first bounds that cost regardless of source size.
pub fn sampling_thumbnail(bitmap: &Bitmap, resolution: u32) -> Result<Bitmap, PipelineError> {
    if bitmap.width() == resolution && bitmap.height() == resolution {
        return Ok(bitmap.clone());
    }
    let resized = image::imageops::resize(
        &to_rgba_image(bitmap)?,
        resolution,
        resolution,
        FilterType::Triangle,
    );
    bitmap_from_rgba_image(resized)
}

/// Encode `bitmap` as PNG bytes (for the remote segmentation request).
pub(crate) fn encode_png(bitmap: &Bitmap) -> Result<Vec<u8>, PipelineError> {
    let image = DynamicImage::ImageRgba8(to_rgba_image(bitmap)?);
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| PipelineError::UnsupportedFormat(format!("PNG encode: {}", e)))?;
    Ok(buffer.into_inner())
}

/// Decode arbitrary raster bytes (a remote service response) to RGBA.
pub(crate) fn decode_to_bitmap(bytes: &[u8]) -> Result<Bitmap, PipelineError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|e| PipelineError::UnsupportedFormat(e.to_string()))?;
    bitmap_from_rgba_image(decoded.to_rgba8())
}

fn to_rgba_image(bitmap: &Bitmap) -> Result<RgbaImage, PipelineError> {
    let rgba = bitmap.clone().into_rgba();
    let (width, height) = (rgba.width(), rgba.height());
    RgbaImage::from_raw(width, height, rgba.into_data()).ok_or_else(|| {
        PipelineError::UnsupportedFormat("bitmap buffer/dimension mismatch".to_string())
    })
}

fn bitmap_from_rgba_image(image: RgbaImage) -> Result<Bitmap, PipelineError> {
    let (width, height) = (image.width(), image.height());
    Bitmap::from_rgba(width, height, image.into_raw())
        .map_err(|e| PipelineError::UnsupportedFormat(e.to_string()))
}

/// Whether `bytes` is SVG markup: an `<svg` root after optional BOM,
/// whitespace, XML prolog, doctype and comments.
fn looks_like_svg(bytes: &[u8]) -> bool {
    let text = String::from_utf8_lossy(&bytes[..bytes.len().min(4096)]);
    let mut rest = text.trim_start_matches('\u{feff}').trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("<?") {
            match after.find("?>") {
                Some(end) => rest = after[end + 2..].trim_start(),
                None => return false,
            }
        } else if let Some(after) = rest.strip_prefix("<!--") {
            match after.find("-->") {
                Some(end) => rest = after[end + 3..].trim_start(),
                None => return false,
            }
        } else if let Some(after) = rest.strip_prefix("<!") {
            // DOCTYPE
            match after.find('>') {
                Some(end) => rest = after[end + 1..].trim_start(),
                None => return false,
            }
        } else {
            break;
        }
    }
    rest.starts_with("<svg")
}

#[cfg(test)]
mod tests {
    use super::*;
    use brand_palette::Rgb;

    fn png_bytes(width: u32, height: u32, color: Rgb) -> Vec<u8> {
        let bitmap = Bitmap::solid(width, height, color).unwrap();
        encode_png(&bitmap).unwrap()
    }

    #[test]
    fn test_png_roundtrip() {
        let bytes = png_bytes(8, 6, Rgb::new(10, 200, 30));
        match ingest(&bytes).unwrap() {
            IngestedAsset::Raster(bitmap) => {
                assert_eq!(bitmap.width(), 8);
                assert_eq!(bitmap.height(), 6);
                assert!(bitmap.has_alpha());
                assert_eq!(bitmap.pixel(3, 3), Rgb::new(10, 200, 30));
            }
            IngestedAsset::Vector(_) => panic!("expected raster"),
        }
    }

    #[test]
    fn test_svg_sniffing() {
        let plain = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>";
        assert!(matches!(ingest(plain).unwrap(), IngestedAsset::Vector(_)));

        let with_prolog = b"<?xml version=\"1.0\"?>\n<!-- exported -->\n<svg/>";
        assert!(matches!(
            ingest(with_prolog).unwrap(),
            IngestedAsset::Vector(_)
        ));

        let with_doctype =
            b"<?xml version=\"1.0\"?><!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"x\"><svg/>";
        assert!(matches!(
            ingest(with_doctype).unwrap(),
            IngestedAsset::Vector(_)
        ));
    }

    #[test]
    fn test_html_is_not_svg() {
        let html = b"<!DOCTYPE html><html><body>hi</body></html>";
        assert!(matches!(
            ingest(html),
            Err(PipelineError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_unrecognized_bytes_rejected() {
        assert!(matches!(
            ingest(b"definitely not an image"),
            Err(PipelineError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ingest(b""),
            Err(PipelineError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_truncated_png_rejected() {
        let mut bytes = png_bytes(8, 8, Rgb::new(0, 0, 0));
        bytes.truncate(20);
        assert!(matches!(
            ingest(&bytes),
            Err(PipelineError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_resize_to_max_preserves_aspect() {
        let bitmap = Bitmap::solid(400, 200, Rgb::new(1, 2, 3)).unwrap();
        let resized = resize_to_max(&bitmap, 100).unwrap();
        assert_eq!(resized.width(), 100);
        assert_eq!(resized.height(), 50);
    }

    #[test]
    fn test_resize_to_max_never_upscales() {
        let bitmap = Bitmap::solid(40, 20, Rgb::new(1, 2, 3)).unwrap();
        let resized = resize_to_max(&bitmap, 100).unwrap();
        assert_eq!(resized.width(), 40);
        assert_eq!(resized.height(), 20);
    }

    #[test]
    fn test_sampling_thumbnail_exact_square() {
        let bitmap = Bitmap::solid(321, 97, Rgb::new(1, 2, 3)).unwrap();
        let thumb = sampling_thumbnail(&bitmap, 100).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (100, 100));
    }
}
