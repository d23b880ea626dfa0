//! Bitmap vectorization via the external tracer.
//!
//! The tracer itself (curve fitting, speckle filtering) is a library
//! capability; this module owns every parameter fed into it and the
//! translation of its failures into [`PipelineError::Vectorization`].
//! Monochrome mode runs a binary threshold trace; multi-color mode runs a
//! stacked posterize keyed to the quantization parameters in
//! [`PosterizeParams`].

use std::time::Instant;

use brand_palette::Bitmap;
use visioncortex::PathSimplifyMode;
use vtracer::{convert, ColorImage, ColorMode, Config, Hierarchical};

use crate::error::PipelineError;
use crate::models::{PosterizeParams, TraceParams};

/// Vectorization front-end with fixed, mode-independent tuning.
pub struct Vectorizer {
    trace_params: TraceParams,
    posterize_params: PosterizeParams,
}

impl Vectorizer {
    /// Create a vectorizer with the default parameter sets.
    pub fn new() -> Self {
        Self {
            trace_params: TraceParams::default(),
            posterize_params: PosterizeParams::default(),
        }
    }

    /// Single-color threshold trace (icon mode).
    pub fn trace_monochrome(&self, bitmap: &Bitmap) -> Result<String, PipelineError> {
        self.run(bitmap, self.config(ColorMode::Binary))
    }

    /// Multi-level posterize trace (logo mode).
    pub fn posterize(&self, bitmap: &Bitmap) -> Result<String, PipelineError> {
        self.run(bitmap, self.config(ColorMode::Color))
    }

    fn config(&self, color_mode: ColorMode) -> Config {
        let t = &self.trace_params;
        let p = &self.posterize_params;
        Config {
            color_mode,
            hierarchical: Hierarchical::Stacked,
            mode: PathSimplifyMode::Spline,
            filter_speckle: t.filter_speckle,
            color_precision: p.color_precision,
            layer_difference: p.layer_difference,
            corner_threshold: t.corner_threshold,
            length_threshold: t.length_threshold,
            max_iterations: t.max_iterations,
            splice_threshold: t.splice_threshold,
            path_precision: Some(t.path_precision),
        }
    }

    fn run(&self, bitmap: &Bitmap, config: Config) -> Result<String, PipelineError> {
        let started = Instant::now();
        let image = color_image(bitmap);
        let (width, height) = (bitmap.width(), bitmap.height());

        match convert(image, config) {
            Ok(svg) if svg.paths.is_empty() => Err(PipelineError::Vectorization {
                reason: "tracer produced no paths".to_string(),
                elapsed_ms: started.elapsed().as_millis() as u64,
            }),
            Ok(svg) => {
                tracing::debug!(
                    width,
                    height,
                    paths = svg.paths.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Vectorized bitmap"
                );
                Ok(svg.to_string())
            }
            Err(reason) => Err(PipelineError::Vectorization {
                reason: reason.to_string(),
                elapsed_ms: started.elapsed().as_millis() as u64,
            }),
        }
    }
}

impl Default for Vectorizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy a bitmap into the tracer's RGBA image type.
fn color_image(bitmap: &Bitmap) -> ColorImage {
    let rgba = bitmap.clone().into_rgba();
    let (width, height) = (rgba.width() as usize, rgba.height() as usize);
    ColorImage {
        pixels: rgba.into_data(),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brand_palette::Rgb;
    use crate::svg::SvgDocument;

    /// 64x64 card: `inner` square centered on an `outer` field.
    fn two_tone(outer: Rgb, inner: Rgb) -> Bitmap {
        let mut data = Vec::with_capacity(64 * 64 * 4);
        for y in 0..64u32 {
            for x in 0..64u32 {
                let inside = (16..48).contains(&x) && (16..48).contains(&y);
                let c = if inside { inner } else { outer };
                data.extend_from_slice(&[c.r, c.g, c.b, 255]);
            }
        }
        Bitmap::from_rgba(64, 64, data).unwrap()
    }

    #[test]
    fn test_monochrome_trace_parses_as_svg() {
        let bitmap = two_tone(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0));
        let svg = Vectorizer::new().trace_monochrome(&bitmap).unwrap();
        let doc = SvgDocument::parse(&svg).unwrap();
        assert!(!doc.drawable_fills().is_empty());
    }

    #[test]
    fn test_posterize_keeps_distinct_colors() {
        let bitmap = two_tone(Rgb::new(255, 255, 255), Rgb::new(200, 20, 20));
        let svg = Vectorizer::new().posterize(&bitmap).unwrap();
        let doc = SvgDocument::parse(&svg).unwrap();
        // At least the background layer and the red square survive.
        assert!(doc.drawable_fills().len() >= 2);
    }

    #[test]
    fn test_transparent_bitmap_fails_with_diagnostics() {
        let mut bitmap = Bitmap::solid(16, 16, Rgb::new(0, 0, 0)).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                bitmap.set_alpha(x, y, 0);
            }
        }
        let result = Vectorizer::new().posterize(&bitmap);
        assert!(matches!(
            result,
            Err(PipelineError::Vectorization { .. })
        ));
    }
}
