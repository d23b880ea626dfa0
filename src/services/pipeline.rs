//! The conversion pipeline: ingest → background removal → color detection
//! → resize → vectorize → post-process → package.
//!
//! Each request runs end-to-end on the calling thread; the only suspension
//! point is the optional remote segmentation call, which carries its own
//! timeout and fallback inside [`BackgroundService`]. Nothing here is
//! shared across requests — every bitmap and palette is request-scoped.

use std::time::Instant;

use brand_palette::{cluster_colors, sample_pixels, Bitmap, Palette, Rgb};
use serde::Serialize;

use crate::error::PipelineError;
use crate::models::{AppConfig, ModeConfig, OutputMode};
use crate::services::background::BackgroundService;
use crate::services::ingest::{self, IngestedAsset};
use crate::services::naming;
use crate::services::vectorizer::Vectorizer;
use crate::svg::{post_process, PostProcessOptions, SvgDocument};

/// One conversion request.
#[derive(Debug, Clone)]
pub struct ProcessRequest<'a> {
    /// Raw upload bytes (raster or SVG).
    pub bytes: &'a [u8],
    /// Original filename, used for component naming.
    pub filename: &'a str,
    /// Requested output mode.
    pub mode: OutputMode,
    /// Whether to segment away the background before tracing.
    pub remove_background: bool,
    /// Optional user-supplied component name.
    pub requested_name: Option<&'a str>,
}

/// The packaged result handed back to the caller, who owns persistence
/// and transport.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    /// Post-processed SVG markup, ready for embedding.
    pub svg: String,
    /// Detected brand palette as uppercase hex, darkest first.
    pub detected_colors: Vec<String>,
    /// Sanitized component name.
    pub component_name: String,
    /// End-to-end processing time in milliseconds.
    pub elapsed_ms: u64,
}

/// Orchestrates one conversion per call. Reusable across requests.
pub struct AssetPipeline {
    config: AppConfig,
    background: BackgroundService,
    vectorizer: Vectorizer,
}

impl AssetPipeline {
    pub fn new(config: AppConfig) -> Self {
        let background = BackgroundService::new(config.remote_removal.clone());
        Self {
            config,
            background,
            vectorizer: Vectorizer::new(),
        }
    }

    /// Run the full pipeline for one request.
    ///
    /// # Errors
    ///
    /// [`PipelineError::UnsupportedFormat`] before any processing when the
    /// input is unusable; [`PipelineError::Vectorization`] when the tracer
    /// fails. Degraded color extraction and unreachable segmentation
    /// services are absorbed internally.
    pub fn process(&self, request: &ProcessRequest<'_>) -> Result<ProcessingResult, PipelineError> {
        let started = Instant::now();
        let mode_config = ModeConfig::for_mode(request.mode);

        let (mut doc, palette) = match ingest::ingest(request.bytes)? {
            IngestedAsset::Raster(bitmap) => self.process_raster(bitmap, request, &mode_config)?,
            IngestedAsset::Vector(markup) => process_vector(&markup, &mode_config)?,
        };

        post_process(
            &mut doc,
            &PostProcessOptions {
                strip_background: request.remove_background,
                recolor: (!mode_config.single_color_fill).then_some(&palette),
                theme_fill: mode_config.single_color_fill,
                view_box: mode_config.view_box,
            },
        );

        let svg = doc.to_svg_string()?;
        let component_name =
            naming::component_name(request.requested_name, request.filename, request.mode);

        let elapsed_ms = started.elapsed().as_millis() as u64;
        if elapsed_ms > self.config.latency_budget_ms {
            tracing::warn!(
                elapsed_ms,
                budget_ms = self.config.latency_budget_ms,
                "Conversion exceeded latency budget"
            );
        }
        tracing::info!(
            mode = %request.mode,
            component = %component_name,
            colors = palette.len(),
            elapsed_ms,
            "Conversion complete"
        );

        Ok(ProcessingResult {
            svg,
            detected_colors: palette.hex(),
            component_name,
            elapsed_ms,
        })
    }

    /// Extract only the dominant colors of an input (the `palette` CLI
    /// surface). SVG inputs report their distinct fills.
    pub fn extract_palette(
        &self,
        bytes: &[u8],
        count: usize,
    ) -> Result<Vec<String>, PipelineError> {
        let palette = match ingest::ingest(bytes)? {
            IngestedAsset::Raster(bitmap) => {
                let thumbnail = ingest::sampling_thumbnail(&bitmap, self.config.sample_resolution)?;
                cluster_colors(&sample_pixels(&thumbnail, false), count)
            }
            IngestedAsset::Vector(markup) => {
                let doc = SvgDocument::parse(&markup)?;
                fill_palette(&doc, count)
            }
        };
        Ok(palette.hex())
    }

    fn process_raster(
        &self,
        bitmap: Bitmap,
        request: &ProcessRequest<'_>,
        mode_config: &ModeConfig,
    ) -> Result<(SvgDocument, Palette), PipelineError> {
        let bitmap = if request.remove_background {
            self.background.remove(bitmap)
        } else {
            bitmap
        };

        // Color detection runs on a bounded-size thumbnail. With the
        // background removed its pixels are transparent and the sampler
        // skips them; otherwise restrict to the central region so border
        // background doesn't skew the clusters.
        let thumbnail = ingest::sampling_thumbnail(&bitmap, self.config.sample_resolution)?;
        let samples = sample_pixels(&thumbnail, !request.remove_background);
        if samples.is_empty() {
            tracing::debug!("no usable pixels sampled, substituting fallback palette");
        }
        let palette = cluster_colors(&samples, mode_config.color_count);

        let traced = ingest::resize_to_max(&bitmap, self.config.trace_resolution)?;
        let svg_text = if mode_config.single_color_fill {
            self.vectorizer.trace_monochrome(&traced)?
        } else {
            self.vectorizer.posterize(&traced)?
        };

        Ok((SvgDocument::parse(&svg_text)?, palette))
    }
}

/// SVG passthrough: no tracing, palette from the document's own fills.
fn process_vector(
    markup: &str,
    mode_config: &ModeConfig,
) -> Result<(SvgDocument, Palette), PipelineError> {
    let doc = SvgDocument::parse(markup)?;
    let palette = fill_palette(&doc, mode_config.color_count);
    tracing::debug!(colors = palette.len(), "Ingested SVG passthrough");
    Ok((doc, palette))
}

/// Build a palette from the distinct hex fills of an SVG document,
/// falling back to the fixed accent palette when it has none.
fn fill_palette(doc: &SvgDocument, count: usize) -> Palette {
    let mut seen = Vec::new();
    for fill in doc.drawable_fills() {
        if let Ok(color) = fill.parse::<Rgb>() {
            if !seen.contains(&color) {
                seen.push(color);
            }
        }
    }
    cluster_colors(&seen, count)
}
