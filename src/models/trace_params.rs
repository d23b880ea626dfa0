//! Strongly-typed tracer parameter sets.
//!
//! The tracer library takes a flat configuration struct; these types pin
//! down which of its knobs this pipeline actually tunes and what the fixed
//! defaults are, so every trace runs with the same noise-suppression
//! settings regardless of which mode requested it.

/// Curve-fitting parameters shared by both vectorization modes.
///
/// Defaults are tuned for logo-scale artwork: speckles under 4px are
/// dropped, corners sharper than 60 degrees are kept as corners, and path
/// coordinates are emitted with 3 decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceParams {
    /// Discard traced blobs smaller than this many pixels.
    pub filter_speckle: usize,
    /// Angle (degrees) below which a joint is smoothed instead of kept as
    /// a corner.
    pub corner_threshold: i32,
    /// Minimum segment length (pixels) during path simplification.
    pub length_threshold: f64,
    /// Angle (degrees) controlling where curves may be spliced.
    pub splice_threshold: i32,
    /// Curve-fit refinement iterations.
    pub max_iterations: usize,
    /// Decimal places in emitted path coordinates.
    pub path_precision: u32,
}

impl Default for TraceParams {
    fn default() -> Self {
        Self {
            filter_speckle: 4,
            corner_threshold: 60,
            length_threshold: 4.0,
            splice_threshold: 45,
            max_iterations: 10,
            path_precision: 3,
        }
    }
}

/// Additional parameters for multi-level posterized tracing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosterizeParams {
    /// Curve-fitting parameters, shared with monochrome tracing.
    pub trace: TraceParams,
    /// Significant bits kept per channel during color quantization.
    pub color_precision: i32,
    /// Minimum channel gap between stacked posterize layers.
    pub layer_difference: i32,
}

impl Default for PosterizeParams {
    fn default() -> Self {
        Self {
            trace: TraceParams::default(),
            color_precision: 6,
            layer_difference: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_fixed() {
        let params = TraceParams::default();
        assert_eq!(params.filter_speckle, 4);
        assert_eq!(params.corner_threshold, 60);
        assert_eq!(params.length_threshold, 4.0);
        assert_eq!(params.splice_threshold, 45);
        assert_eq!(params.max_iterations, 10);
        assert_eq!(params.path_precision, 3);
    }

    #[test]
    fn test_posterize_shares_trace_defaults() {
        let params = PosterizeParams::default();
        assert_eq!(params.trace, TraceParams::default());
        assert_eq!(params.color_precision, 6);
        assert_eq!(params.layer_difference, 16);
    }
}
