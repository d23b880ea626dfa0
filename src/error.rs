use thiserror::Error;

/// Errors surfaced to the pipeline caller.
///
/// Only conditions that make the output meaningless reach this type:
/// unusable input and tracer failure. Degraded-but-completable conditions
/// (empty color sample, unreachable segmentation service, background-path
/// heuristic finding nothing) are absorbed with safe defaults and logged.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Unsupported input format: {0}")]
    UnsupportedFormat(String),

    #[error("Vectorization failed after {elapsed_ms}ms: {reason}")]
    Vectorization { reason: String, elapsed_ms: u64 },

    #[error("SVG rewrite error: {0}")]
    Svg(#[from] crate::svg::SvgError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
