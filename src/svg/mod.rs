//! Structured SVG parsing and post-vectorization rewriting.

pub mod attrs;
pub mod document;
pub mod postprocess;

pub use document::{SvgDocument, SvgElement, SvgError, SvgNode, ViewBox, DRAWABLE_TAGS};
pub use postprocess::{post_process, PostProcessOptions};
