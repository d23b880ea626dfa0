//! brand-palette: dominant-color extraction and background segmentation
//! for brand imagery
//!
//! This library provides the pixel-level analysis behind a raster-to-vector
//! asset pipeline: sampling the representative colors of an image,
//! clustering them into a small brand palette, and detecting/removing a
//! uniform background.
//!
//! # Quick Start
//!
//! ```
//! use brand_palette::{cluster_colors, detect_background, sample_pixels, Bitmap, Rgb};
//!
//! let bitmap = Bitmap::solid(8, 8, Rgb::new(200, 30, 30)).unwrap();
//!
//! // Dominant colors of the visible pixels.
//! let samples = sample_pixels(&bitmap, false);
//! let palette = cluster_colors(&samples, 2);
//! assert_eq!(palette.hex()[0], "#C81E1E");
//!
//! // Border sampling reports the flat field as the background.
//! assert_eq!(detect_background(&bitmap), Rgb::new(200, 30, 30));
//! ```
//!
//! # Design
//!
//! - **Reproducibility over optimality.** Clustering runs a fixed number
//!   of k-means iterations with deterministic seeding; the same input
//!   always yields the same palette.
//! - **Degraded, never empty.** An image with no usable pixels (fully
//!   transparent, or all near-white) produces the fixed fallback palette
//!   rather than an error — palette extraction is metadata, and metadata
//!   problems must not fail a conversion.
//! - **Brightness as the one perceptual scalar.** Palettes sort darkest
//!   first by BT.601 luma ([`Rgb::brightness`]); the consuming pipeline
//!   uses the same scalar to decide which traced fills are text-like.
//!
//! No I/O, no logging, no dependencies: callers own decoding, resizing and
//! observability.

pub mod background;
pub mod bitmap;
pub mod cluster;
pub mod color;
pub mod sample;


pub use background::{detect_background, remove_background, BACKGROUND_TOLERANCE};
pub use bitmap::{Bitmap, BitmapError};
pub use cluster::{cluster_colors, Palette, FALLBACK_COLORS, KMEANS_ITERATIONS};
pub use color::{ParseColorError, Rgb};
pub use sample::{sample_pixels, ALPHA_THRESHOLD, NEAR_WHITE_FLOOR};
