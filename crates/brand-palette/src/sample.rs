//! Pixel sampling
//!
//! Extracts the representative pixel population a bitmap contributes to
//! color clustering. Transparent and near-white pixels are filtered out:
//! the former are removed background, the latter are overexposure or paper
//! white, and neither is a brand color.

use crate::bitmap::Bitmap;
use crate::color::Rgb;

/// Minimum alpha for a pixel to count as visible.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Channel floor above which a pixel is treated as background white.
///
/// A pixel is skipped only when *all three* channels exceed this value, so
/// saturated tints like `#FFF100` survive.
pub const NEAR_WHITE_FLOOR: u8 = 240;

/// Fraction of each axis kept when sampling the central region only.
const CENTER_FRACTION: f32 = 0.6;

/// Collect the usable pixels of `bitmap` in row-major order.
///
/// With `center_only`, pixels outside the central 60% of each axis (a 20%
/// margin per side) are skipped, which keeps border artwork and residual
/// background out of the sample. Pixels with alpha below
/// [`ALPHA_THRESHOLD`] or with all channels above [`NEAR_WHITE_FLOOR`] are
/// always skipped.
///
/// The result may be empty (e.g. a fully transparent bitmap); callers must
/// handle that — see [`cluster_colors`](crate::cluster_colors) which falls
/// back to a fixed palette.
///
/// # Example
///
/// ```
/// use brand_palette::{sample_pixels, Bitmap, Rgb};
///
/// let bitmap = Bitmap::solid(4, 4, Rgb::new(200, 30, 30)).unwrap();
/// let samples = sample_pixels(&bitmap, false);
/// assert_eq!(samples.len(), 16);
/// assert!(samples.iter().all(|&p| p == Rgb::new(200, 30, 30)));
/// ```
pub fn sample_pixels(bitmap: &Bitmap, center_only: bool) -> Vec<Rgb> {
    let (width, height) = (bitmap.width(), bitmap.height());

    let (x_min, x_max, y_min, y_max) = if center_only {
        let margin_x = ((width as f32 * (1.0 - CENTER_FRACTION)) / 2.0) as u32;
        let margin_y = ((height as f32 * (1.0 - CENTER_FRACTION)) / 2.0) as u32;
        (margin_x, width - margin_x, margin_y, height - margin_y)
    } else {
        (0, width, 0, height)
    };

    let mut samples = Vec::with_capacity(((x_max - x_min) * (y_max - y_min)) as usize);
    for y in y_min..y_max {
        for x in x_min..x_max {
            if bitmap.alpha(x, y) < ALPHA_THRESHOLD {
                continue;
            }
            let pixel = bitmap.pixel(x, y);
            if pixel.r > NEAR_WHITE_FLOOR && pixel.g > NEAR_WHITE_FLOOR && pixel.b > NEAR_WHITE_FLOOR
            {
                continue;
            }
            samples.push(pixel);
        }
    }
    samples
}
