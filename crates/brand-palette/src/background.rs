//! Background detection and removal
//!
//! The heuristic assumes product imagery: the background is whatever color
//! dominates the image border. Six fixed positions (four corners plus the
//! top and bottom edge centers) are sampled, quantized into coarse buckets,
//! and the most frequent bucket wins. Removal then clears the alpha of
//! every pixel within a per-channel tolerance of that color.

use crate::bitmap::Bitmap;
use crate::color::Rgb;

/// Maximum per-channel difference still considered background.
pub const BACKGROUND_TOLERANCE: u8 = 30;

/// Channel quantization step for border-sample bucketing.
///
/// Coarse on purpose: JPEG artifacts and gradients spread a visually
/// uniform background over nearby channel values, and a 10-step bucket
/// re-merges them.
const QUANTIZE_STEP: u16 = 10;

/// Detect the background color of `bitmap`.
///
/// Samples the four corners plus the top-center and bottom-center pixels,
/// quantizes each sample's channels to the nearest multiple of 10, and
/// returns the **original** (unquantized) color of the most frequent
/// bucket. Ties resolve to the earliest-seen bucket in sample order.
///
/// # Example
///
/// ```
/// use brand_palette::{detect_background, Bitmap, Rgb};
///
/// let bitmap = Bitmap::solid(8, 8, Rgb::new(247, 250, 245)).unwrap();
/// assert_eq!(detect_background(&bitmap), Rgb::new(247, 250, 245));
/// ```
pub fn detect_background(bitmap: &Bitmap) -> Rgb {
    let (w, h) = (bitmap.width(), bitmap.height());
    let positions = [
        (0, 0),
        (w - 1, 0),
        (0, h - 1),
        (w - 1, h - 1),
        (w / 2, 0),
        (w / 2, h - 1),
    ];

    // Insertion-ordered buckets so the first-seen bucket wins ties.
    let mut buckets: Vec<((u16, u16, u16), usize, Rgb)> = Vec::with_capacity(positions.len());
    for (x, y) in positions {
        let color = bitmap.pixel(x, y);
        let key = color.quantize(QUANTIZE_STEP);
        match buckets.iter_mut().find(|(k, _, _)| *k == key) {
            Some((_, count, _)) => *count += 1,
            None => buckets.push((key, 1, color)),
        }
    }

    // Strictly-greater comparison: the first-seen bucket wins ties.
    let mut best: Option<(usize, Rgb)> = None;
    for &(_, count, color) in &buckets {
        if best.map_or(true, |(best_count, _)| count > best_count) {
            best = Some((count, color));
        }
    }
    best.map(|(_, color)| color).unwrap_or(Rgb::new(255, 255, 255))
}

/// Clear the alpha of every pixel matching `background` within `tolerance`.
///
/// A pixel matches when all three channel differences are at most
/// `tolerance`; matching pixels get alpha 0, everything else is left
/// untouched — a hard cutoff with no feathering. Re-applying with the same
/// arguments changes nothing.
///
/// Returns the number of pixels cleared. On a bitmap without an alpha
/// plane this is a no-op returning 0; callers promote with
/// [`Bitmap::into_rgba`] first.
///
/// # Example
///
/// ```
/// use brand_palette::{remove_background, Bitmap, Rgb, BACKGROUND_TOLERANCE};
///
/// let mut bitmap = Bitmap::solid(2, 2, Rgb::new(250, 250, 250)).unwrap();
/// let cleared = remove_background(&mut bitmap, Rgb::new(255, 255, 255), BACKGROUND_TOLERANCE);
/// assert_eq!(cleared, 4);
/// assert_eq!(bitmap.alpha(0, 0), 0);
/// ```
pub fn remove_background(bitmap: &mut Bitmap, background: Rgb, tolerance: u8) -> usize {
    if !bitmap.has_alpha() {
        return 0;
    }

    let within = |a: u8, b: u8| (a as i16 - b as i16).unsigned_abs() <= tolerance as u16;
    let mut cleared = 0;
    for y in 0..bitmap.height() {
        for x in 0..bitmap.width() {
            let p = bitmap.pixel(x, y);
            if within(p.r, background.r) && within(p.g, background.g) && within(p.b, background.b) {
                if bitmap.alpha(x, y) != 0 {
                    cleared += 1;
                }
                bitmap.set_alpha(x, y, 0);
            }
        }
    }
    cleared
}
