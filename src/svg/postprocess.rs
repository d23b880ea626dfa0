//! Post-vectorization SVG rewriting.
//!
//! Three concerns, applied in order: dropping the spurious full-canvas
//! background path the tracer produces for flat-background sources,
//! remapping traced fills onto the detected brand palette (or a
//! theme-inherited token), and normalizing the document for embedding
//! (viewBox policy, no fixed dimensions, camelCase presentation
//! attributes).

use brand_palette::{Palette, Rgb};

use crate::models::ViewBoxPolicy;
use crate::svg::attrs::rename_attrs;
use crate::svg::document::{SvgDocument, SvgElement, SvgNode, ViewBox};

/// Fills brighter than this are treated as text/high-contrast detail and
/// never recolored.
pub const PRESERVE_BRIGHT_ABOVE: f32 = 200.0;

/// Fills darker than this are treated as text/high-contrast detail and
/// never recolored.
pub const PRESERVE_DARK_BELOW: f32 = 30.0;

/// Options for one post-processing pass.
#[derive(Debug)]
pub struct PostProcessOptions<'a> {
    /// Drop the traced full-canvas background path. Only enabled when the
    /// caller actually removed the background, so untouched sources keep
    /// legitimate full-bleed artwork.
    pub strip_background: bool,
    /// Remap mid-brightness fills onto this palette. `None` in
    /// single-color mode.
    pub recolor: Option<&'a Palette>,
    /// Force `currentColor` fills (single-color icon mode).
    pub theme_fill: bool,
    /// ViewBox normalization policy.
    pub view_box: ViewBoxPolicy,
}

/// Run the full post-processing pass over `doc`.
pub fn post_process(doc: &mut SvgDocument, options: &PostProcessOptions<'_>) {
    if options.strip_background {
        let removed = remove_background_path(doc);
        if !removed {
            tracing::debug!("background path heuristic matched nothing, document left intact");
        }
    }

    if let Some(palette) = options.recolor {
        reassign_fills(doc, palette);
    }
    if options.theme_fill {
        force_theme_fill(doc);
    }

    normalize_view_box(doc, options.view_box);
    normalize_for_embedding(doc);
}

/// Remove the first top-level path that traces the canvas background.
///
/// A path qualifies when its `d` starts at the origin **and** its numeric
/// content contains both the viewBox width and height (give or take one
/// unit — tracers frequently emit 639.5 or 641 for a 640 canvas). At most
/// one path is removed per document; when nothing qualifies, the document
/// is left untouched rather than guessing.
///
/// Returns whether a path was removed.
pub fn remove_background_path(doc: &mut SvgDocument) -> bool {
    let bounds = match document_bounds(doc) {
        Some(b) => b,
        None => return false,
    };

    let index = doc.root.children.iter().position(|child| {
        let SvgNode::Element(e) = child else {
            return false;
        };
        e.tag == "path"
            && e.attr("d").is_some_and(|d| {
                starts_at_origin(d) && contains_near(d, bounds.0) && contains_near(d, bounds.1)
            })
    });

    match index {
        Some(i) => {
            doc.root.children.remove(i);
            true
        }
        None => false,
    }
}

/// Remap drawable fills onto the brand palette.
///
/// Strategy: brightness-bucket remap. Each fill's perceived brightness is
/// bucketed into `floor(brightness / 255 * palette_len)`, so the trace's
/// relative light/dark ordering maps onto the palette's darkest-first
/// order. (The alternative round-robin-by-traversal-order assignment was
/// rejected: it scrambles light/dark structure on multi-shape documents.)
///
/// Near-white and near-black fills are preserved as likely text or
/// high-contrast detail, and non-hex paint values (`none`, `currentColor`,
/// `url(#...)`) are never touched.
pub fn reassign_fills(doc: &mut SvgDocument, palette: &Palette) {
    doc.for_each_drawable(|element| {
        let Some(fill) = element.attr("fill") else {
            return;
        };
        let Ok(color) = fill.parse::<Rgb>() else {
            return;
        };
        let brightness = color.brightness();
        if brightness > PRESERVE_BRIGHT_ABOVE || brightness < PRESERVE_DARK_BELOW {
            return;
        }
        let replacement = palette.color_for_brightness(brightness).to_hex();
        element.set_attr("fill", replacement);
    });
}

/// Force every drawable to inherit its color from the host theme.
pub fn force_theme_fill(doc: &mut SvgDocument) {
    doc.for_each_drawable(|element| {
        element.set_attr("fill", "currentColor");
        if element.attr("stroke").is_some_and(|s| s != "none") {
            element.set_attr("stroke", "currentColor");
        }
    });
}

/// Rewrite the root viewBox according to the mode policy.
///
/// The content is wrapped in a single `<g transform="...">` carrying the
/// uniform scale (and centering translation for the fixed square), so path
/// data never has to be rewritten. Documents with no discoverable bounds
/// are left untouched.
pub fn normalize_view_box(doc: &mut SvgDocument, policy: ViewBoxPolicy) {
    let Some((width, height)) = document_bounds(doc) else {
        tracing::debug!("no viewBox or dimensions on root, skipping viewBox normalization");
        return;
    };
    let (min_x, min_y) = doc
        .view_box()
        .map(|vb| (vb.min_x, vb.min_y))
        .unwrap_or((0.0, 0.0));

    let (target, scale, tx, ty) = match policy {
        ViewBoxPolicy::Fixed24 => {
            let scale = 24.0 / width.max(height);
            let tx = (24.0 - width * scale) / 2.0 - min_x * scale;
            let ty = (24.0 - height * scale) / 2.0 - min_y * scale;
            (
                ViewBox {
                    min_x: 0.0,
                    min_y: 0.0,
                    width: 24.0,
                    height: 24.0,
                },
                scale,
                tx,
                ty,
            )
        }
        ViewBoxPolicy::PreserveAspect { max_units } => {
            let scale = max_units / width.max(height);
            (
                ViewBox {
                    min_x: 0.0,
                    min_y: 0.0,
                    width: round2(width * scale),
                    height: round2(height * scale),
                },
                scale,
                -min_x * scale,
                -min_y * scale,
            )
        }
    };

    if !is_identity(scale, tx, ty) {
        let mut group = SvgElement::new("g");
        group.set_attr("transform", transform_value(scale, tx, ty));
        group.children = std::mem::take(&mut doc.root.children);
        doc.root.children.push(SvgNode::Element(group));
    }
    doc.set_view_box(target);
}

/// Strip fixed dimensions and camelCase the presentation attributes.
///
/// `width`/`height` go away because the viewBox governs sizing inside a
/// component; attribute renaming uses the fixed table in [`crate::svg::attrs`].
pub fn normalize_for_embedding(doc: &mut SvgDocument) {
    doc.root.remove_attr("width");
    doc.root.remove_attr("height");
    doc.for_each_element(rename_attrs);
}

/// Width/height of the drawing surface: the viewBox when present,
/// otherwise the root `width`/`height` attributes.
fn document_bounds(doc: &SvgDocument) -> Option<(f64, f64)> {
    if let Some(vb) = doc.view_box() {
        return Some((vb.width, vb.height));
    }
    let parse = |v: &str| v.trim().trim_end_matches("px").parse::<f64>().ok();
    let width = doc.root.attr("width").and_then(parse)?;
    let height = doc.root.attr("height").and_then(parse)?;
    Some((width, height))
}

/// Whether `d` begins with a move-to at the origin.
fn starts_at_origin(d: &str) -> bool {
    let rest = match d.trim_start().strip_prefix(['M', 'm']) {
        Some(rest) => rest,
        None => return false,
    };
    let mut numbers = rest
        .split(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>());
    matches!(
        (numbers.next(), numbers.next()),
        (Some(Ok(x)), Some(Ok(y))) if x == 0.0 && y == 0.0
    )
}

/// Whether `d` contains `value` (rounded) as a literal substring, allowing
/// an off-by-one.
fn contains_near(d: &str, value: f64) -> bool {
    let value = value.round() as i64;
    [value - 1, value, value + 1]
        .iter()
        .any(|v| d.contains(&v.to_string()))
}

fn is_identity(scale: f64, tx: f64, ty: f64) -> bool {
    (scale - 1.0).abs() < 1e-9 && tx.abs() < 1e-9 && ty.abs() < 1e-9
}

fn transform_value(scale: f64, tx: f64, ty: f64) -> String {
    let mut parts = Vec::new();
    if tx.abs() >= 1e-9 || ty.abs() >= 1e-9 {
        parts.push(format!("translate({} {})", fmt_num(tx), fmt_num(ty)));
    }
    if (scale - 1.0).abs() >= 1e-9 {
        parts.push(format!("scale({})", fmt_num(scale)));
    }
    parts.join(" ")
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn fmt_num(v: f64) -> String {
    // 6 decimal places is below visual resolution at any viewBox scale.
    let rounded = (v * 1e6).round() / 1e6;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn doc(markup: &str) -> SvgDocument {
        SvgDocument::parse(markup).unwrap()
    }

    fn palette(hex: &[&str]) -> Palette {
        Palette::from_colors(hex.iter().map(|h| Rgb::from_str(h).unwrap()).collect())
    }

    fn fills(doc: &mut SvgDocument) -> Vec<String> {
        let mut out = Vec::new();
        doc.for_each_drawable(|e| out.push(e.attr("fill").unwrap_or("").to_string()));
        out
    }

    // --- background-path removal ---

    const TWO_PATHS: &str = concat!(
        r##"<svg viewBox="0 0 100 80">"##,
        r##"<path d="M0 0 L100 0 L100 80 L0 80 Z" fill="#FFFFFF"/>"##,
        r##"<path d="M10 10 L90 70 Z" fill="#CC2020"/>"##,
        r##"</svg>"##
    );

    #[test]
    fn test_removes_only_the_background_candidate() {
        let mut d = doc(TWO_PATHS);
        assert!(remove_background_path(&mut d));
        assert_eq!(d.root.children.len(), 1);
        assert_eq!(fills(&mut d), vec!["#CC2020"]);
    }

    #[test]
    fn test_no_match_leaves_document_intact() {
        // Neither path starts at the origin.
        let markup = concat!(
            r##"<svg viewBox="0 0 100 80">"##,
            r##"<path d="M5 5 L95 75 Z" fill="#FFFFFF"/>"##,
            r##"<path d="M10 10 L90 70 Z" fill="#CC2020"/>"##,
            r##"</svg>"##
        );
        let mut d = doc(markup);
        assert!(!remove_background_path(&mut d));
        assert_eq!(d.root.children.len(), 2);
    }

    #[test]
    fn test_at_most_one_removed_when_several_match() {
        let markup = concat!(
            r##"<svg viewBox="0 0 100 80">"##,
            r##"<path d="M0 0 L100 0 L100 80 L0 80 Z" fill="#FFFFFF"/>"##,
            r##"<path d="M0 0 L100 80 Z" fill="#202020"/>"##,
            r##"</svg>"##
        );
        let mut d = doc(markup);
        assert!(remove_background_path(&mut d));
        assert_eq!(d.root.children.len(), 1);
        // The first candidate went; the coincidental second one stays.
        assert_eq!(fills(&mut d), vec!["#202020"]);
    }

    #[test]
    fn test_off_by_one_bounds_still_match() {
        let markup = concat!(
            r##"<svg viewBox="0 0 640 480">"##,
            r##"<path d="M0 0 L639 0 L639 481 L0 481 Z" fill="#FAFAFA"/>"##,
            r##"</svg>"##
        );
        let mut d = doc(markup);
        assert!(remove_background_path(&mut d));
    }

    #[test]
    fn test_comma_separated_origin_matches() {
        let markup = concat!(
            r##"<svg viewBox="0 0 64 64">"##,
            r##"<path d="M0,0L64,0L64,64L0,64Z" fill="#FFFFFF"/>"##,
            r##"</svg>"##
        );
        let mut d = doc(markup);
        assert!(remove_background_path(&mut d));
    }

    #[test]
    fn test_no_bounds_means_no_removal() {
        let mut d = doc(r##"<svg><path d="M0 0 L10 10 Z" fill="#FFFFFF"/></svg>"##);
        assert!(!remove_background_path(&mut d));
    }

    // --- fill reassignment ---

    #[test]
    fn test_brightness_bucket_remap() {
        let p = palette(&["#102030", "#808080", "#E0E0E0"]);
        let markup = concat!(
            r##"<svg viewBox="0 0 10 10">"##,
            r##"<path d="M0 0" fill="#404040"/>"##, // brightness 64 -> bucket 0
            r##"<path d="M1 1" fill="#787878"/>"##, // brightness 120 -> bucket 1
            r##"<path d="M2 2" fill="#BBBBBB"/>"##, // brightness 187 -> bucket 2
            r##"</svg>"##
        );
        let mut d = doc(markup);
        reassign_fills(&mut d, &p);
        assert_eq!(fills(&mut d), vec!["#102030", "#808080", "#E0E0E0"]);
    }

    #[test]
    fn test_text_brightness_preserved() {
        let p = palette(&["#336699"]);
        let markup = concat!(
            r##"<svg viewBox="0 0 10 10">"##,
            r##"<path d="M0 0" fill="#FFFFFF"/>"##, // near-white: preserved
            r##"<path d="M1 1" fill="#111111"/>"##, // near-black: preserved
            r##"<path d="M2 2" fill="#888888"/>"##, // mid: remapped
            r##"</svg>"##
        );
        let mut d = doc(markup);
        reassign_fills(&mut d, &p);
        assert_eq!(fills(&mut d), vec!["#FFFFFF", "#111111", "#336699"]);
    }

    #[test]
    fn test_non_hex_paint_untouched() {
        let p = palette(&["#336699"]);
        let markup = concat!(
            r##"<svg viewBox="0 0 10 10">"##,
            r##"<path d="M0 0" fill="none"/>"##,
            r##"<path d="M1 1" fill="currentColor"/>"##,
            r##"<path d="M2 2" fill="url(#grad)"/>"##,
            r##"</svg>"##
        );
        let mut d = doc(markup);
        reassign_fills(&mut d, &p);
        assert_eq!(fills(&mut d), vec!["none", "currentColor", "url(#grad)"]);
    }

    #[test]
    fn test_nested_drawables_recolored() {
        let p = palette(&["#336699"]);
        let markup = r##"<svg viewBox="0 0 10 10"><g><rect fill="#808080"/></g></svg>"##;
        let mut d = doc(markup);
        reassign_fills(&mut d, &p);
        assert_eq!(fills(&mut d), vec!["#336699"]);
    }

    // --- theme fill ---

    #[test]
    fn test_theme_fill_forces_current_color() {
        let markup = concat!(
            r##"<svg viewBox="0 0 24 24">"##,
            r##"<path d="M0 0" fill="#000000"/>"##,
            r##"<circle r="4" fill="#FF0000" stroke="#00FF00"/>"##,
            r##"<rect stroke="none"/>"##,
            r##"</svg>"##
        );
        let mut d = doc(markup);
        force_theme_fill(&mut d);
        let mut strokes = Vec::new();
        d.for_each_drawable(|e| strokes.push(e.attr("stroke").map(str::to_string)));
        assert_eq!(
            fills(&mut d),
            vec!["currentColor", "currentColor", "currentColor"]
        );
        assert_eq!(
            strokes,
            vec![None, Some("currentColor".to_string()), Some("none".to_string())]
        );
    }

    // --- viewBox normalization ---

    #[test]
    fn test_fixed24_scales_and_centers() {
        let mut d = doc(r##"<svg viewBox="0 0 100 80"><path d="M0 0" fill="#333333"/></svg>"##);
        normalize_view_box(&mut d, ViewBoxPolicy::Fixed24);
        assert_eq!(d.root.attr("viewBox"), Some("0 0 24 24"));
        let SvgNode::Element(group) = &d.root.children[0] else {
            panic!("expected wrapping group");
        };
        assert_eq!(group.tag, "g");
        assert_eq!(group.attr("transform"), Some("translate(0 2.4) scale(0.24)"));
    }

    #[test]
    fn test_preserve_aspect_bounds_longer_side() {
        let mut d = doc(r##"<svg viewBox="0 0 640 480"><path d="M0 0" fill="#333333"/></svg>"##);
        normalize_view_box(&mut d, ViewBoxPolicy::PreserveAspect { max_units: 100.0 });
        assert_eq!(d.root.attr("viewBox"), Some("0 0 100 75"));
        let SvgNode::Element(group) = &d.root.children[0] else {
            panic!("expected wrapping group");
        };
        assert_eq!(group.attr("transform"), Some("scale(0.15625)"));
    }

    #[test]
    fn test_identity_policy_adds_no_group() {
        let mut d = doc(r##"<svg viewBox="0 0 100 60"><path d="M0 0" fill="#333333"/></svg>"##);
        normalize_view_box(&mut d, ViewBoxPolicy::PreserveAspect { max_units: 100.0 });
        assert_eq!(d.root.attr("viewBox"), Some("0 0 100 60"));
        assert!(matches!(
            &d.root.children[0],
            SvgNode::Element(e) if e.tag == "path"
        ));
    }

    #[test]
    fn test_bounds_fall_back_to_dimension_attrs() {
        let mut d = doc(r##"<svg width="200px" height="100px"><path d="M0 0" fill="#333333"/></svg>"##);
        normalize_view_box(&mut d, ViewBoxPolicy::PreserveAspect { max_units: 100.0 });
        assert_eq!(d.root.attr("viewBox"), Some("0 0 100 50"));
    }

    // --- embedding normalization ---

    #[test]
    fn test_embedding_strips_dimensions_and_renames() {
        let markup = concat!(
            r##"<svg width="100" height="80" viewBox="0 0 100 80">"##,
            r##"<path d="M0 0" fill="#333333" fill-opacity="0.8" stroke-width="2"/>"##,
            r##"</svg>"##
        );
        let mut d = doc(markup);
        normalize_for_embedding(&mut d);
        assert_eq!(d.root.attr("width"), None);
        assert_eq!(d.root.attr("height"), None);
        assert_eq!(d.root.attr("viewBox"), Some("0 0 100 80"));
        let out = d.to_svg_string().unwrap();
        assert!(out.contains(r##"fillOpacity="0.8""##));
        assert!(out.contains(r##"strokeWidth="2""##));
        assert!(!out.contains("fill-opacity"));
    }

    // --- full pass ---

    #[test]
    fn test_full_pass_on_traced_logo() {
        let p = palette(&["#1A3A6A", "#CC2020"]);
        let mut d = doc(TWO_PATHS);
        post_process(
            &mut d,
            &PostProcessOptions {
                strip_background: true,
                recolor: Some(&p),
                theme_fill: false,
                view_box: ViewBoxPolicy::PreserveAspect { max_units: 100.0 },
            },
        );
        let out = d.to_svg_string().unwrap();
        assert!(!out.contains("#FFFFFF"), "background path should be gone");
        assert_eq!(d.root.attr("viewBox"), Some("0 0 100 80"));
        assert_eq!(d.root.attr("width"), None);
    }
}
