//! Attribute-name normalization for component embedding.
//!
//! Component-oriented output formats reject hyphenated SVG presentation
//! attributes, so the post-processor renames them through this fixed
//! table. Unknown attributes pass through untouched — renaming is lossy
//! only by explicit opt-in to the table.

use crate::svg::SvgElement;

/// Hyphenated (or namespaced) SVG attribute names and their camelCase
/// equivalents.
const ATTR_RENAMES: &[(&str, &str)] = &[
    ("fill-opacity", "fillOpacity"),
    ("fill-rule", "fillRule"),
    ("stroke-width", "strokeWidth"),
    ("stroke-opacity", "strokeOpacity"),
    ("stroke-linecap", "strokeLinecap"),
    ("stroke-linejoin", "strokeLinejoin"),
    ("stroke-miterlimit", "strokeMiterlimit"),
    ("stroke-dasharray", "strokeDasharray"),
    ("stroke-dashoffset", "strokeDashoffset"),
    ("clip-path", "clipPath"),
    ("clip-rule", "clipRule"),
    ("marker-start", "markerStart"),
    ("marker-mid", "markerMid"),
    ("marker-end", "markerEnd"),
    ("stop-color", "stopColor"),
    ("stop-opacity", "stopOpacity"),
    ("color-interpolation", "colorInterpolation"),
    ("color-interpolation-filters", "colorInterpolationFilters"),
    ("dominant-baseline", "dominantBaseline"),
    ("text-anchor", "textAnchor"),
    ("xlink:href", "xlinkHref"),
];

/// The camelCase spelling for `name`, if the table covers it.
pub fn camel_case_name(name: &str) -> Option<&'static str> {
    ATTR_RENAMES
        .iter()
        .find(|(hyphenated, _)| *hyphenated == name)
        .map(|(_, camel)| *camel)
}

/// Rename every table-covered attribute on `element` in place.
pub fn rename_attrs(element: &mut SvgElement) {
    for (key, _) in element.attrs.iter_mut() {
        if let Some(camel) = camel_case_name(key) {
            *key = camel.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_renames() {
        assert_eq!(camel_case_name("fill-opacity"), Some("fillOpacity"));
        assert_eq!(camel_case_name("stroke-linejoin"), Some("strokeLinejoin"));
        assert_eq!(camel_case_name("xlink:href"), Some("xlinkHref"));
    }

    #[test]
    fn test_unknown_names_pass_through() {
        assert_eq!(camel_case_name("fill"), None);
        assert_eq!(camel_case_name("d"), None);
        assert_eq!(camel_case_name("data-testid"), None);
    }

    #[test]
    fn test_rename_attrs_in_place() {
        let mut element = SvgElement::new("path");
        element.set_attr("d", "M0 0");
        element.set_attr("fill-opacity", "0.5");
        element.set_attr("stroke-width", "2");
        rename_attrs(&mut element);
        assert_eq!(element.attr("fillOpacity"), Some("0.5"));
        assert_eq!(element.attr("strokeWidth"), Some("2"));
        assert_eq!(element.attr("fill-opacity"), None);
        assert_eq!(element.attr("d"), Some("M0 0"));
    }
}
