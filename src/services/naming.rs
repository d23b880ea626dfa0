//! Component name generation.
//!
//! Turns a filename or user-supplied name into a bounded, camel-cased
//! identifier safe to use as a component name in generated code.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::models::OutputMode;

/// Maximum component name length in characters.
pub const MAX_NAME_LEN: usize = 25;

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid regex"))
}

/// Derive a component name from the user's requested name or the upload
/// filename.
///
/// A requested name wins when stripping non-alphanumerics leaves anything:
/// the remainder is capitalized and truncated. Otherwise the filename stem
/// is split on non-alphanumeric runs and the tokens are title-cased and
/// concatenated (`my-cool-logo.png` → `MyCoolLogo`). Names that would
/// start with a non-letter get the mode prefix (`123.png` → `Logo123`),
/// and when everything cancels out the fixed `IconAsset`/`LogoAsset`
/// default is used.
pub fn component_name(requested: Option<&str>, filename: &str, mode: OutputMode) -> String {
    if let Some(requested) = requested {
        let cleaned = non_alphanumeric().replace_all(requested, "");
        if !cleaned.is_empty() {
            return truncate(&capitalize(&cleaned));
        }
    }

    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let name: String = non_alphanumeric()
        .split(&stem)
        .filter(|token| !token.is_empty())
        .map(capitalize)
        .collect();

    let name = if name.is_empty() {
        format!("{}Asset", mode.name_prefix())
    } else if name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
        name
    } else {
        format!("{}{}", mode.name_prefix(), name)
    };

    truncate(&name)
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn truncate(name: &str) -> String {
    name.chars().take(MAX_NAME_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_title_cased() {
        assert_eq!(
            component_name(None, "my-cool-logo.png", OutputMode::Logo),
            "MyCoolLogo"
        );
        assert_eq!(
            component_name(None, "acme_mark.v2.svg", OutputMode::Logo),
            "AcmeMarkV2"
        );
    }

    #[test]
    fn test_digit_start_gets_mode_prefix() {
        let name = component_name(None, "123!!!.png", OutputMode::Logo);
        assert!(name.starts_with("Logo"));
        assert_eq!(name, "Logo123");

        let name = component_name(None, "123.png", OutputMode::Icon);
        assert_eq!(name, "Icon123");
    }

    #[test]
    fn test_requested_name_wins() {
        assert_eq!(
            component_name(Some("nav arrow!"), "whatever.png", OutputMode::Icon),
            "Navarrow"
        );
    }

    #[test]
    fn test_requested_name_keeps_inner_casing() {
        assert_eq!(
            component_name(Some("primaryButton"), "x.png", OutputMode::Icon),
            "PrimaryButton"
        );
    }

    #[test]
    fn test_unusable_requested_name_falls_back_to_filename() {
        assert_eq!(
            component_name(Some("!!!"), "chevron.png", OutputMode::Icon),
            "Chevron"
        );
    }

    #[test]
    fn test_truncated_to_max_len() {
        let long = "a".repeat(60);
        let name = component_name(Some(&long), "x.png", OutputMode::Icon);
        assert_eq!(name.len(), MAX_NAME_LEN);
        assert_eq!(name, format!("A{}", "a".repeat(MAX_NAME_LEN - 1)));
    }

    #[test]
    fn test_everything_empty_uses_default() {
        assert_eq!(component_name(None, "", OutputMode::Icon), "IconAsset");
        assert_eq!(component_name(None, "...", OutputMode::Logo), "LogoAsset");
        assert_eq!(component_name(Some("!!"), "..", OutputMode::Logo), "LogoAsset");
    }

    #[test]
    fn test_path_components_ignored() {
        assert_eq!(
            component_name(None, "/uploads/tmp/brand-mark.webp", OutputMode::Logo),
            "BrandMark"
        );
    }
}
