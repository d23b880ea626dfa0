//! Output modes and the per-mode vectorization policy table.

use std::fmt;
use std::str::FromStr;

/// What kind of asset the pipeline should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Monochrome glyph intended to inherit its color from the host theme.
    Icon,
    /// Multi-color mark keeping the source's palette and aspect ratio.
    Logo,
}

impl OutputMode {
    /// Token prefixed to component names that would otherwise start with a
    /// non-letter.
    pub fn name_prefix(self) -> &'static str {
        match self {
            OutputMode::Icon => "Icon",
            OutputMode::Logo => "Logo",
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMode::Icon => write!(f, "icon"),
            OutputMode::Logo => write!(f, "logo"),
        }
    }
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icon" => Ok(OutputMode::Icon),
            "logo" => Ok(OutputMode::Logo),
            other => Err(format!("unknown mode '{}' (expected icon or logo)", other)),
        }
    }
}

/// How the post-processor normalizes the output viewBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewBoxPolicy {
    /// Force a square `0 0 24 24` system, scaled and centered.
    Fixed24,
    /// Preserve the source aspect ratio, scaling the longer side to the
    /// given number of units.
    PreserveAspect {
        /// Target length of the longer viewBox side.
        max_units: f64,
    },
}

/// Static vectorization policy for one [`OutputMode`].
///
/// Never constructed ad hoc — always via [`ModeConfig::for_mode`], so the
/// two policies live in one table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeConfig {
    /// How many palette entries to extract.
    pub color_count: usize,
    /// Whether output uses a single theme-inherited fill instead of the
    /// detected palette.
    pub single_color_fill: bool,
    /// ViewBox normalization applied by the post-processor.
    pub view_box: ViewBoxPolicy,
}

impl ModeConfig {
    /// Look up the policy for `mode`.
    pub fn for_mode(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Icon => Self {
                color_count: 1,
                single_color_fill: true,
                view_box: ViewBoxPolicy::Fixed24,
            },
            OutputMode::Logo => Self {
                color_count: 6,
                single_color_fill: false,
                view_box: ViewBoxPolicy::PreserveAspect { max_units: 100.0 },
            },
        }
    }
}
