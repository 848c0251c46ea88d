//! Score tiers and the map styles derived from them.
//!
//! The same tier drives polygon fills and marker fills so both render modes
//! read identically.
//!
//! # Examples
//! ```
//! use navigator_core::ScoreTier;
//!
//! assert_eq!(ScoreTier::for_score(Some(85.0)), ScoreTier::High);
//! assert_eq!(ScoreTier::for_score(Some(0.0)), ScoreTier::Low);
//! assert_eq!(ScoreTier::for_score(None), ScoreTier::Unknown);
//! assert_eq!(ScoreTier::Medium.colour(), "#d97706");
//! ```

use serde::Serialize;

/// Lower bound of the high tier.
pub const HIGH_THRESHOLD: f64 = 80.0;
/// Lower bound of the medium tier.
pub const MEDIUM_THRESHOLD: f64 = 60.0;

const BORDER_WHITE: &str = "#ffffff";
const HIGHLIGHT_BORDER: &str = "#666666";

/// Discrete colour band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    /// Score of at least 80.
    High,
    /// Score of at least 60 and below 80.
    Medium,
    /// Score below 60, including 0.
    Low,
    /// No score is recorded.
    Unknown,
}

impl ScoreTier {
    /// Classify an optional score.
    ///
    /// Non-finite scores classify as [`ScoreTier::Low`], matching the
    /// sanitised total of the record they came from.
    #[must_use]
    pub fn for_score(score: Option<f64>) -> Self {
        match score {
            None => Self::Unknown,
            Some(value) if value >= HIGH_THRESHOLD => Self::High,
            Some(value) if value >= MEDIUM_THRESHOLD => Self::Medium,
            Some(_) => Self::Low,
        }
    }

    /// Fill colour as a CSS hex string.
    #[must_use]
    pub const fn colour(self) -> &'static str {
        match self {
            Self::High => "#16a34a",
            Self::Medium => "#d97706",
            Self::Low => "#dc2626",
            Self::Unknown => "#888888",
        }
    }

    /// Visual severity, rising as the score falls.
    ///
    /// Unknown has no severity so it never compares equal to a low score.
    #[must_use]
    pub const fn severity(self) -> Option<u8> {
        match self {
            Self::High => Some(0),
            Self::Medium => Some(1),
            Self::Low => Some(2),
            Self::Unknown => None,
        }
    }

    /// Lowercase label used in legends and text output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style of a governorate boundary polygon.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeStyle {
    /// Fill colour taken from the tier.
    pub fill_colour: &'static str,
    /// Border width in pixels.
    pub weight: f64,
    /// Border opacity.
    pub opacity: f64,
    /// Border colour.
    pub colour: &'static str,
    /// Border dash pattern; empty for a solid line.
    pub dash_array: &'static str,
    /// Fill opacity.
    pub fill_opacity: f64,
}

impl ShapeStyle {
    /// Resting style for a polygon in `tier`.
    #[must_use]
    pub const fn for_tier(tier: ScoreTier) -> Self {
        Self {
            fill_colour: tier.colour(),
            weight: 1.5,
            opacity: 1.0,
            colour: BORDER_WHITE,
            dash_array: "3",
            fill_opacity: 0.7,
        }
    }

    /// Hover style for a polygon in `tier`.
    #[must_use]
    pub const fn highlighted(tier: ScoreTier) -> Self {
        Self {
            fill_colour: tier.colour(),
            weight: 3.0,
            opacity: 1.0,
            colour: HIGHLIGHT_BORDER,
            dash_array: "",
            fill_opacity: 0.85,
        }
    }
}

/// Style of a governorate point marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    /// Fill colour taken from the tier.
    pub fill_colour: &'static str,
    /// Marker radius in pixels.
    pub radius: f64,
    /// Border colour.
    pub colour: &'static str,
    /// Border width in pixels.
    pub weight: f64,
    /// Border opacity.
    pub opacity: f64,
    /// Fill opacity.
    pub fill_opacity: f64,
}

impl MarkerStyle {
    /// Style for a marker in `tier`.
    #[must_use]
    pub const fn for_tier(tier: ScoreTier) -> Self {
        Self {
            fill_colour: tier.colour(),
            radius: 8.0,
            colour: BORDER_WHITE,
            weight: 1.0,
            opacity: 1.0,
            fill_opacity: 0.8,
        }
    }
}
