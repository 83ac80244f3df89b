//! Measurement results produced by the contrast, clarity and verdict stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Pass/fail outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The check is satisfied.
    Pass,
    /// The check is not satisfied.
    Fail,
}

impl Status {
    /// Maps a boolean condition to `Pass`/`Fail`.
    #[must_use]
    pub const fn from_pass(passed: bool) -> Self {
        if passed {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    /// Returns true for `Pass`.
    #[must_use]
    pub const fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Lowercase label used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of text and background is lighter.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Dark text on a lighter background.
    DarkOnLight,
    /// Light text on a darker background.
    LightOnDark,
}

/// Perceptual contrast between detected text and its background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContrastResult {
    /// Signed APCA-style contrast (Lc), rounded to 2 decimals.
    /// Positive for dark-on-light, negative for light-on-dark.
    #[serde(rename = "Lc")]
    pub signed_contrast: f64,
    /// Polarity of the text. Absent when no reliable contrast was measurable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polarity: Option<Polarity>,
    /// Whether `|Lc|` reached the contrast threshold.
    pub status: Status,
}

impl ContrastResult {
    /// Result used when a mask partition is too small to sample.
    #[must_use]
    pub const fn insufficient_signal() -> Self {
        Self {
            signed_contrast: 0.0,
            polarity: None,
            status: Status::Fail,
        }
    }
}

/// Focus, structure and noise measurements combined into a clarity score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClarityResult {
    /// Variance of the Laplacian response.
    #[serde(rename = "lap_var")]
    pub sharpness_raw: f64,
    /// Fraction of pixels marked as edges.
    #[serde(rename = "edge_density")]
    pub edge_ratio: f64,
    /// Standard deviation of the blur residual, normalized to [0, 1].
    #[serde(rename = "noise")]
    pub noise_level: f64,
    /// Combined score in [0, 100], rounded to 2 decimals.
    pub clarity_score: f64,
    /// Whether the score reached the clarity threshold.
    pub status: Status,
}

/// Combined legibility judgment for one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Pass only when every sub-check passed.
    pub overall: Status,
    /// Failing checks in order, or the pass message.
    pub reason: String,
}
