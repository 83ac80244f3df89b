//! Perceptual text/background contrast.
//!
//! Mean colors of the two mask partitions are converted to relative
//! luminance and compared with an APCA-style formula: each side is raised
//! to its own exponent before the difference is scaled. The sign of the
//! result encodes polarity (positive for dark text on a light background).

use image::RgbImage;
use tracing::debug;

use super::luminance::srgb_to_luminance;
use super::round_to;
use crate::domain::{AnalysisError, ContrastResult, Polarity, RegionMask, Status};

/// Configuration for contrast estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct ContrastConfig {
    /// Minimum `|Lc|` for a pass.
    pub threshold: f64,
    /// Partitions with fewer pixels than this give no reliable contrast.
    pub min_partition_pixels: usize,
    /// Output scale of the contrast formula.
    pub scale: f64,
    /// Exponent applied to background luminance.
    pub background_exponent: f64,
    /// Exponent applied to text luminance.
    pub text_exponent: f64,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            threshold: 25.0,
            min_partition_pixels: 10,
            scale: 400.0,
            background_exponent: 0.56,
            text_exponent: 0.57,
        }
    }
}

/// Mean color of one mask partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    /// Per-channel mean in RGB order, each in [0, 255].
    pub mean: [f64; 3],
    /// Number of pixels averaged.
    pub count: usize,
}

impl ColorSample {
    /// Relative luminance of the mean color.
    #[must_use]
    pub fn luminance(&self) -> f64 {
        srgb_to_luminance(self.mean)
    }
}

#[derive(Default)]
struct Accumulator {
    sum: [u64; 3],
    count: usize,
}

impl Accumulator {
    fn add(&mut self, rgb: [u8; 3]) {
        for (s, v) in self.sum.iter_mut().zip(rgb) {
            *s += u64::from(v);
        }
        self.count += 1;
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self) -> ColorSample {
        let mean = if self.count == 0 {
            [0.0; 3]
        } else {
            self.sum.map(|s| s as f64 / self.count as f64)
        };
        ColorSample {
            mean,
            count: self.count,
        }
    }
}

/// Averages the foreground and background partitions of `rgb`.
///
/// Returns `(text, background)`.
///
/// # Errors
///
/// Returns [`AnalysisError::MaskDimensions`] if the mask does not match the image.
pub fn partition_means(
    rgb: &RgbImage,
    mask: &RegionMask,
) -> Result<(ColorSample, ColorSample), AnalysisError> {
    if rgb.dimensions() != mask.dimensions() {
        return Err(AnalysisError::MaskDimensions {
            mask_width: mask.width(),
            mask_height: mask.height(),
            image_width: rgb.width(),
            image_height: rgb.height(),
        });
    }

    let mut text = Accumulator::default();
    let mut background = Accumulator::default();
    for (pixel, label) in rgb.pixels().zip(mask.as_image().pixels()) {
        if label.0[0] == 0 {
            background.add(pixel.0);
        } else {
            text.add(pixel.0);
        }
    }
    Ok((text.finish(), background.finish()))
}

/// Signed contrast and polarity from text and background luminance.
///
/// The magnitude is `|scale * (Y_bg^a - Y_text^b)|`; it is negated for
/// light text on a dark background. Not rounded.
#[must_use]
pub fn apca_contrast(y_text: f64, y_bg: f64, config: &ContrastConfig) -> (f64, Polarity) {
    let polarity = if y_bg > y_text {
        Polarity::DarkOnLight
    } else {
        Polarity::LightOnDark
    };
    let magnitude = (config.scale
        * (y_bg.powf(config.background_exponent) - y_text.powf(config.text_exponent)))
    .abs();
    match polarity {
        Polarity::DarkOnLight => (magnitude, polarity),
        Polarity::LightOnDark => (-magnitude, polarity),
    }
}

/// Measures text/background contrast of `rgb` under `mask`.
///
/// # Errors
///
/// Returns [`AnalysisError::MaskDimensions`] if the mask does not match the image.
pub fn estimate_contrast(
    rgb: &RgbImage,
    mask: &RegionMask,
    config: &ContrastConfig,
) -> Result<ContrastResult, AnalysisError> {
    let (text, background) = partition_means(rgb, mask)?;

    if text.count < config.min_partition_pixels || background.count < config.min_partition_pixels
    {
        debug!(
            text_pixels = text.count,
            background_pixels = background.count,
            "not enough pixels in a partition for contrast"
        );
        return Ok(ContrastResult::insufficient_signal());
    }

    let (raw, polarity) = apca_contrast(text.luminance(), background.luminance(), config);
    // Equal luminance on the light-on-dark branch rounds to -0.0
    let signed_contrast = match round_to(raw, 2) {
        lc if lc == 0.0 => 0.0,
        lc => lc,
    };
    let status = Status::from_pass(signed_contrast.abs() >= config.threshold);

    debug!(
        lc = signed_contrast,
        ?polarity,
        text = ?text.mean,
        background = ?background.mean,
        "contrast measured"
    );

    Ok(ContrastResult {
        signed_contrast,
        polarity: Some(polarity),
        status,
    })
}
