//! Clarity scoring.
//!
//! Combines three measures taken on the grayscale image:
//! - Laplacian variance for focus
//! - Canny edge density for fine structure
//! - Blur residual for noise
//!
//! The score is multiplicative, so one bad dimension is enough to sink it.

use image::{GrayImage, Luma};
use imageproc::edges::canny;
use imageproc::filter::{filter3x3, laplacian_filter};
use tracing::debug;

use super::round_to;
use crate::domain::{ClarityResult, Status};

/// 3x3 binomial approximation of a Gaussian, normalized to 1.
const BLUR_KERNEL: [f32; 9] = [
    1.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
    2.0 / 16.0,
    4.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
    2.0 / 16.0,
    1.0 / 16.0,
];

/// Configuration for clarity scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct ClarityConfig {
    /// Minimum score for a pass.
    pub threshold: f64,
    /// Laplacian variance that maps to full sharpness.
    pub sharpness_scale: f64,
    /// Multiplier turning edge density into a [0, 1] structure factor.
    pub structure_gain: f64,
    /// Multiplier turning the noise level into a penalty.
    pub noise_gain: f64,
    /// Floor of the noise penalty factor.
    pub min_noise_penalty: f64,
    /// Canny hysteresis low threshold.
    pub canny_low: f32,
    /// Canny hysteresis high threshold.
    pub canny_high: f32,
}

impl Default for ClarityConfig {
    fn default() -> Self {
        Self {
            threshold: 30.0,
            sharpness_scale: 150.0,
            structure_gain: 25.0,
            noise_gain: 8.0,
            min_noise_penalty: 0.4,
            canny_low: 80.0,
            canny_high: 160.0,
        }
    }
}

fn too_small(gray: &GrayImage) -> bool {
    gray.width() < 3 || gray.height() < 3
}

/// Population variance of the 3x3 Laplacian response.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn laplacian_variance(gray: &GrayImage) -> f64 {
    if too_small(gray) {
        return 0.0;
    }
    let response = laplacian_filter(gray);
    variance(response.as_raw().iter().map(|&v| f64::from(v)))
}

/// Fraction of pixels marked as edges by Canny.
///
/// `imageproc`'s Canny smooths with a Gaussian (sigma 1.4) before taking
/// gradients, so densities run lower than an unsmoothed Canny at the same
/// thresholds. The default `structure_gain` and thresholds are tuned against
/// an unsmoothed detector.
///
/// Thresholds are swapped if given out of order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn edge_density(gray: &GrayImage, low: f32, high: f32) -> f64 {
    if too_small(gray) {
        return 0.0;
    }
    let (low, high) = if low <= high { (low, high) } else { (high, low) };
    let edges = canny(gray, low, high);
    let marked = edges.as_raw().iter().filter(|&&v| v > 0).count();
    marked as f64 / edges.as_raw().len() as f64
}

/// Standard deviation of (3x3 blur - image), normalized to [0, 1].
#[must_use]
pub fn noise_estimate(gray: &GrayImage) -> f64 {
    if too_small(gray) {
        return 0.0;
    }
    let blurred = filter3x3::<Luma<u8>, f32, f32>(gray, &BLUR_KERNEL);
    let residuals = blurred
        .as_raw()
        .iter()
        .zip(gray.as_raw())
        .map(|(&b, &g)| f64::from(b.round().clamp(0.0, 255.0)) - f64::from(g));
    variance(residuals).sqrt() / 255.0
}

#[allow(clippy::cast_precision_loss)]
fn variance(values: impl Iterator<Item = f64>) -> f64 {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    for v in values {
        count += 1;
        sum += v;
        sum_sq += v * v;
    }
    if count == 0 {
        return 0.0;
    }
    let n = count as f64;
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

/// Scores the clarity of a grayscale image.
#[must_use]
pub fn estimate_clarity(gray: &GrayImage, config: &ClarityConfig) -> ClarityResult {
    let lap_var = laplacian_variance(gray);
    let edges = edge_density(gray, config.canny_low, config.canny_high);
    let noise = noise_estimate(gray);

    let sharpness_n = (lap_var / config.sharpness_scale).clamp(0.0, 1.0);
    let structure_n = (edges * config.structure_gain).clamp(0.0, 1.0);
    let noise_penalty = (1.0 - noise * config.noise_gain).max(config.min_noise_penalty);
    let clarity_score = round_to(100.0 * sharpness_n * structure_n * noise_penalty, 2);
    let status = Status::from_pass(clarity_score >= config.threshold);

    debug!(
        lap_var,
        edge_density = edges,
        noise,
        score = clarity_score,
        "clarity measured"
    );

    ClarityResult {
        sharpness_raw: round_to(lap_var, 2),
        edge_ratio: round_to(edges, 3),
        noise_level: round_to(noise, 3),
        clarity_score,
        status,
    }
}
