//! Analytic modules.
//!
//! Each module covers one stage of the legibility pipeline. Contrast and
//! clarity run independently; the verdict combines their outcomes.

mod clarity;
mod contrast;
mod luminance;
mod mser;
mod text_regions;
mod verdict;

pub use clarity::{edge_density, estimate_clarity, laplacian_variance, noise_estimate, ClarityConfig};
pub use contrast::{apca_contrast, estimate_contrast, partition_means, ColorSample, ContrastConfig};
pub use luminance::srgb_to_luminance;
pub use mser::{extract_regions, MserConfig};
pub use text_regions::MserTextDetector;
pub use verdict::{verdict, PASS_MESSAGE};

/// Rounds half away from zero to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
