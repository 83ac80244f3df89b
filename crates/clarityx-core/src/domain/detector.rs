//! Text-region detector trait for pluggable "is this text" heuristics.

use image::GrayImage;

use super::RegionMask;

/// Trait for implementing text-region detectors.
///
/// A detector partitions a grayscale image into likely glyph pixels
/// (foreground) and background. The contrast estimator only depends on the
/// resulting mask, so a geometric heuristic can be swapped for a trained
/// model without touching the rest of the pipeline.
pub trait TextRegionDetector: Send + Sync {
    /// Returns the name of this detector.
    fn name(&self) -> &'static str;

    /// Detects text-like regions in a grayscale image.
    ///
    /// # Arguments
    ///
    /// * `gray` - Single-channel intensity image
    ///
    /// # Returns
    ///
    /// A mask with the same dimensions as `gray`. Finding nothing is a valid
    /// outcome and yields an all-background mask.
    fn detect(&self, gray: &GrayImage) -> RegionMask;
}
