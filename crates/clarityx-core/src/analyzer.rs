//! Per-image legibility analysis.
//!
//! Text-region detection feeds contrast estimation, clarity is measured on
//! the grayscale image independently, and both results go to the verdict.

use tracing::debug;

use crate::domain::{
    AnalysisError, AnalysisReport, ClarityResult, ContrastResult, ImageInfo, TextRegionDetector,
};
use crate::modules::{
    estimate_clarity, estimate_contrast, verdict, ClarityConfig, ContrastConfig, MserConfig,
    MserTextDetector,
};

/// Tunables for every analysis stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegibilityConfig {
    /// Contrast estimation.
    pub contrast: ContrastConfig,
    /// Clarity scoring.
    pub clarity: ClarityConfig,
    /// Stable-region extraction used by the default detector.
    pub detector: MserConfig,
}

/// Runs the full legibility pipeline on single images.
pub struct LegibilityAnalyzer {
    contrast: ContrastConfig,
    clarity: ClarityConfig,
    detector: Box<dyn TextRegionDetector>,
}

impl LegibilityAnalyzer {
    /// Creates an analyzer using the stable-region text detector.
    #[must_use]
    pub fn new(config: LegibilityConfig) -> Self {
        let detector = Box::new(MserTextDetector::new(config.detector));
        Self {
            contrast: config.contrast,
            clarity: config.clarity,
            detector,
        }
    }

    /// Creates an analyzer with a custom text-region detector.
    ///
    /// `config.detector` is ignored.
    #[must_use]
    pub fn with_detector(config: LegibilityConfig, detector: Box<dyn TextRegionDetector>) -> Self {
        Self {
            contrast: config.contrast,
            clarity: config.clarity,
            detector,
        }
    }

    /// Name of the text-region detector in use.
    #[must_use]
    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Measures text/background contrast.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::MaskDimensions`] if the detector returns a
    /// mask that does not match the image.
    pub fn contrast(&self, image: &ImageInfo) -> Result<ContrastResult, AnalysisError> {
        let mask = self.detector.detect(&image.to_luma8());
        estimate_contrast(&image.to_rgb8(), &mask, &self.contrast)
    }

    /// Measures clarity.
    #[must_use]
    pub fn clarity(&self, image: &ImageInfo) -> ClarityResult {
        estimate_clarity(&image.to_luma8(), &self.clarity)
    }

    /// Runs every stage and builds the report.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] if the detector misbehaves.
    pub fn analyze(&self, image: &ImageInfo) -> Result<AnalysisReport, AnalysisError> {
        let gray = image.to_luma8();

        let mask = self.detector.detect(&gray);
        let contrast = estimate_contrast(&image.to_rgb8(), &mask, &self.contrast)?;
        let clarity = estimate_clarity(&gray, &self.clarity);
        let verdict = verdict(&contrast, &clarity);

        debug!(
            path = %image.path,
            detector = self.detector.name(),
            overall = %verdict.overall,
            reason = %verdict.reason,
            "analyzed image"
        );

        Ok(AnalysisReport::measured(
            image.path.clone(),
            image.dimensions(),
            contrast,
            clarity,
            verdict,
        ))
    }

    /// Decodes and analyzes an in-memory image.
    ///
    /// Decode and analysis failures become an unreadable report.
    #[must_use]
    pub fn analyze_bytes(&self, name: &str, bytes: &[u8]) -> AnalysisReport {
        match ImageInfo::from_bytes(name, bytes) {
            Ok(image) => self
                .analyze(&image)
                .unwrap_or_else(|e| AnalysisReport::unreadable(name, e)),
            Err(e) => {
                debug!(name, reason = %e.reason, "upload could not be decoded");
                AnalysisReport::from_unreadable(&e)
            }
        }
    }
}

impl Default for LegibilityAnalyzer {
    fn default() -> Self {
        Self::new(LegibilityConfig::default())
    }
}

impl std::fmt::Debug for LegibilityAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegibilityAnalyzer")
            .field("contrast", &self.contrast)
            .field("clarity", &self.clarity)
            .field("detector", &self.detector.name())
            .finish()
    }
}
