//! Analysis result types.

use std::path::Path;

use image::{DynamicImage, GenericImageView, GrayImage, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ClarityResult, ContrastResult, ReportRecord, Status, UnreadableImage, Verdict};

/// Complete analysis report for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Path or name of the analyzed image.
    pub path: String,
    /// Timestamp of analysis (ISO 8601).
    pub timestamp: String,
    /// Measurements, or the reason none could be taken.
    #[serde(flatten)]
    pub outcome: AnalysisOutcome,
}

/// What came out of analyzing one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    /// The image was decoded and measured.
    Measured {
        /// Image dimensions.
        dimensions: ImageDimensions,
        /// Text/background contrast.
        contrast: ContrastResult,
        /// Focus/structure/noise clarity.
        clarity: ClarityResult,
        /// Combined judgment.
        verdict: Verdict,
    },
    /// No scores were computed.
    Unreadable {
        /// Why the image could not be analyzed.
        error: String,
    },
}

impl AnalysisReport {
    /// Creates a report for a measured image, stamped with the current time.
    #[must_use]
    pub fn measured(
        path: impl Into<String>,
        dimensions: ImageDimensions,
        contrast: ContrastResult,
        clarity: ClarityResult,
        verdict: Verdict,
    ) -> Self {
        Self {
            path: path.into(),
            timestamp: iso_timestamp(),
            outcome: AnalysisOutcome::Measured {
                dimensions,
                contrast,
                clarity,
                verdict,
            },
        }
    }

    /// Creates an error report for an image that could not be analyzed.
    #[must_use]
    pub fn unreadable(path: impl Into<String>, error: impl ToString) -> Self {
        Self {
            path: path.into(),
            timestamp: iso_timestamp(),
            outcome: AnalysisOutcome::Unreadable {
                error: error.to_string(),
            },
        }
    }

    /// Error report built from an image source failure.
    #[must_use]
    pub fn from_unreadable(err: &UnreadableImage) -> Self {
        Self::unreadable(err.path.clone(), &err.reason)
    }

    /// Returns the contrast result, if the image was measured.
    #[must_use]
    pub const fn contrast(&self) -> Option<&ContrastResult> {
        match &self.outcome {
            AnalysisOutcome::Measured { contrast, .. } => Some(contrast),
            AnalysisOutcome::Unreadable { .. } => None,
        }
    }

    /// Returns the clarity result, if the image was measured.
    #[must_use]
    pub const fn clarity(&self) -> Option<&ClarityResult> {
        match &self.outcome {
            AnalysisOutcome::Measured { clarity, .. } => Some(clarity),
            AnalysisOutcome::Unreadable { .. } => None,
        }
    }

    /// Returns the verdict, if the image was measured.
    #[must_use]
    pub const fn verdict(&self) -> Option<&Verdict> {
        match &self.outcome {
            AnalysisOutcome::Measured { verdict, .. } => Some(verdict),
            AnalysisOutcome::Unreadable { .. } => None,
        }
    }

    /// Returns the error message for unreadable images.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            AnalysisOutcome::Measured { .. } => None,
            AnalysisOutcome::Unreadable { error } => Some(error),
        }
    }

    /// Whether the image was measured and passed every check.
    #[must_use]
    pub fn is_pass(&self) -> bool {
        self.verdict().is_some_and(|v| v.overall.is_pass())
    }

    /// Overall status; unreadable images count as failures.
    #[must_use]
    pub fn overall_status(&self) -> Status {
        Status::from_pass(self.is_pass())
    }

    /// File name component of the path, used as the record identifier.
    #[must_use]
    pub fn file_name(&self) -> String {
        Path::new(&self.path)
            .file_name()
            .map_or_else(|| self.path.clone(), |n| n.to_string_lossy().into_owned())
    }

    /// Flattens this report into a tabular record.
    #[must_use]
    pub fn record(&self) -> ReportRecord {
        ReportRecord::from_report(self)
    }
}

/// Image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageDimensions {
    /// Creates new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A decoded image ready for analysis.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Path or upload name of the image.
    pub path: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Decoded image data.
    pub image: DynamicImage,
}

impl ImageInfo {
    /// Wraps a decoded image.
    #[must_use]
    pub fn new(path: impl Into<String>, image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            path: path.into(),
            width,
            height,
            image,
        }
    }

    /// Decodes an in-memory image, e.g. an upload.
    ///
    /// # Errors
    ///
    /// Returns [`UnreadableImage`] if the format cannot be guessed or decoding fails.
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Result<Self, UnreadableImage> {
        let path = path.into();
        match image::load_from_memory(bytes) {
            Ok(image) => Ok(Self::new(path, image)),
            Err(e) => Err(UnreadableImage::new(path, e)),
        }
    }

    /// Converts to 8-bit grayscale.
    #[must_use]
    pub fn to_luma8(&self) -> GrayImage {
        self.image.to_luma8()
    }

    /// Converts to 8-bit RGB, normalizing channel order and dropping alpha.
    #[must_use]
    pub fn to_rgb8(&self) -> RgbImage {
        self.image.to_rgb8()
    }

    /// Returns the image dimensions.
    #[must_use]
    pub const fn dimensions(&self) -> ImageDimensions {
        ImageDimensions::new(self.width, self.height)
    }
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::Polarity;

    fn sample_report(overall: Status) -> AnalysisReport {
        AnalysisReport::measured(
            "/data/sample_001.png",
            ImageDimensions::new(64, 32),
            ContrastResult {
                signed_contrast: 87.5,
                polarity: Some(Polarity::DarkOnLight),
                status: Status::Pass,
            },
            ClarityResult {
                sharpness_raw: 812.4,
                edge_ratio: 0.081,
                noise_level: 0.052,
                clarity_score: 58.4,
                status: Status::Pass,
            },
            Verdict {
                overall,
                reason: String::from("ok"),
            },
        )
    }

    #[test]
    fn test_image_info_dimensions() {
        let info = ImageInfo::new("a.png", DynamicImage::new_rgb8(12, 7));
        assert_eq!(info.width, 12);
        assert_eq!(info.height, 7);
        assert_eq!(info.dimensions(), ImageDimensions::new(12, 7));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        let err = ImageInfo::from_bytes("upload.jpg", b"definitely not an image")
            .expect_err("garbage should not decode");
        assert_eq!(err.path, "upload.jpg");
        assert!(!err.reason.is_empty());
    }

    #[test]
    fn test_from_bytes_decodes_png() {
        let mut bytes = Vec::new();
        DynamicImage::new_rgb8(5, 4)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let info = ImageInfo::from_bytes("upload.png", &bytes).expect("png decodes");
        assert_eq!(info.dimensions(), ImageDimensions::new(5, 4));
    }

    #[test]
    fn test_measured_report_json_shape() {
        let json = serde_json::to_value(sample_report(Status::Pass)).unwrap();

        assert_eq!(json["path"], "/data/sample_001.png");
        assert_eq!(json["dimensions"]["width"], 64);
        assert_eq!(json["contrast"]["Lc"], 87.5);
        assert_eq!(json["contrast"]["polarity"], "dark_on_light");
        assert_eq!(json["clarity"]["clarity_score"], 58.4);
        assert_eq!(json["verdict"]["overall"], "pass");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_unreadable_report_json_shape() {
        let report = AnalysisReport::unreadable("broken.jpg", "Cannot read image");
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["error"], "Cannot read image");
        assert!(json.get("contrast").is_none());
        assert!(!report.is_pass());
        assert_eq!(report.overall_status(), Status::Fail);
    }

    #[test]
    fn test_report_roundtrips_through_json() {
        let report = sample_report(Status::Fail);
        let json = serde_json::to_string(&report).unwrap();
        let parsed: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_file_name_strips_directories() {
        assert_eq!(sample_report(Status::Pass).file_name(), "sample_001.png");
        assert_eq!(
            AnalysisReport::unreadable("upload", "x").file_name(),
            "upload"
        );
    }
}
