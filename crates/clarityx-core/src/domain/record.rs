//! Flat per-image record for tabular reporting.

use serde::{Deserialize, Serialize};

use super::{AnalysisReport, Status};

/// One row of a batch report.
///
/// Measurement columns are empty for images that could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// File name of the analyzed image.
    pub file: String,
    /// Signed contrast (Lc).
    #[serde(rename = "contrast_Lc")]
    pub contrast_lc: Option<f64>,
    /// Contrast check status.
    pub contrast_status: Option<Status>,
    /// Clarity score in [0, 100].
    pub clarity_score: Option<f64>,
    /// Clarity check status.
    pub clarity_status: Option<Status>,
    /// Pass only when both checks passed.
    pub overall_status: Status,
}

impl ReportRecord {
    /// Column names, in output order.
    pub const HEADER: [&'static str; 6] = [
        "file",
        "contrast_Lc",
        "contrast_status",
        "clarity_score",
        "clarity_status",
        "overall_status",
    ];

    /// Flattens a full report.
    #[must_use]
    pub fn from_report(report: &AnalysisReport) -> Self {
        let contrast = report.contrast();
        let clarity = report.clarity();
        Self {
            file: report.file_name(),
            contrast_lc: contrast.map(|c| c.signed_contrast),
            contrast_status: contrast.map(|c| c.status),
            clarity_score: clarity.map(|c| c.clarity_score),
            clarity_status: clarity.map(|c| c.status),
            overall_status: report.overall_status(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{
        ClarityResult, ContrastResult, ImageDimensions, Polarity, Verdict,
    };

    #[test]
    fn test_record_from_measured_report() {
        let report = AnalysisReport::measured(
            "dataset/sample_007.jpg",
            ImageDimensions::new(512, 256),
            ContrastResult {
                signed_contrast: -41.23,
                polarity: Some(Polarity::LightOnDark),
                status: Status::Pass,
            },
            ClarityResult {
                sharpness_raw: 20.0,
                edge_ratio: 0.01,
                noise_level: 0.0,
                clarity_score: 3.33,
                status: Status::Fail,
            },
            Verdict {
                overall: Status::Fail,
                reason: String::from("Low clarity (score=3.33)"),
            },
        );

        let record = report.record();
        assert_eq!(record.file, "sample_007.jpg");
        assert_eq!(record.contrast_lc, Some(-41.23));
        assert_eq!(record.contrast_status, Some(Status::Pass));
        assert_eq!(record.clarity_score, Some(3.33));
        assert_eq!(record.clarity_status, Some(Status::Fail));
        assert_eq!(record.overall_status, Status::Fail);
    }

    #[test]
    fn test_record_from_unreadable_report() {
        let record = AnalysisReport::unreadable("x/broken.png", "truncated").record();

        assert_eq!(record.file, "broken.png");
        assert!(record.contrast_lc.is_none());
        assert!(record.contrast_status.is_none());
        assert!(record.clarity_score.is_none());
        assert!(record.clarity_status.is_none());
        assert_eq!(record.overall_status, Status::Fail);
    }

    #[test]
    fn test_record_field_names_match_header() {
        let record = AnalysisReport::unreadable("a.png", "x").record();
        let json = serde_json::to_value(record).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), ReportRecord::HEADER.len());
        for column in ReportRecord::HEADER {
            assert!(object.contains_key(column), "missing column {column}");
        }
    }
}
