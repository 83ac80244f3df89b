//! Core domain types for legibility analysis.

mod detector;
mod error;
mod mask;
mod measurement;
mod record;
mod result;

pub use detector::TextRegionDetector;
pub use error::{AnalysisError, UnreadableImage};
pub use mask::RegionMask;
pub use measurement::{ClarityResult, ContrastResult, Polarity, Status, Verdict};
pub use record::ReportRecord;
pub use result::{AnalysisOutcome, AnalysisReport, ImageDimensions, ImageInfo};
