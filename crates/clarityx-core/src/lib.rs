//! ClarityX Core - Text legibility measurement
//!
//! This crate contains the domain types, ports and analytic modules that
//! decide whether text rendered on an image is legible: text-region
//! detection, perceptual contrast, clarity scoring and the verdict policy.

pub mod analyzer;
pub mod batch;
pub mod domain;
pub mod modules;
pub mod ports;

pub use analyzer::{LegibilityAnalyzer, LegibilityConfig};
pub use batch::{BatchRunner, BatchSummary};
pub use domain::{
    AnalysisError, AnalysisOutcome, AnalysisReport, ClarityResult, ContrastResult,
    ImageDimensions, ImageInfo, Polarity, RegionMask, ReportRecord, Status, TextRegionDetector,
    UnreadableImage, Verdict,
};
pub use ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
