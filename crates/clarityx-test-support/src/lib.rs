//! Test support utilities for clarityx.
//!
//! Provides mocks, synthetic image builders, and utilities for testing
//! the legibility analysis pipeline.
//!
//! # Example
//!
//! ```
//! use clarityx_test_support::{MockImageSource, SyntheticImageBuilder};
//!
//! // Create synthetic test images
//! let readable = SyntheticImageBuilder::black_on_white();
//! let faint = SyntheticImageBuilder::low_contrast_grey();
//!
//! // Create mock image source
//! let source = MockImageSource::new(vec![readable, faint]).with_unreadable("bad.jpg", "truncated");
//! ```

mod builders;
mod mocks;

pub use builders::SyntheticImageBuilder;
pub use mocks::{MockImageSource, MockProgressSink, MockResultOutput};
