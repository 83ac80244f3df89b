//! ClarityX Adapters - External adapters for clarityx.
//!
//! This crate provides adapters for:
//! - Filesystem image source
//! - Synthetic text-image dataset generation

pub mod fs;
pub mod synthetic;

pub use fs::FsImageSource;
pub use synthetic::{DatasetGenerator, GeneratedSample, GeneratorConfig};
