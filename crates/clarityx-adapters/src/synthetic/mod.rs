//! Synthetic text-image dataset.
//!
//! Renders random words onto plain backgrounds with a text color close to
//! the background, then optionally blurs, adds noise or recompresses. The
//! result is a spread of easy and hard legibility cases for batch checks.

mod font;
mod generator;

pub use font::draw_text;
pub use generator::{DatasetGenerator, GeneratedSample, GeneratorConfig};
