//! Text-region detection from stable blobs.
//!
//! Glyphs tend to be small, locally stable blobs that contrast with a more
//! uniform background. Each stable region is replaced by its convex hull so
//! that anti-aliased glyph interiors end up in the foreground partition.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;
use imageproc::geometry::convex_hull;
use imageproc::point::Point;
use tracing::debug;

use super::mser::{extract_regions, MserConfig};
use crate::domain::{RegionMask, TextRegionDetector};

/// Detector that fills the convex hulls of stable regions.
#[derive(Debug, Clone, Default)]
pub struct MserTextDetector {
    config: MserConfig,
}

impl MserTextDetector {
    /// Creates a detector with the given extraction parameters.
    #[must_use]
    pub const fn new(config: MserConfig) -> Self {
        Self { config }
    }

    /// Returns the extraction parameters.
    #[must_use]
    pub const fn config(&self) -> &MserConfig {
        &self.config
    }
}

impl TextRegionDetector for MserTextDetector {
    fn name(&self) -> &'static str {
        "mser"
    }

    fn detect(&self, gray: &GrayImage) -> RegionMask {
        let (width, height) = gray.dimensions();
        let mut mask = RegionMask::new(width, height);

        let regions = extract_regions(gray, &self.config);
        for region in regions {
            fill_hull(&mut mask, region);
        }

        debug!(
            foreground = mask.foreground_count(),
            background = mask.background_count(),
            "text mask built"
        );
        mask
    }
}

#[allow(clippy::cast_sign_loss)]
fn fill_hull(mask: &mut RegionMask, region: Vec<Point<i32>>) {
    let hull = convex_hull(region.as_slice());
    if hull.len() >= 3 {
        draw_polygon_mut(mask.as_image_mut(), &hull, Luma([255u8]));
    } else {
        for p in region {
            mask.set_foreground(p.x as u32, p.y as u32);
        }
    }
}
