//! Binary foreground/background mask produced by text-region detection.

use image::{GrayImage, Luma};

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// Binary partition of an image into text (foreground) and background pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMask {
    mask: GrayImage,
}

impl RegionMask {
    /// Creates an all-background mask.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mask: GrayImage::from_pixel(width, height, Luma([BACKGROUND])),
        }
    }

    /// Builds a mask from a grayscale buffer. Any non-zero pixel is foreground.
    #[must_use]
    pub fn from_gray(mut mask: GrayImage) -> Self {
        for pixel in mask.pixels_mut() {
            if pixel.0[0] != BACKGROUND {
                pixel.0[0] = FOREGROUND;
            }
        }
        Self { mask }
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    /// Returns `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }

    /// Whether the pixel at `(x, y)` is labelled as text.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[must_use]
    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.mask.get_pixel(x, y).0[0] == FOREGROUND
    }

    /// Labels the pixel at `(x, y)` as text. Out-of-bounds writes are ignored.
    pub fn set_foreground(&mut self, x: u32, y: u32) {
        if x < self.mask.width() && y < self.mask.height() {
            self.mask.put_pixel(x, y, Luma([FOREGROUND]));
        }
    }

    /// Number of foreground pixels.
    #[must_use]
    pub fn foreground_count(&self) -> usize {
        self.mask
            .as_raw()
            .iter()
            .filter(|&&v| v == FOREGROUND)
            .count()
    }

    /// Number of background pixels.
    #[must_use]
    pub fn background_count(&self) -> usize {
        self.mask.as_raw().len() - self.foreground_count()
    }

    /// Underlying 0/255 buffer.
    #[must_use]
    pub const fn as_image(&self) -> &GrayImage {
        &self.mask
    }

    pub(crate) fn as_image_mut(&mut self) -> &mut GrayImage {
        &mut self.mask
    }
}
