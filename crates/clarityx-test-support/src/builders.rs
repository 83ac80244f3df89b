//! Synthetic image builders for testing.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use clarityx_adapters::synthetic::draw_text;
use clarityx_core::ImageInfo;
use image::{DynamicImage, ImageFormat, Luma, Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use imageproc::noise::gaussian_noise;

/// Lines rendered by the text builders.
const LINES: [&str; 4] = ["LEGIBLE TEXT", "CLARITY CHECK", "SHARP GLYPHS", "HIGH CONTRAST"];

/// Default canvas for text images.
const TEXT_WIDTH: u32 = 320;
const TEXT_HEIGHT: u32 = 160;
const TEXT_SCALE: u32 = 4;

/// Builder for creating synthetic test images.
///
/// Text images carry four lines of block glyphs, dense enough to give the
/// clarity score full structure and sharpness when rendered crisply.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Text Images ===

    /// Renders the standard text block in `fg` on a `bg` canvas.
    #[must_use]
    pub fn text_on_background(width: u32, height: u32, bg: [u8; 3], fg: [u8; 3]) -> ImageInfo {
        let mut img = RgbImage::from_pixel(width, height, Rgb(bg));
        for (row, line) in (0u32..).zip(LINES) {
            draw_text(&mut img, line, 8, 10 + row * 36, TEXT_SCALE, Rgb(fg));
        }
        ImageInfo::new("synthetic://text", DynamicImage::ImageRgb8(img))
    }

    /// Sharp black text on white. Passes both checks.
    #[must_use]
    pub fn black_on_white() -> ImageInfo {
        Self::text_on_background(TEXT_WIDTH, TEXT_HEIGHT, [255, 255, 255], [0, 0, 0])
    }

    /// Sharp white text on black.
    #[must_use]
    pub fn white_on_black() -> ImageInfo {
        Self::text_on_background(TEXT_WIDTH, TEXT_HEIGHT, [0, 0, 0], [255, 255, 255])
    }

    /// Grey 140 text on grey 128. Fails contrast.
    #[must_use]
    pub fn low_contrast_grey() -> ImageInfo {
        Self::text_on_background(TEXT_WIDTH, TEXT_HEIGHT, [128, 128, 128], [140, 140, 140])
    }

    // === Degradations ===

    /// Gaussian-blurred copy of `info`.
    ///
    /// # Panics
    ///
    /// Panics if `sigma <= 0`.
    #[must_use]
    pub fn blurred(info: &ImageInfo, sigma: f32) -> ImageInfo {
        let img = gaussian_blur_f32(&info.to_rgb8(), sigma);
        ImageInfo::new(info.path.clone(), DynamicImage::ImageRgb8(img))
    }

    /// Copy of `info` with additive Gaussian noise.
    #[must_use]
    pub fn noisy(info: &ImageInfo, stddev: f64, seed: u64) -> ImageInfo {
        let img = gaussian_noise(&info.to_rgb8(), 0.0, stddev, seed);
        ImageInfo::new(info.path.clone(), DynamicImage::ImageRgb8(img))
    }

    // === Plain Images ===

    /// Creates a single-color RGB image (no text at all).
    #[must_use]
    pub fn solid(width: u32, height: u32, color: [u8; 3]) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, Rgb(color));
        ImageInfo::new("synthetic://solid", DynamicImage::ImageRgb8(img))
    }

    /// Creates a high-contrast checkerboard (sharp, but not text-shaped).
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> ImageInfo {
        let cell = cell_size.max(1);
        let img = image::GrayImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        ImageInfo::new("synthetic://checkerboard", DynamicImage::ImageLuma8(img))
    }

    /// Creates a 1x1 pixel image (edge case).
    #[must_use]
    pub fn single_pixel(value: u8) -> ImageInfo {
        Self::solid(1, 1, [value; 3])
    }

    // === Encoding ===

    /// Encodes `info` in `format`.
    ///
    /// # Panics
    ///
    /// Panics if the encoder rejects the image.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn encode(info: &ImageInfo, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        info.image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .expect("synthetic image should encode");
        bytes
    }

    /// Saves `info` as `dir/name`, format taken from the extension.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[allow(clippy::expect_used)]
    pub fn write(dir: &Path, name: &str, info: &ImageInfo) -> PathBuf {
        let path = dir.join(name);
        info.image
            .save(&path)
            .expect("synthetic image should save");
        path
    }
}
