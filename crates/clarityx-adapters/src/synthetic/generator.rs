//! Synthetic dataset generation.

use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::filter::gaussian_blur_f32;
use imageproc::noise::gaussian_noise;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::font::draw_text;

/// Words rendered onto samples.
const TEXTS: &[&str] = &[
    "CLARITYX",
    "ACCESSIBILITY",
    "CONTRAST",
    "LEGIBILITY",
    "PERCEPTION",
    "READABILITY",
    "AI VISION",
    "DYNAMIC RANGE",
    "TEXT VISIBILITY",
];

/// Background colors: white, black, mid grey, dark grey, lavender, light grey, near black.
const BACKGROUNDS: &[[u8; 3]] = &[
    [255, 255, 255],
    [0, 0, 0],
    [120, 120, 120],
    [30, 30, 30],
    [200, 200, 240],
    [230, 230, 230],
    [15, 15, 15],
];

/// Quality used when writing the final file.
const OUTPUT_QUALITY: u8 = 95;

/// Configuration for the dataset generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Number of samples to write.
    pub count: usize,
    /// RNG seed. A random seed is drawn (and logged) when absent.
    pub seed: Option<u64>,
    /// Range of glyph cell sizes in pixels.
    pub scale: RangeInclusive<u32>,
    /// Maximum per-channel shift between background and text color.
    pub max_color_shift: i16,
    /// Probability of a Gaussian blur.
    pub blur_probability: f64,
    /// Range of blur sigmas.
    pub blur_sigma: RangeInclusive<f32>,
    /// Probability of additive Gaussian noise.
    pub noise_probability: f64,
    /// Standard deviation of the added noise.
    pub noise_stddev: f64,
    /// Probability of a low-quality JPEG round trip.
    pub jpeg_probability: f64,
    /// Range of JPEG qualities for the round trip.
    pub jpeg_quality: RangeInclusive<u8>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 256,
            count: 500,
            seed: None,
            scale: 3..=12,
            max_color_shift: 60,
            blur_probability: 0.4,
            blur_sigma: 0.5..=3.0,
            noise_probability: 0.3,
            noise_stddev: 25.0,
            jpeg_probability: 0.3,
            jpeg_quality: 20..=70,
        }
    }
}

/// Parameters a sample was rendered with.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSample {
    /// Where the sample was written (empty for in-memory samples).
    pub path: PathBuf,
    /// Rendered text.
    pub text: String,
    /// Background color.
    pub background: [u8; 3],
    /// Text color.
    pub text_color: [u8; 3],
    /// Glyph cell size in pixels.
    pub scale: u32,
    /// Blur sigma, if blurred.
    pub blur_sigma: Option<f32>,
    /// Whether noise was added.
    pub noisy: bool,
    /// JPEG round-trip quality, if compressed.
    pub jpeg_quality: Option<u8>,
}

/// Renders random text samples with optional degradations.
pub struct DatasetGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    seed: u64,
}

impl DatasetGenerator {
    /// Creates a generator.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed in use, for reproducing a run.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Renders one sample in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the JPEG round trip fails.
    pub fn render(&mut self) -> Result<(RgbImage, GeneratedSample)> {
        let cfg = &self.config;
        let rng = &mut self.rng;

        let background = BACKGROUNDS.choose(rng).copied().unwrap_or([255, 255, 255]);
        let text = TEXTS.choose(rng).copied().unwrap_or("CLARITYX");
        let scale = rng.random_range(cfg.scale.clone());
        let shift = rng.random_range(-cfg.max_color_shift..=cfg.max_color_shift);
        let text_color = background.map(|c| shift_channel(c, shift));
        let x = rng.random_range(20..=120);
        let y = rng.random_range(60..=160);

        let mut img = RgbImage::from_pixel(cfg.width, cfg.height, Rgb(background));
        draw_text(&mut img, text, x, y, scale, Rgb(text_color));

        let blur_sigma = if rng.random_bool(cfg.blur_probability) {
            let sigma = rng.random_range(cfg.blur_sigma.clone());
            img = gaussian_blur_f32(&img, sigma);
            Some(sigma)
        } else {
            None
        };

        let noisy = rng.random_bool(cfg.noise_probability);
        if noisy {
            img = gaussian_noise(&img, 0.0, cfg.noise_stddev, rng.random());
        }

        let jpeg_quality = if rng.random_bool(cfg.jpeg_probability) {
            let quality = rng.random_range(cfg.jpeg_quality.clone());
            img = jpeg_round_trip(&img, quality)?;
            Some(quality)
        } else {
            None
        };

        let sample = GeneratedSample {
            path: PathBuf::new(),
            text: text.to_string(),
            background,
            text_color,
            scale,
            blur_sigma,
            noisy,
            jpeg_quality,
        };
        Ok((img, sample))
    }

    /// Writes `count` samples named `sample_NNN.jpg` into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a file cannot be written.
    pub fn generate(&mut self, dir: &Path) -> Result<Vec<GeneratedSample>> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        info!(count = self.config.count, seed = self.seed, dir = %dir.display(), "generating dataset");

        let mut samples = Vec::with_capacity(self.config.count);
        for i in 0..self.config.count {
            let (img, mut sample) = self.render()?;
            let path = dir.join(format!("sample_{i:03}.jpg"));
            write_jpeg(&img, &path, OUTPUT_QUALITY)?;
            debug!(
                path = %path.display(),
                text = %sample.text,
                blur = ?sample.blur_sigma,
                noisy = sample.noisy,
                jpeg = ?sample.jpeg_quality,
                "wrote sample"
            );
            sample.path = path;
            samples.push(sample);
        }

        Ok(samples)
    }
}

fn shift_channel(value: u8, shift: i16) -> u8 {
    u8::try_from((i16::from(value) + shift).clamp(0, 255)).unwrap_or(u8::MAX)
}

fn jpeg_round_trip(img: &RgbImage, quality: u8) -> Result<RgbImage> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(Cursor::new(&mut bytes), quality)
        .encode_image(img)
        .context("Failed to encode JPEG")?;
    let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg)
        .context("Failed to decode JPEG")?;
    Ok(decoded.to_rgb8())
}

fn write_jpeg(img: &RgbImage, path: &Path, quality: u8) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    JpegEncoder::new_with_quality(BufWriter::new(file), quality)
        .encode_image(img)
        .with_context(|| format!("Failed to write {}", path.display()))
}
