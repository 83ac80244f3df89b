//! Configuration file support for clarityx.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/clarityx/config.toml` (lowest priority)
//! - Project-local: `.clarityx.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

/// Name of the project-local config file.
const PROJECT_CONFIG: &str = ".clarityx.toml";

/// Output formats accepted in `[output] format`.
const FORMATS: &[&str] = &["csv", "json", "jsonl"];

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Contrast check settings.
    pub contrast: ContrastSection,
    /// Clarity check settings.
    pub clarity: ClaritySection,
    /// Text-region detector settings.
    pub detector: DetectorSection,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
    /// Worker threads (0 = one per CPU).
    pub workers: Option<usize>,
}

/// Contrast check configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ContrastSection {
    /// Minimum |Lc| for a pass.
    pub threshold: Option<f64>,
}

/// Clarity check configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ClaritySection {
    /// Minimum clarity score (0-100) for a pass.
    pub threshold: Option<f64>,
}

/// Stable-region detector configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DetectorSection {
    /// Intensity step over which stability is measured.
    pub delta: Option<u8>,
    /// Smallest region kept, in pixels.
    pub min_area: Option<usize>,
    /// Largest region kept, in pixels.
    pub max_area: Option<usize>,
    /// Largest relative area growth for a stable region.
    pub max_variation: Option<f64>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "csv", "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/clarityx/config.toml`
    /// 2. Project-local: `.clarityx.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.contrast.threshold {
            if !t.is_finite() || t < 0.0 {
                return Err(format!("contrast.threshold must be >= 0, got {t}"));
            }
        }
        if let Some(t) = self.clarity.threshold {
            if !(0.0..=100.0).contains(&t) {
                return Err(format!("clarity.threshold must be 0-100, got {t}"));
            }
        }

        if self.detector.delta == Some(0) {
            return Err(String::from("detector.delta must be at least 1"));
        }
        if let Some(v) = self.detector.max_variation {
            if !v.is_finite() || v <= 0.0 {
                return Err(format!("detector.max_variation must be > 0, got {v}"));
            }
        }
        if let (Some(min), Some(max)) = (self.detector.min_area, self.detector.max_area) {
            if min > max {
                return Err(format!(
                    "detector.min_area ({min}) must not exceed detector.max_area ({max})"
                ));
            }
        }

        if let Some(ref f) = self.output.format {
            if !FORMATS.contains(&f.as_str()) {
                return Err(format!(
                    "output.format must be 'csv', 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    pub fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);
        self.general.workers = other.general.workers.or(self.general.workers);

        self.contrast.threshold = other.contrast.threshold.or(self.contrast.threshold);
        self.clarity.threshold = other.clarity.threshold.or(self.clarity.threshold);

        self.detector.delta = other.detector.delta.or(self.detector.delta);
        self.detector.min_area = other.detector.min_area.or(self.detector.min_area);
        self.detector.max_area = other.detector.max_area.or(self.detector.max_area);
        self.detector.max_variation = other
            .detector
            .max_variation
            .or(self.detector.max_variation);

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("clarityx").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.clarityx.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(PROJECT_CONFIG))
        .find(|path| path.exists())
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
