//! Check command - analyze images for text legibility.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use clarityx_adapters::FsImageSource;
use clarityx_core::modules::{ClarityConfig, ContrastConfig, MserConfig};
use clarityx_core::{BatchRunner, BatchSummary, ImageSource, LegibilityAnalyzer, LegibilityConfig};
use tracing::{debug, info};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{open_writer, CsvOutput, JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One row per image with a fixed header
    #[default]
    Csv,
    /// Single JSON array
    Json,
    /// JSON Lines (one JSON object per line)
    Jsonl,
}

impl OutputFormat {
    fn from_config(name: &str) -> Option<Self> {
        match name {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "jsonl" => Some(Self::Jsonl),
            _ => None,
        }
    }
}

/// Parse a contrast threshold (non-negative Lc).
fn parse_contrast_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(format!("{value} is not a non-negative number"))
    }
}

/// Parse a clarity threshold (0-100).
fn parse_clarity_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0..=100"))
    }
}

/// Shared arguments for image analysis.
#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Files or directories to analyze
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Output format [default: csv]
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Minimum |Lc| for the contrast check [default: 25]
    #[arg(long, value_parser = parse_contrast_threshold)]
    pub contrast_threshold: Option<f64>,

    /// Minimum clarity score (0-100) [default: 30]
    #[arg(long, value_parser = parse_clarity_threshold)]
    pub clarity_threshold: Option<f64>,

    /// Worker threads (0 = one per CPU)
    #[arg(long, value_name = "N")]
    pub workers: Option<usize>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress and summary output
    #[arg(short, long)]
    pub quiet: bool,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl CheckArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Library defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }
        args.workers = args.workers.or(config.general.workers);

        args.contrast_threshold = args.contrast_threshold.or(config.contrast.threshold);
        args.clarity_threshold = args.clarity_threshold.or(config.clarity.threshold);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_config);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        // Detector parameters have no flags; they are read in `legibility_config`
        args.config = Some(config.clone());

        args
    }

    /// Get output format with fallback to CSV.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }

    /// Get worker count; 0 picks one per CPU.
    fn workers(&self) -> usize {
        self.workers.unwrap_or(0)
    }

    /// Builds analyzer settings from merged args and config.
    fn legibility_config(&self) -> LegibilityConfig {
        let contrast_defaults = ContrastConfig::default();
        let clarity_defaults = ClarityConfig::default();
        let detector_defaults = MserConfig::default();
        let detector = self.config.as_ref().map(|c| &c.detector);

        LegibilityConfig {
            contrast: ContrastConfig {
                threshold: self
                    .contrast_threshold
                    .unwrap_or(contrast_defaults.threshold),
                ..contrast_defaults
            },
            clarity: ClarityConfig {
                threshold: self.clarity_threshold.unwrap_or(clarity_defaults.threshold),
                ..clarity_defaults
            },
            detector: MserConfig {
                delta: detector
                    .and_then(|d| d.delta)
                    .unwrap_or(detector_defaults.delta),
                min_area: detector
                    .and_then(|d| d.min_area)
                    .unwrap_or(detector_defaults.min_area),
                max_area: detector
                    .and_then(|d| d.max_area)
                    .unwrap_or(detector_defaults.max_area),
                max_variation: detector
                    .and_then(|d| d.max_variation)
                    .unwrap_or(detector_defaults.max_variation),
            },
        }
    }
}

/// Result of running the check command.
#[allow(dead_code)] // Summary exposed for programmatic use
pub struct CheckResult {
    /// Batch totals.
    pub summary: BatchSummary,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the check command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &CheckArgs) -> Result<CheckResult> {
    info!("Running check command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let writer = open_writer(args.output.as_deref())?;
    let format = args.format();
    debug!(?format, output = ?args.output, "opening report");

    let analyzer = LegibilityAnalyzer::new(args.legibility_config());
    let runner = BatchRunner::new(args.workers());

    let summary = match format {
        OutputFormat::Csv => {
            let output = CsvOutput::new(writer)?;
            runner.run(&source, &analyzer, &output, &progress_bar)?
        }
        OutputFormat::Json => {
            let output = JsonOutput::array(writer, args.pretty);
            runner.run(&source, &analyzer, &output, &progress_bar)?
        }
        OutputFormat::Jsonl => {
            let output = JsonOutput::lines(writer);
            runner.run(&source, &analyzer, &output, &progress_bar)?
        }
    };

    let exit_code = if summary.all_passed() {
        ExitCode::Success
    } else {
        ExitCode::ChecksFailed
    };

    Ok(CheckResult { summary, exit_code })
}
