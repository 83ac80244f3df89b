//! Generate command - write a synthetic text dataset.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use clarityx_adapters::{DatasetGenerator, GeneratorConfig};
use tracing::info;

/// Arguments for the generate command
#[derive(Args)]
pub struct GenerateArgs {
    /// Directory to write samples into (created if missing)
    pub dir: PathBuf,

    /// Number of images to write
    #[arg(long, default_value_t = 500)]
    pub count: usize,

    /// RNG seed for a reproducible dataset
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Run the generate command.
pub fn run(args: &GenerateArgs) -> Result<()> {
    let config = GeneratorConfig {
        count: args.count,
        seed: args.seed,
        ..GeneratorConfig::default()
    };

    let mut generator = DatasetGenerator::new(config);
    let samples = generator.generate(&args.dir)?;
    info!(samples = samples.len(), "dataset written");

    println!(
        "Wrote {} samples to {} (seed {})",
        samples.len(),
        args.dir.display(),
        generator.seed()
    );
    Ok(())
}
