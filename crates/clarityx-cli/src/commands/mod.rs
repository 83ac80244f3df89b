//! CLI command definitions and handlers.

pub mod check;
pub mod generate;

use clap::{Parser, Subcommand};

/// ClarityX - Text legibility checks for images
#[derive(Parser)]
#[command(name = "clarityx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared check arguments (paths, thresholds, flags).
    #[command(flatten)]
    pub check: check::CheckArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze images for text legibility
    Check(check::CheckArgs),
    /// Write a synthetic text dataset
    Generate(generate::GenerateArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every image passed.
    Success,
    /// At least one image failed or could not be read.
    ChecksFailed,
    /// Bad arguments or I/O failure.
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::SUCCESS,
            ExitCode::ChecksFailed => Self::from(1),
            ExitCode::Error => Self::from(2),
        }
    }
}
