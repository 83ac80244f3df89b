//! Output formatting for CLI.

mod csv;
mod json;
mod progress;

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::progress::ProgressBar;

/// Opens the report destination: `path` if given, stdout otherwise.
pub fn open_writer(path: Option<&Path>) -> Result<Box<dyn Write + Send>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}
