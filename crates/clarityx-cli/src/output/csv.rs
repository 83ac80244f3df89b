//! CSV output adapter.

use std::io::Write;
use std::sync::Mutex;

use anyhow::Result;
use clarityx_core::{AnalysisReport, ReportRecord, ResultOutput};

/// Tabular report with one row per image.
///
/// The header is written on creation, so an empty batch still yields a
/// well-formed file.
pub struct CsvOutput {
    writer: Mutex<csv::Writer<Box<dyn Write + Send>>>,
}

impl CsvOutput {
    /// Creates a CSV output and writes the header row.
    pub fn new(writer: Box<dyn Write + Send>) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        writer.write_record(ReportRecord::HEADER)?;
        Ok(Self {
            writer: Mutex::new(writer),
        })
    }
}

impl ResultOutput for CsvOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, report: &AnalysisReport) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.serialize(report.record())?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
