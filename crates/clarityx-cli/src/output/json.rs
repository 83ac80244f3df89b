//! JSON output adapter.

use std::io::Write;
use std::sync::Mutex;

use anyhow::Result;
use clarityx_core::{AnalysisReport, ResultOutput};

struct State {
    writer: Box<dyn Write + Send>,
    /// Reports held back for the array form; `None` streams lines.
    pending: Option<Vec<AnalysisReport>>,
}

/// JSON output adapter, either one object per line or a single array.
pub struct JsonOutput {
    state: Mutex<State>,
    pretty: bool,
}

impl JsonOutput {
    /// JSON Lines: each report is written as soon as it arrives.
    #[must_use]
    pub fn lines(writer: Box<dyn Write + Send>) -> Self {
        Self {
            state: Mutex::new(State {
                writer,
                pending: None,
            }),
            pretty: false,
        }
    }

    /// JSON array: reports are collected and written on flush.
    #[must_use]
    pub fn array(writer: Box<dyn Write + Send>, pretty: bool) -> Self {
        Self {
            state: Mutex::new(State {
                writer,
                pending: Some(Vec::new()),
            }),
            pretty,
        }
    }
}

impl ResultOutput for JsonOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, report: &AnalysisReport) -> Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        let state = &mut *guard;
        match &mut state.pending {
            Some(pending) => pending.push(report.clone()),
            None => {
                let json = serde_json::to_string(report)?;
                writeln!(state.writer, "{json}")?;
            }
        }
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        let state = &mut *guard;
        if let Some(reports) = state.pending.take() {
            let json = if self.pretty {
                serde_json::to_string_pretty(&reports)?
            } else {
                serde_json::to_string(&reports)?
            };
            writeln!(state.writer, "{json}")?;
        }
        state.writer.flush()?;
        Ok(())
    }
}
