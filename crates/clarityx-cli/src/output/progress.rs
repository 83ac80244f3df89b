//! Progress bar adapter using indicatif.

use clarityx_core::{BatchSummary, ProgressEvent, ProgressSink};
use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};

/// Progress bar adapter for CLI output.
pub struct ProgressBar {
    bar: Option<IndicatifBar>,
    quiet: bool,
}

impl ProgressBar {
    /// Creates a new progress bar.
    ///
    /// # Arguments
    ///
    /// * `total` - Total number of items, if known
    /// * `quiet` - If true, suppress all output
    /// * `show_bar` - If true, show progress bar; otherwise show per-item status
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        if quiet {
            return Self {
                bar: None,
                quiet: true,
            };
        }

        let bar = show_bar.then(|| {
            let bar = total.map_or_else(IndicatifBar::new_spinner, IndicatifBar::new);
            if let Ok(style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            ) {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar
        });

        Self { bar, quiet }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        if self.quiet {
            return;
        }

        match event {
            ProgressEvent::Started { path, total, .. } => {
                if let Some(bar) = &self.bar {
                    if let Some(t) = total {
                        bar.set_length(t as u64);
                    }
                    bar.set_message(path);
                }
            }
            ProgressEvent::Completed { report } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                } else if let Some(verdict) = report.verdict().filter(|v| !v.overall.is_pass()) {
                    eprintln!("{}: {}", report.path, verdict.reason);
                }
            }
            ProgressEvent::Skipped { path, reason } => {
                if let Some(bar) = &self.bar {
                    bar.inc(1);
                }
                eprintln!("WARN: Skipping {path}: {reason}");
            }
            ProgressEvent::Finished { summary } => {
                if let Some(bar) = &self.bar {
                    bar.finish_and_clear();
                }
                eprintln!("{}", summary_line(&summary));
            }
        }
    }
}

/// One-line batch summary: counts, mean Lc, mean clarity and pass rate.
pub fn summary_line(summary: &BatchSummary) -> String {
    let mean = |value: Option<f64>| value.map_or_else(|| String::from("n/a"), |v| format!("{v:.2}"));
    let pass_rate = summary
        .pass_rate()
        .map_or_else(|| String::from("n/a"), |r| format!("{:.1}%", r * 100.0));

    format!(
        "Done: {} processed, {} skipped, {} passed, {} failed | avg Lc {} | avg clarity {} | pass rate {}",
        summary.processed,
        summary.skipped,
        summary.passed,
        summary.failed,
        mean(summary.mean_contrast),
        mean(summary.mean_clarity),
        pass_rate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line() {
        let summary = BatchSummary {
            processed: 3,
            skipped: 1,
            passed: 2,
            failed: 1,
            mean_contrast: Some(-12.346),
            mean_clarity: Some(41.0),
        };

        assert_eq!(
            summary_line(&summary),
            "Done: 3 processed, 1 skipped, 2 passed, 1 failed | avg Lc -12.35 | avg clarity 41.00 | pass rate 50.0%"
        );
    }

    #[test]
    fn test_summary_line_empty_batch() {
        let line = summary_line(&BatchSummary::default());
        assert!(line.contains("avg Lc n/a"));
        assert!(line.ends_with("pass rate n/a"));
    }
}
