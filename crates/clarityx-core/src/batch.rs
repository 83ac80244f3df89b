//! Parallel batch analysis with an ordered result sink.
//!
//! Workers claim entries from a shared counter and send their reports over
//! a channel. The calling thread is the only writer: it buffers reports that
//! arrive early and writes them in input order.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use tracing::{debug, info, warn};

use crate::analyzer::LegibilityAnalyzer;
use crate::domain::AnalysisReport;
use crate::ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};

/// Totals and averages for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BatchSummary {
    /// Images that were measured.
    pub processed: usize,
    /// Images that could not be read or analyzed.
    pub skipped: usize,
    /// Measured images that passed.
    pub passed: usize,
    /// Measured images that failed.
    pub failed: usize,
    /// Mean signed contrast over measured images.
    pub mean_contrast: Option<f64>,
    /// Mean clarity score over measured images.
    pub mean_clarity: Option<f64>,
}

impl BatchSummary {
    /// Number of images seen, measured or not.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.processed + self.skipped
    }

    /// Share of all images that passed, in [0, 1]. `None` for an empty batch.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn pass_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.passed as f64 / total as f64)
    }

    /// Whether every image was measured and passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}

#[derive(Default)]
struct SummaryBuilder {
    summary: BatchSummary,
    contrast_sum: f64,
    clarity_sum: f64,
}

impl SummaryBuilder {
    fn record(&mut self, report: &AnalysisReport) {
        match (report.contrast(), report.clarity()) {
            (Some(contrast), Some(clarity)) => {
                self.summary.processed += 1;
                self.contrast_sum += contrast.signed_contrast;
                self.clarity_sum += clarity.clarity_score;
                if report.is_pass() {
                    self.summary.passed += 1;
                } else {
                    self.summary.failed += 1;
                }
            }
            _ => self.summary.skipped += 1,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self) -> BatchSummary {
        let n = self.summary.processed;
        let mean = |sum: f64| (n > 0).then(|| sum / n as f64);
        BatchSummary {
            mean_contrast: mean(self.contrast_sum),
            mean_clarity: mean(self.clarity_sum),
            ..self.summary
        }
    }
}

enum Outcome {
    Analyzed(AnalysisReport),
    Skipped { report: AnalysisReport, reason: String },
}

impl Outcome {
    const fn report(&self) -> &AnalysisReport {
        match self {
            Self::Analyzed(report) | Self::Skipped { report, .. } => report,
        }
    }
}

enum WorkerMessage {
    Started { index: usize, path: String },
    Finished { index: usize, outcome: Outcome },
}

/// Runs the analyzer over every image of a source.
#[derive(Debug, Clone, Copy)]
pub struct BatchRunner {
    workers: usize,
}

impl BatchRunner {
    /// Creates a runner. `0` workers means one per available CPU.
    #[must_use]
    pub const fn new(workers: usize) -> Self {
        Self { workers }
    }

    /// Number of worker threads this runner will use.
    #[must_use]
    pub fn workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            thread::available_parallelism().map_or(1, NonZeroUsize::get)
        }
    }

    /// Analyzes every entry of `source`, writing reports to `output` in
    /// source order.
    ///
    /// Unreadable images get an error report and the batch continues.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing the output fails.
    pub fn run(
        &self,
        source: &dyn ImageSource,
        analyzer: &LegibilityAnalyzer,
        output: &dyn ResultOutput,
        progress: &dyn ProgressSink,
    ) -> anyhow::Result<BatchSummary> {
        let entries = source.entries();
        let total = entries.len();
        let workers = self.workers().min(total).max(1);
        info!(images = total, workers, "starting batch");

        let next = AtomicUsize::new(0);
        let (tx, rx) = mpsc::channel::<WorkerMessage>();
        let mut builder = SummaryBuilder::default();

        thread::scope(|scope| -> anyhow::Result<()> {
            for _ in 0..workers {
                let tx = tx.clone();
                let next = &next;
                let entries = &entries;
                scope.spawn(move || loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(entry) = entries.get(index) else {
                        break;
                    };
                    let started = WorkerMessage::Started {
                        index,
                        path: entry.clone(),
                    };
                    if tx.send(started).is_err() {
                        break;
                    }
                    let outcome = analyze_entry(source, analyzer, entry);
                    if tx.send(WorkerMessage::Finished { index, outcome }).is_err() {
                        break;
                    }
                });
            }
            drop(tx);

            let mut pending = BTreeMap::new();
            let mut next_to_write = 0;
            for message in rx {
                match message {
                    WorkerMessage::Started { index, path } => {
                        progress.on_event(ProgressEvent::Started {
                            path,
                            index,
                            total: Some(total),
                        });
                    }
                    WorkerMessage::Finished { index, outcome } => {
                        pending.insert(index, outcome);
                        while let Some(outcome) = pending.remove(&next_to_write) {
                            output.write(outcome.report())?;
                            builder.record(outcome.report());
                            emit_outcome(progress, outcome);
                            next_to_write += 1;
                        }
                    }
                }
            }
            Ok(())
        })?;

        output.flush()?;

        let summary = builder.finish();
        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            passed = summary.passed,
            failed = summary.failed,
            "batch finished"
        );
        progress.on_event(ProgressEvent::Finished { summary });
        Ok(summary)
    }
}

fn analyze_entry(source: &dyn ImageSource, analyzer: &LegibilityAnalyzer, entry: &str) -> Outcome {
    let image = match source.load(entry) {
        Ok(image) => image,
        Err(e) => {
            warn!(path = %e.path, reason = %e.reason, "skipping unreadable image");
            return Outcome::Skipped {
                report: AnalysisReport::from_unreadable(&e),
                reason: e.reason,
            };
        }
    };

    match analyzer.analyze(&image) {
        Ok(report) => {
            debug!(path = entry, overall = %report.overall_status(), "image analyzed");
            Outcome::Analyzed(report)
        }
        Err(e) => {
            warn!(path = entry, error = %e, "analysis failed");
            Outcome::Skipped {
                report: AnalysisReport::unreadable(entry, &e),
                reason: e.to_string(),
            }
        }
    }
}

fn emit_outcome(progress: &dyn ProgressSink, outcome: Outcome) {
    match outcome {
        Outcome::Analyzed(report) => progress.on_event(ProgressEvent::Completed {
            report: Box::new(report),
        }),
        Outcome::Skipped { report, reason } => progress.on_event(ProgressEvent::Skipped {
            path: report.path,
            reason,
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use image::{DynamicImage, Rgb, RgbImage};

    use crate::domain::{ImageInfo, UnreadableImage};

    /// Entries named `bad*` fail to load; the rest are solid images.
    struct Source(Vec<&'static str>);

    impl ImageSource for Source {
        fn entries(&self) -> Vec<String> {
            self.0.iter().map(ToString::to_string).collect()
        }

        fn load(&self, entry: &str) -> Result<ImageInfo, UnreadableImage> {
            if entry.starts_with("bad") {
                return Err(UnreadableImage::new(entry, "corrupt header"));
            }
            let img = RgbImage::from_pixel(24, 24, Rgb([40, 40, 40]));
            Ok(ImageInfo::new(entry, DynamicImage::ImageRgb8(img)))
        }
    }

    #[derive(Default)]
    struct Collect(Mutex<Vec<String>>);

    impl ResultOutput for Collect {
        fn write(&self, report: &AnalysisReport) -> anyhow::Result<()> {
            self.0.lock().unwrap().push(report.path.clone());
            Ok(())
        }

        fn flush(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Events(Mutex<Vec<ProgressEvent>>);

    impl ProgressSink for Events {
        fn on_event(&self, event: ProgressEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    struct FailingOutput;

    impl ResultOutput for FailingOutput {
        fn write(&self, _report: &AnalysisReport) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }

        fn flush(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_zero_workers_uses_available_parallelism() {
        assert!(BatchRunner::new(0).workers() >= 1);
        assert_eq!(BatchRunner::new(3).workers(), 3);
    }

    #[test]
    fn test_results_in_input_order() {
        let names: Vec<&'static str> = vec![
            "a.png", "b.png", "c.png", "d.png", "e.png", "f.png", "g.png", "h.png",
        ];
        for workers in [1, 2, 5] {
            let output = Collect::default();
            BatchRunner::new(workers)
                .run(
                    &Source(names.clone()),
                    &LegibilityAnalyzer::default(),
                    &output,
                    &Events::default(),
                )
                .unwrap();
            assert_eq!(*output.0.lock().unwrap(), names, "workers = {workers}");
        }
    }

    #[test]
    fn test_unreadable_recorded_and_batch_continues() {
        let output = Collect::default();
        let events = Events::default();
        let summary = BatchRunner::new(2)
            .run(
                &Source(vec!["a.png", "bad.png", "c.png"]),
                &LegibilityAnalyzer::default(),
                &output,
                &events,
            )
            .unwrap();

        assert_eq!(*output.0.lock().unwrap(), vec!["a.png", "bad.png", "c.png"]);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 2);
        assert!(!summary.all_passed());

        let events = events.0.lock().unwrap();
        let skipped: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Skipped { path, reason } => Some((path.clone(), reason.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(skipped, vec![(String::from("bad.png"), String::from("corrupt header"))]);
        assert!(matches!(events.last(), Some(ProgressEvent::Finished { .. })));
    }

    #[test]
    fn test_started_events_carry_total() {
        let events = Events::default();
        BatchRunner::new(1)
            .run(
                &Source(vec!["a.png", "b.png"]),
                &LegibilityAnalyzer::default(),
                &Collect::default(),
                &events,
            )
            .unwrap();

        let started = events
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, ProgressEvent::Started { total: Some(2), .. }))
            .count();
        assert_eq!(started, 2);
    }

    #[test]
    fn test_empty_source() {
        let summary = BatchRunner::new(4)
            .run(
                &Source(Vec::new()),
                &LegibilityAnalyzer::default(),
                &Collect::default(),
                &Events::default(),
            )
            .unwrap();

        assert_eq!(summary.total(), 0);
        assert!(summary.pass_rate().is_none());
        assert!(summary.mean_clarity.is_none());
    }

    #[test]
    fn test_output_error_aborts() {
        let result = BatchRunner::new(2).run(
            &Source(vec!["a.png", "b.png", "c.png"]),
            &LegibilityAnalyzer::default(),
            &FailingOutput,
            &Events::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_means() {
        let summary = BatchRunner::new(2)
            .run(
                &Source(vec!["a.png", "b.png"]),
                &LegibilityAnalyzer::default(),
                &Collect::default(),
                &Events::default(),
            )
            .unwrap();

        // Solid images: no text found, no structure
        assert_eq!(summary.mean_contrast, Some(0.0));
        assert_eq!(summary.mean_clarity, Some(0.0));
        assert_eq!(summary.pass_rate(), Some(0.0));
    }
}
