//! Mock implementations of core port traits.

use std::sync::{Arc, Mutex, PoisonError};

use clarityx_core::ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
use clarityx_core::{AnalysisReport, BatchSummary, ImageInfo, UnreadableImage};

/// Mock implementation of `ImageSource` for testing.
///
/// Serves pre-built images, optionally mixed with entries that fail to
/// load, and counts loads for assertions.
pub struct MockImageSource {
    items: Vec<Result<ImageInfo, UnreadableImage>>,
    load_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            items: images.into_iter().map(Ok).collect(),
            load_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an entry that fails to load with `reason`.
    #[must_use]
    pub fn with_unreadable(mut self, path: &str, reason: &str) -> Self {
        self.items.push(Err(UnreadableImage::new(path, reason)));
        self
    }

    /// Returns the number of `load()` calls so far.
    #[must_use]
    pub fn load_count(&self) -> usize {
        *self
            .load_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn entries(&self) -> Vec<String> {
        (0..self.items.len()).map(|i| i.to_string()).collect()
    }

    fn load(&self, entry: &str) -> Result<ImageInfo, UnreadableImage> {
        *self
            .load_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;

        entry
            .parse::<usize>()
            .ok()
            .and_then(|i| self.items.get(i))
            .cloned()
            .unwrap_or_else(|| Err(UnreadableImage::new(entry, "no such mock entry")))
    }
}

/// Mock implementation of `ResultOutput` for testing.
///
/// Captures reports for later assertions.
pub struct MockResultOutput {
    reports: Arc<Mutex<Vec<AnalysisReport>>>,
    flush_count: Arc<Mutex<usize>>,
}

impl MockResultOutput {
    /// Creates a new mock output.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reports: Arc::new(Mutex::new(Vec::new())),
            flush_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Returns all captured reports.
    #[must_use]
    pub fn reports(&self) -> Vec<AnalysisReport> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the paths of captured reports, in write order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.reports().into_iter().map(|r| r.path).collect()
    }

    /// Returns the number of times `flush()` was called.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockResultOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultOutput for MockResultOutput {
    fn write(&self, report: &AnalysisReport) -> anyhow::Result<()> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(report.clone());
        Ok(())
    }

    fn flush(&self) -> anyhow::Result<()> {
        *self
            .flush_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Completed` events.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Completed { .. }))
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Returns whether a `Finished` event was received.
    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.finished_summary().is_some()
    }

    /// Returns the summary from the `Finished` event, if any.
    #[must_use]
    pub fn finished_summary(&self) -> Option<BatchSummary> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { summary } => Some(*summary),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| pred(*e))
            .count()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_image_source_empty() {
        let source = MockImageSource::empty();
        assert_eq!(source.count_hint(), Some(0));
        assert_eq!(source.images().count(), 0);
        assert_eq!(source.load_count(), 0);
    }

    #[test]
    fn test_mock_image_source_with_unreadable() {
        let info = ImageInfo::new("test.jpg", image::DynamicImage::new_rgb8(10, 10));
        let source = MockImageSource::new(vec![info]).with_unreadable("bad.jpg", "truncated");

        let loaded: Vec<_> = source.images().collect();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].as_ref().unwrap().path, "test.jpg");
        assert_eq!(loaded[1].as_ref().unwrap_err().path, "bad.jpg");
        assert_eq!(source.load_count(), 2);
    }

    #[test]
    fn test_mock_result_output() {
        let output = MockResultOutput::new();

        output
            .write(&AnalysisReport::unreadable("test.jpg", "x"))
            .unwrap();
        output.flush().unwrap();

        assert_eq!(output.paths(), vec!["test.jpg"]);
        assert_eq!(output.flush_count(), 1);
    }

    #[test]
    fn test_mock_progress_sink() {
        let sink = MockProgressSink::new();

        sink.on_event(ProgressEvent::Started {
            path: "test.jpg".into(),
            index: 0,
            total: Some(1),
        });
        sink.on_event(ProgressEvent::Finished {
            summary: BatchSummary {
                processed: 1,
                ..BatchSummary::default()
            },
        });

        assert_eq!(sink.started_count(), 1);
        assert!(sink.has_finished());
        assert_eq!(sink.finished_summary().map(|s| s.processed), Some(1));
    }
}
