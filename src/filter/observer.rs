//! Batch observer: hooks for logging, profiling, and debugging.
//!
//! Observers are told when a batch starts, after each row, and when the
//! batch ends, without coupling to filter logic.

use std::time::{Duration, Instant};

use serde::Serialize;

/// Measures the wall-clock time of one batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchClock {
    started: Instant,
}

impl BatchClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Counters for one filter batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Filter name (e.g. `"pos_tagging"`).
    pub filter: String,
    pub rows: usize,
    pub attributes: usize,
    /// Attributes inside the resolved range.
    pub selected_attributes: usize,
    /// Cells whose value was rewritten.
    pub cells_changed: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

impl BatchReport {
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            ..Self::default()
        }
    }

    pub fn attributes(mut self, total: usize, selected: usize) -> Self {
        self.attributes = total;
        self.selected_attributes = selected;
        self
    }
}

/// Receives notifications while a batch runs.
///
/// All hooks default to doing nothing.
pub trait FilterObserver {
    fn on_batch_start(&mut self, _report: &BatchReport) {}

    /// Called after row `row` was processed; `changed` counts its rewritten cells.
    fn on_row(&mut self, _row: usize, _changed: usize) {}

    fn on_batch_end(&mut self, _report: &BatchReport) {}
}

/// Ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FilterObserver for NoopObserver {}

/// Logs batch boundaries with `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl FilterObserver for TracingObserver {
    fn on_batch_start(&mut self, report: &BatchReport) {
        tracing::info!(
            filter = %report.filter,
            attributes = report.attributes,
            selected = report.selected_attributes,
            "batch started"
        );
    }

    fn on_row(&mut self, row: usize, changed: usize) {
        tracing::trace!(row, changed, "row processed");
    }

    fn on_batch_end(&mut self, report: &BatchReport) {
        tracing::info!(
            filter = %report.filter,
            rows = report.rows,
            cells_changed = report.cells_changed,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "batch finished"
        );
    }
}

/// Keeps every report it sees.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub started: Vec<BatchReport>,
    pub rows: Vec<(usize, usize)>,
    pub finished: Vec<BatchReport>,
}

impl FilterObserver for RecordingObserver {
    fn on_batch_start(&mut self, report: &BatchReport) {
        self.started.push(report.clone());
    }

    fn on_row(&mut self, row: usize, changed: usize) {
        self.rows.push((row, changed));
    }

    fn on_batch_end(&mut self, report: &BatchReport) {
        self.finished.push(report.clone());
    }
}
