//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CellSnapshotRow, OutputResult, TickSummaryRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors are returned to [`SimOutputObserver`][crate::SimOutputObserver],
/// which keeps the first one for
/// [`take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one batch of cell snapshots (all cells at one step).
    fn write_snapshots(&mut self, rows: &[CellSnapshotRow]) -> OutputResult<()>;

    /// Write one phenotype-step summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
