//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::{debug, warn};

use mc_core::SimClock;
use mc_population::Population;
use mc_sim::{RunSummary, SimObserver, StepCounts};

use crate::row::{CellSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes cell snapshots and phenotype-step summaries
/// to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    last_snapshot_step: Option<u64>,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_snapshot_step: None, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// One row per cell.  A save and a snapshot at the same step write once.
    fn write_population(&mut self, clock: &SimClock, population: &Population) {
        if self.last_snapshot_step == Some(clock.step) {
            return;
        }
        self.last_snapshot_step = Some(clock.step);

        let rows: Vec<CellSnapshotRow> = population
            .iter()
            .map(|(_, cell)| CellSnapshotRow::from_cell(clock.step, clock.time, cell))
            .collect();
        if !rows.is_empty() {
            debug!(step = clock.step, rows = rows.len(), "writing cell snapshot");
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                warn!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_phenotype_step(&mut self, clock: &SimClock, counts: &StepCounts, population: &Population) {
        let tallies = population.counts();
        let row = TickSummaryRow {
            step:          clock.step,
            time:          clock.time,
            live:          tallies.live as u64,
            dead:          tallies.dead as u64,
            out_of_domain: tallies.out_of_domain as u64,
            divisions:     counts.divisions as u64,
            removals:      counts.removals as u64,
            deaths:        counts.deaths as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_save(&mut self, clock: &SimClock, population: &Population) {
        self.write_population(clock, population);
    }

    fn on_snapshot(&mut self, clock: &SimClock, population: &Population) {
        self.write_population(clock, population);
    }

    fn on_sim_end(&mut self, _summary: &RunSummary) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
