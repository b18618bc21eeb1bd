//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `cell_snapshots.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CellSnapshotRow, OutputResult, TickSummaryRow};

pub const SNAPSHOT_HEADER: [&str; 14] = [
    "step", "time", "cell_id", "cell_type", "x", "y", "z", "radius", "volume",
    "cycle_model", "phase", "dead", "out_of_domain", "attachments",
];

pub const SUMMARY_HEADER: [&str; 8] = [
    "step", "time", "live", "dead", "out_of_domain", "divisions", "removals", "deaths",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    snapshots: Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut snapshots = Writer::from_path(dir.join("cell_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { snapshots, summaries, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[CellSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.step.to_string(),
                row.time.to_string(),
                row.cell_id.to_string(),
                row.cell_type.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.z.to_string(),
                row.radius.to_string(),
                row.volume.to_string(),
                row.cycle_model.to_string(),
                row.phase.to_string(),
                (row.dead as u8).to_string(),
                (row.out_of_domain as u8).to_string(),
                row.attachments.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.step.to_string(),
            row.time.to_string(),
            row.live.to_string(),
            row.dead.to_string(),
            row.out_of_domain.to_string(),
            row.divisions.to_string(),
            row.removals.to_string(),
            row.deaths.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.snapshots.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}
