//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `cell_snapshots` and `tick_summaries`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{CellSnapshotRow, OutputResult, TickSummaryRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS cell_snapshots (
                 step          INTEGER NOT NULL,
                 time          REAL    NOT NULL,
                 cell_id       INTEGER NOT NULL,
                 cell_type     INTEGER NOT NULL,
                 x             REAL    NOT NULL,
                 y             REAL    NOT NULL,
                 z             REAL    NOT NULL,
                 radius        REAL    NOT NULL,
                 volume        REAL    NOT NULL,
                 cycle_model   INTEGER NOT NULL,
                 phase         INTEGER NOT NULL,
                 dead          INTEGER NOT NULL,
                 out_of_domain INTEGER NOT NULL,
                 attachments   INTEGER NOT NULL,
                 PRIMARY KEY (step, cell_id)
             );
             CREATE TABLE IF NOT EXISTS tick_summaries (
                 step          INTEGER PRIMARY KEY,
                 time          REAL    NOT NULL,
                 live          INTEGER NOT NULL,
                 dead          INTEGER NOT NULL,
                 out_of_domain INTEGER NOT NULL,
                 divisions     INTEGER NOT NULL,
                 removals      INTEGER NOT NULL,
                 deaths        INTEGER NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_snapshots(&mut self, rows: &[CellSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO cell_snapshots \
                 (step, time, cell_id, cell_type, x, y, z, radius, volume, \
                  cycle_model, phase, dead, out_of_domain, attachments) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.step as i64,
                    row.time,
                    row.cell_id as i64,
                    row.cell_type,
                    row.x,
                    row.y,
                    row.z,
                    row.radius,
                    row.volume,
                    row.cycle_model,
                    row.phase,
                    row.dead as i64,
                    row.out_of_domain as i64,
                    row.attachments,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO tick_summaries \
             (step, time, live, dead, out_of_domain, divisions, removals, deaths) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                row.step as i64,
                row.time,
                row.live as i64,
                row.dead as i64,
                row.out_of_domain as i64,
                row.divisions as i64,
                row.removals as i64,
                row.deaths as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
