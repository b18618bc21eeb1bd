//! `mc-output` — simulation output writers for the multicellular simulator.
//!
//! Two backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                 |
//! |-----------|---------|-----------------------------------------------|
//! | *(none)*  | CSV     | `cell_snapshots.csv`, `tick_summaries.csv`    |
//! | `sqlite`  | SQLite  | `output.db`                                   |
//!
//! All backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `mc_sim::SimObserver`:
//!
//! - every save and snapshot writes one [`CellSnapshotRow`] per cell;
//! - every phenotype step writes one [`TickSummaryRow`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use mc_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{CellSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
