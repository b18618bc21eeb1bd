//! CSV loader for the initial cell placement.
//!
//! # CSV format
//!
//! One row per cell.  Positions are in microns; `type` is a cell-definition
//! name or its numeric type id.  Lines starting with `#` are skipped.
//!
//! ```csv
//! x,y,z,type
//! 0,0,0,tumor
//! 16.8,0,0,tumor
//! -40,12.5,0,1
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use mc_core::Vec3;

use crate::{ScheduleError, ScheduleResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PlacementRecord {
    x:    f64,
    y:    f64,
    z:    f64,
    #[serde(rename = "type")]
    kind: String,
}

/// One row of the placement file, before type names are resolved.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InitialCell {
    pub position:  Vec3,
    /// Definition name, or a type id written as an integer.
    pub cell_type: String,
}

impl InitialCell {
    /// The type as a numeric id, if it was written as one.
    pub fn type_index(&self) -> Option<u16> {
        self.cell_type.parse().ok()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the initial placement list from a CSV file.
pub fn load_placements_csv(path: &Path) -> ScheduleResult<Vec<InitialCell>> {
    let file = std::fs::File::open(path)?;
    load_placements_reader(file)
}

/// Like [`load_placements_csv`] but accepts any `Read` source.
pub fn load_placements_reader<R: Read>(reader: R) -> ScheduleResult<Vec<InitialCell>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut cells = Vec::new();
    for (row, result) in csv_reader.deserialize::<PlacementRecord>().enumerate() {
        let r = result.map_err(|e| ScheduleError::Parse(e.to_string()))?;
        if !(r.x.is_finite() && r.y.is_finite() && r.z.is_finite()) {
            return Err(ScheduleError::Parse(format!("row {}: non-finite position", row + 1)));
        }
        if r.kind.is_empty() {
            return Err(ScheduleError::Parse(format!("row {}: empty cell type", row + 1)));
        }
        cells.push(InitialCell { position: Vec3::new(r.x, r.y, r.z), cell_type: r.kind });
    }
    Ok(cells)
}
