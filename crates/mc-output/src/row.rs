//! Plain data row types written by output backends.

use mc_agent::Cell;

/// One cell at one save or snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSnapshotRow {
    pub step:          u64,
    /// Simulated minutes.
    pub time:          f64,
    pub cell_id:       u64,
    pub cell_type:     u16,
    pub x:             f64,
    pub y:             f64,
    pub z:             f64,
    pub radius:        f64,
    pub volume:        f64,
    /// Code of the cycle (or death) model the cell is on.
    pub cycle_model:   i32,
    /// Index of the current phase within that model.
    pub phase:         u32,
    pub dead:          bool,
    pub out_of_domain: bool,
    pub attachments:   u32,
}

impl CellSnapshotRow {
    pub fn from_cell(step: u64, time: f64, cell: &Cell) -> Self {
        Self {
            step,
            time,
            cell_id:       cell.id.0,
            cell_type:     cell.type_id.0,
            x:             cell.position.x,
            y:             cell.position.y,
            z:             cell.position.z,
            radius:        cell.radius(),
            volume:        cell.volume(),
            cycle_model:   cell.phenotype.cycle.model().code,
            phase:         cell.phenotype.cycle.current_phase as u32,
            dead:          cell.is_dead(),
            out_of_domain: cell.is_out_of_domain,
            attachments:   cell.attached.len() as u32,
        }
    }
}

/// Population tallies and changes at one phenotype step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummaryRow {
    pub step:          u64,
    pub time:          f64,
    pub live:          u64,
    pub dead:          u64,
    pub out_of_domain: u64,
    pub divisions:     u64,
    pub removals:      u64,
    pub deaths:        u64,
}
