//! Read-only simulation state passed to every behavior callback.

use mc_agent::{Cell, CellDefinitions, Phenotype};
use mc_core::{CellId, CellTypeId, Microenvironment, SubstrateId, Vec3};

/// A read-only snapshot of the simulation state shared by every
/// [`CellBehavior`][crate::CellBehavior] callback in one pass.
///
/// Built once per pass by mc-sim.  All borrows live for the duration of the
/// pass; mc-sim never mutates the environment or the definitions while a
/// context is live.
pub struct PhenotypeContext<'a> {
    /// Simulation time at the start of the pass, in minutes.
    pub time: f64,

    /// Length of the step being taken (phenotype or mechanics dt).
    pub dt: f64,

    /// Diffusion tick counter.
    pub step: u64,

    pub environment: &'a dyn Microenvironment,

    pub definitions: &'a CellDefinitions,
}

impl<'a> PhenotypeContext<'a> {
    #[inline]
    pub fn new(
        time:        f64,
        dt:          f64,
        step:        u64,
        environment: &'a dyn Microenvironment,
        definitions: &'a CellDefinitions,
    ) -> Self {
        Self { time, dt, step, environment, definitions }
    }

    /// Concentration of `substrate` at the cell's position.
    #[inline]
    pub fn concentration(&self, cell: &CellView<'_>, substrate: SubstrateId) -> f64 {
        self.environment.concentration_at(&cell.position, substrate)
    }
}

/// The parts of a [`Cell`] a behavior may read while it edits the cell's
/// phenotype.
///
/// Position and attachments are deliberately read-only: they belong to the
/// spatial index and the population, which are updated only at sync points.
#[derive(Copy, Clone, Debug)]
pub struct CellView<'a> {
    pub id:         CellId,
    pub type_id:    CellTypeId,
    pub position:   Vec3,
    /// Velocity of the last mechanics step.
    pub velocity:   Vec3,
    pub attached:   &'a [CellId],
    pub is_movable: bool,
}

impl<'a> CellView<'a> {
    pub fn of(cell: &'a Cell) -> Self {
        Self {
            id:         cell.id,
            type_id:    cell.type_id,
            position:   cell.position,
            velocity:   cell.previous_velocity,
            attached:   &cell.attached,
            is_movable: cell.is_movable,
        }
    }

    /// Borrow a cell as a read-only view plus its phenotype, mutably.
    pub fn split(cell: &'a mut Cell) -> (Self, &'a mut Phenotype) {
        let Cell { id, type_id, position, previous_velocity, attached, is_movable, phenotype, .. } = cell;
        let view = Self {
            id:         *id,
            type_id:    *type_id,
            position:   *position,
            velocity:   *previous_velocity,
            attached:   attached.as_slice(),
            is_movable: *is_movable,
        };
        (view, phenotype)
    }
}
