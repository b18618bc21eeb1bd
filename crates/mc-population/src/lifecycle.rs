//! Division, death and removal.

use rand::Rng;
use tracing::trace;

use mc_agent::Cell;
use mc_core::{CellKey, Vec3, random_unit_vector};

use crate::{Population, PopulationError, PopulationResult};

/// Each daughter is displaced this fraction of the (halved) radius from
/// the mother's centre.
pub const DIVISION_OFFSET_FRACTION: f64 = 0.5;

impl Population {
    /// Split `parent` in two.
    ///
    /// Both daughters get half the volume and keep the parent's cycle phase,
    /// which is already the post-division phase when the cycle requested the
    /// split.  The child copies the full phenotype including custom data but
    /// starts with no attachments.  The daughters are pushed apart along a
    /// random axis, each by `DIVISION_OFFSET_FRACTION * radius`.
    pub fn divide<R: Rng + ?Sized>(&mut self, parent: CellKey, rng: &mut R) -> PopulationResult<CellKey> {
        let use_2d = self.use_2d;
        let p = self.store.require_mut(parent)?;
        if p.is_dead() {
            return Err(PopulationError::CannotDivide(p.id, "cell is dead"));
        }
        if !p.is_in_play() {
            return Err(PopulationError::CannotDivide(p.id, "cell is not in the domain"));
        }

        p.phenotype.divide();
        let offset = division_axis(p, rng, use_2d) * (DIVISION_OFFSET_FRACTION * p.radius());
        let centre = p.position;

        let mut child = Cell::new(p.type_id, p.phenotype.clone());
        child.is_movable = p.is_movable;
        child.orientation = p.orientation;

        let child_key = self.store.insert(child);
        self.assign_position(parent, centre - offset)?;
        self.assign_position(child_key, centre + offset)?;
        trace!(%parent, child = %child_key, "cell divided");
        Ok(child_key)
    }

    /// Start death model `death_model` on a cell and detach it from its
    /// partners.  The cell stays in the population until its death cycle
    /// flags it for removal.  Returns `false` if it was already dead.
    pub fn mark_dead(&mut self, key: CellKey, death_model: usize, dt: f64) -> PopulationResult<bool> {
        let cell = self.store.require_mut(key)?;
        let id = cell.id;
        let started = cell.phenotype.start_death(death_model, dt)?;
        if started {
            self.remove_all_attachments(id)?;
        }
        Ok(started)
    }

    /// Erase a cell: detach it, drop it from its bucket (or outer list) and
    /// from the store.  The slot's generation is bumped so stale keys fail.
    pub fn finalize_removal(&mut self, key: CellKey) -> PopulationResult<Cell> {
        let id = self.store.require(key)?.id;
        self.remove_all_attachments(id)?;
        let cell = self.store.remove(key)?;
        if let Some(voxel) = cell.voxel {
            self.grid.remove(key, voxel)?;
        }
        if cell.is_out_of_domain {
            self.grid.remove_from_outer(key);
        }
        trace!(cell = %id, "cell removed");
        Ok(cell)
    }
}

/// Random unit direction with the polarity component along the cell's
/// orientation removed.
fn division_axis<R: Rng + ?Sized>(cell: &Cell, rng: &mut R, use_2d: bool) -> Vec3 {
    let mut axis = random_unit_vector(rng, use_2d || cell.phenotype.motility.restrict_to_2d);
    let polarity = cell.phenotype.geometry.polarity;
    if polarity > 0.0 {
        let o = cell.orientation;
        axis -= o * (polarity * axis.dot(&o));
        let n = axis.norm();
        if n > 1e-12 {
            axis /= n;
        } else {
            axis = random_unit_vector(rng, true);
        }
    }
    axis
}
