//! The population: cell store, voxel grid and type templates kept in step.
//!
//! # Two-phase construction
//!
//! [`Population::create`] only allocates a cell; it is invisible to neighbour
//! queries until [`Population::assign_position`] puts it in a bucket.  Cells
//! created but never positioned are skipped by every pass.
//!
//! # Synchronisation points
//!
//! Every method that changes membership takes `&mut self`.  The simulation
//! calls them only between passes, never while a parallel pass is reading
//! buckets.  The one exception is [`Population::split_mut`], which hands the
//! mechanics pass the store and a shared grid so voxel moves can run in
//! parallel under the grid's per-voxel locks.

use tracing::{debug, warn};

use mc_agent::{Cell, CellDefinitions, CellStore};
use mc_core::{CellId, CellKey, CellTypeId, DomainConfig, Vec3, VoxelIndex};
use mc_spatial::{CartesianMesh, CellGrid, DomainFace};

use crate::{PopulationError, PopulationResult};

/// Where an assigned position landed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    Inside(VoxelIndex),
    OutOfDomain(DomainFace),
}

/// Live / dead / out-of-domain tallies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PopulationCounts {
    pub live:          usize,
    pub dead:          usize,
    pub out_of_domain: usize,
}

pub struct Population {
    pub(crate) store:       CellStore,
    pub(crate) grid:        CellGrid,
    pub(crate) definitions: CellDefinitions,
    pub(crate) use_2d:      bool,
}

impl Population {
    pub fn new(grid: CellGrid, definitions: CellDefinitions) -> Self {
        Self { store: CellStore::new(), grid, definitions, use_2d: false }
    }

    /// Build the grid from the domain section of the configuration.
    pub fn from_domain(domain: &DomainConfig, definitions: CellDefinitions) -> PopulationResult<Self> {
        let mesh = CartesianMesh::from_config(domain)?;
        let mut pop = Self::new(CellGrid::new(mesh), definitions);
        pop.use_2d = domain.use_2d;
        Ok(pop)
    }

    /// Restrict division directions to the z = 0 plane.
    pub fn set_2d(&mut self, use_2d: bool) {
        self.use_2d = use_2d;
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn store(&self) -> &CellStore {
        &self.store
    }

    /// Direct store access.  Changing `position` or `voxel` through this
    /// handle bypasses the grid; use [`move_cell`](Self::move_cell) instead.
    #[inline]
    pub fn store_mut(&mut self) -> &mut CellStore {
        &mut self.store
    }

    #[inline]
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    #[inline]
    pub fn definitions(&self) -> &CellDefinitions {
        &self.definitions
    }

    #[inline]
    pub fn definitions_mut(&mut self) -> &mut CellDefinitions {
        &mut self.definitions
    }

    /// Store and grid borrowed at once, for passes that update buckets
    /// concurrently.
    #[inline]
    pub fn split_mut(&mut self) -> (&mut CellStore, &CellGrid, &CellDefinitions) {
        (&mut self.store, &self.grid, &self.definitions)
    }

    #[inline]
    pub fn get(&self, key: CellKey) -> Option<&Cell> {
        self.store.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: CellKey) -> Option<&mut Cell> {
        self.store.get_mut(key)
    }

    pub fn get_by_id(&self, id: CellId) -> Option<&Cell> {
        self.store.get_by_id(id)
    }

    #[inline]
    pub fn key_of(&self, id: CellId) -> Option<CellKey> {
        self.store.key_of(id)
    }

    /// `(key, cell)` in population order.
    pub fn iter(&self) -> impl Iterator<Item = (CellKey, &Cell)> + '_ {
        self.store.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn counts(&self) -> PopulationCounts {
        let mut c = PopulationCounts::default();
        for (_, cell) in self.store.iter() {
            if cell.is_out_of_domain {
                c.out_of_domain += 1;
            } else if cell.is_dead() {
                c.dead += 1;
            } else {
                c.live += 1;
            }
        }
        c
    }

    // ── Creation ──────────────────────────────────────────────────────────

    /// Allocate a cell from its type template.  The cell is not yet in the
    /// grid; call [`assign_position`](Self::assign_position) next.
    pub fn create(&mut self, type_id: CellTypeId) -> PopulationResult<CellKey> {
        let def = self.definitions.require(type_id)?;
        let mut cell = Cell::new(type_id, def.phenotype.clone());
        cell.is_movable = def.is_movable;
        Ok(self.store.insert(cell))
    }

    pub fn create_by_name(&mut self, name: &str) -> PopulationResult<CellKey> {
        let type_id = self.definitions.type_id(name)?;
        self.create(type_id)
    }

    /// `create` followed by `assign_position`.
    pub fn place(&mut self, type_id: CellTypeId, position: Vec3) -> PopulationResult<CellKey> {
        let key = self.create(type_id)?;
        self.assign_position(key, position)?;
        Ok(key)
    }

    /// Put a cell at `position` and register it with the grid.
    ///
    /// A cell that is already positioned is moved.  A position outside the
    /// domain tolerance is not an error: the cell is flagged out-of-domain
    /// and recorded on the face it crossed.
    pub fn assign_position(&mut self, key: CellKey, position: Vec3) -> PopulationResult<Placement> {
        let cell = self.store.require_mut(key)?;
        cell.position = position;
        if cell.is_out_of_domain {
            let face = self.grid.mesh().escaping_face(&position).unwrap_or(DomainFace::UpperX);
            return Ok(Placement::OutOfDomain(face));
        }

        let result = match cell.voxel {
            Some(old) => self.grid.move_cell(key, old, &position),
            None => self.grid.insert(key, &position),
        };
        match result {
            Ok(voxel) => {
                cell.voxel = Some(voxel);
                cell.positioned = true;
                Ok(Placement::Inside(voxel))
            }
            Err(e) if e.is_out_of_domain() => {
                cell.positioned = true;
                let face = self.flag_out_of_domain(key)?;
                Ok(Placement::OutOfDomain(face))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Move an already positioned cell.
    pub fn move_cell(&mut self, key: CellKey, position: Vec3) -> PopulationResult<Placement> {
        if !self.store.require(key)?.positioned {
            return Err(PopulationError::NotPositioned(key));
        }
        self.assign_position(key, position)
    }

    // ── Out of domain ─────────────────────────────────────────────────────

    /// Take a cell out of mechanics and transport coupling: leave its bucket,
    /// mark it inactive and out-of-domain, and record it on the face it
    /// crossed.  Idempotent.
    pub fn flag_out_of_domain(&mut self, key: CellKey) -> PopulationResult<DomainFace> {
        let cell = self.store.require_mut(key)?;
        let face = self
            .grid
            .mesh()
            .escaping_face(&cell.position)
            .unwrap_or(DomainFace::UpperX);
        if cell.is_out_of_domain {
            return Ok(face);
        }
        if let Some(voxel) = cell.voxel.take() {
            self.grid.remove(key, voxel)?;
        }
        cell.is_out_of_domain = true;
        cell.is_active = false;
        cell.velocity = Vec3::zeros();
        self.grid.add_to_outer(key, face);
        debug!(cell = %cell.id, ?face, "cell left the domain");
        Ok(face)
    }

    /// Remove every out-of-domain cell.  Returns the removed cells.
    pub fn purge_out_of_domain(&mut self) -> PopulationResult<Vec<Cell>> {
        let keys: Vec<CellKey> = self
            .store
            .iter()
            .filter(|(_, c)| c.is_out_of_domain)
            .map(|(k, _)| k)
            .collect();
        let mut removed = Vec::with_capacity(keys.len());
        for key in keys {
            removed.push(self.finalize_removal(key)?);
        }
        if !removed.is_empty() {
            warn!(count = removed.len(), "purged out-of-domain cells");
        }
        Ok(removed)
    }
}
