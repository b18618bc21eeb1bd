use mc_core::{CellId, CellTypeId, SourceSink, Vec3, VoxelIndex};

use crate::Phenotype;

/// One agent.
///
/// Cells refer to each other only by [`CellId`]; the grid refers to cells by
/// `CellKey`.  Neither relation owns the other cell.
#[derive(Clone, Debug)]
pub struct Cell {
    pub id:                CellId,
    pub type_id:           CellTypeId,
    pub position:          Vec3,
    /// Accumulated during a mechanics step, zeroed after integration.
    pub velocity:          Vec3,
    pub previous_velocity: Vec3,
    /// Unit axis used with `geometry.polarity` to bias division direction.
    pub orientation:       Vec3,
    pub phenotype:         Phenotype,
    /// Symmetric: if `a.attached` holds `b.id`, then `b.attached` holds
    /// `a.id`.  Maintained by the population, never edited directly.
    pub attached:          Vec<CellId>,
    /// Bucket currently holding this cell.  `None` until positioned and
    /// after leaving the domain.
    pub voxel:             Option<VoxelIndex>,
    pub is_movable:        bool,
    pub is_out_of_domain:  bool,
    pub is_active:         bool,
    /// `false` between creation and the first position assignment.
    pub positioned:        bool,
}

impl Cell {
    /// An unpositioned cell.  The store assigns the real id on insertion.
    pub fn new(type_id: CellTypeId, phenotype: Phenotype) -> Self {
        Self {
            id: CellId::INVALID,
            type_id,
            position: Vec3::zeros(),
            velocity: Vec3::zeros(),
            previous_velocity: Vec3::zeros(),
            orientation: Vec3::z(),
            phenotype,
            attached: Vec::new(),
            voxel: None,
            is_movable: true,
            is_out_of_domain: false,
            is_active: true,
            positioned: false,
        }
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.phenotype.geometry.radius
    }

    #[inline]
    pub fn volume(&self) -> f64 {
        self.phenotype.volume.total
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.phenotype.is_dead()
    }

    /// Positioned, in the domain and active: takes part in neighbour
    /// queries and transport coupling.
    #[inline]
    pub fn is_in_play(&self) -> bool {
        self.positioned && self.is_active && !self.is_out_of_domain
    }

    pub fn is_attached_to(&self, other: CellId) -> bool {
        self.attached.contains(&other)
    }

    pub fn source_sink(&self) -> SourceSink {
        self.phenotype.secretion.source_sink(self.position, self.volume())
    }
}
