//! Uniform Cartesian mechanics mesh.
//!
//! # Data layout
//!
//! Voxels are cubes of edge `voxel_size` laid out from `min`.  A voxel's
//! linear index is
//!
//! ```text
//! index = i + nx * (j + ny * k)
//! ```
//!
//! The Moore neighbourhood of every voxel (up to 26 indices, fewer on the
//! boundary) is computed once in [`CartesianMesh::new`] and stored in CSR
//! form: voxel `v`'s neighbours occupy
//! `moore_indices[moore_start[v] .. moore_start[v + 1]]`.

use mc_core::{DomainConfig, Vec3, VoxelIndex, vec3};
use tracing::debug;

use crate::{SpatialError, SpatialResult};

// ── DomainFace ────────────────────────────────────────────────────────────────

/// Face of the bounding box a cell escaped through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DomainFace {
    LowerX,
    UpperX,
    LowerY,
    UpperY,
    LowerZ,
    UpperZ,
}

impl DomainFace {
    pub const ALL: [DomainFace; 6] = [
        DomainFace::LowerX,
        DomainFace::UpperX,
        DomainFace::LowerY,
        DomainFace::UpperY,
        DomainFace::LowerZ,
        DomainFace::UpperZ,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

// ── CartesianMesh ─────────────────────────────────────────────────────────────

/// Immutable voxel geometry plus the precomputed Moore neighbourhoods.
#[derive(Clone, Debug)]
pub struct CartesianMesh {
    min:        Vec3,
    max:        Vec3,
    voxel_size: f64,
    tolerance:  f64,
    dims:       [usize; 3],

    moore_start:   Vec<u32>,
    moore_indices: Vec<VoxelIndex>,
}

impl CartesianMesh {
    /// Build a mesh covering `[min, max]` with cubic voxels.
    ///
    /// The last voxel on an axis is allowed to stick out past `max` when the
    /// extent is not a multiple of `voxel_size`.
    pub fn new(min: Vec3, max: Vec3, voxel_size: f64, tolerance: f64) -> SpatialResult<Self> {
        if !(voxel_size.is_finite() && voxel_size > 0.0) {
            return Err(SpatialError::InvalidMesh(format!("voxel size {voxel_size}")));
        }
        let mut dims = [1usize; 3];
        for axis in 0..3 {
            let extent = max[axis] - min[axis];
            if !(extent.is_finite() && extent > 0.0) {
                return Err(SpatialError::InvalidMesh(format!(
                    "axis {axis} has extent {extent}"
                )));
            }
            dims[axis] = ((extent / voxel_size).ceil() as usize).max(1);
        }
        let count = dims[0]
            .checked_mul(dims[1])
            .and_then(|n| n.checked_mul(dims[2]))
            .filter(|&n| n <= u32::MAX as usize)
            .ok_or_else(|| SpatialError::InvalidMesh(format!("too many voxels: {dims:?}")))?;

        let mut mesh = Self {
            min,
            max,
            voxel_size,
            tolerance: tolerance.max(0.0),
            dims,
            moore_start: Vec::with_capacity(count + 1),
            moore_indices: Vec::new(),
        };
        mesh.build_moore_lists(count);
        debug!(?dims, voxels = count, links = mesh.moore_indices.len(), "mechanics mesh built");
        Ok(mesh)
    }

    /// Build a mesh from the domain section of the simulation config.
    pub fn from_config(cfg: &DomainConfig) -> SpatialResult<Self> {
        Self::new(vec3(cfg.min), vec3(cfg.max), cfg.voxel_size, cfg.out_of_bounds_tolerance)
    }

    fn build_moore_lists(&mut self, count: usize) {
        let [nx, ny, nz] = self.dims;
        self.moore_start.push(0);
        for v in 0..count {
            let i = v % nx;
            let j = (v / nx) % ny;
            let k = v / (nx * ny);
            for dk in -1i64..=1 {
                for dj in -1i64..=1 {
                    for di in -1i64..=1 {
                        if di == 0 && dj == 0 && dk == 0 {
                            continue;
                        }
                        let (ni, nj, nk) = (i as i64 + di, j as i64 + dj, k as i64 + dk);
                        if ni < 0 || nj < 0 || nk < 0 {
                            continue;
                        }
                        let (ni, nj, nk) = (ni as usize, nj as usize, nk as usize);
                        if ni >= nx || nj >= ny || nk >= nz {
                            continue;
                        }
                        self.moore_indices.push(VoxelIndex((ni + nx * (nj + ny * nk)) as u32));
                    }
                }
            }
            self.moore_start.push(self.moore_indices.len() as u32);
        }
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    #[inline]
    pub fn voxel_size(&self) -> f64 {
        self.voxel_size
    }

    #[inline]
    pub fn bounds(&self) -> (Vec3, Vec3) {
        (self.min, self.max)
    }

    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    // ── Position queries ──────────────────────────────────────────────────

    /// `true` if `p` lies inside the bounding box widened by the tolerance.
    /// Non-finite positions are never inside.
    pub fn contains(&self, p: &Vec3) -> bool {
        (0..3).all(|a| {
            p[a] >= self.min[a] - self.tolerance && p[a] <= self.max[a] + self.tolerance
        })
    }

    /// Voxel containing `p`, clamped into the mesh.
    ///
    /// Returns [`SpatialError::OutOfDomain`] if `p` is outside the tolerance
    /// band.
    pub fn voxel_index(&self, p: &Vec3) -> SpatialResult<VoxelIndex> {
        if !self.contains(p) {
            return Err(SpatialError::OutOfDomain { x: p.x, y: p.y, z: p.z });
        }
        let mut ijk = [0usize; 3];
        for a in 0..3 {
            let cell = ((p[a] - self.min[a]) / self.voxel_size).floor();
            ijk[a] = cell.clamp(0.0, (self.dims[a] - 1) as f64) as usize;
        }
        Ok(self.index_of(ijk))
    }

    #[inline]
    pub fn index_of(&self, [i, j, k]: [usize; 3]) -> VoxelIndex {
        VoxelIndex((i + self.dims[0] * (j + self.dims[1] * k)) as u32)
    }

    #[inline]
    pub fn ijk_of(&self, voxel: VoxelIndex) -> [usize; 3] {
        let v = voxel.index();
        let [nx, ny, _] = self.dims;
        [v % nx, (v / nx) % ny, v / (nx * ny)]
    }

    pub fn voxel_center(&self, voxel: VoxelIndex) -> Vec3 {
        let [i, j, k] = self.ijk_of(voxel);
        let h = 0.5 * self.voxel_size;
        Vec3::new(
            self.min.x + i as f64 * self.voxel_size + h,
            self.min.y + j as f64 * self.voxel_size + h,
            self.min.z + k as f64 * self.voxel_size + h,
        )
    }

    /// Precomputed Moore neighbourhood of `voxel`.  Empty for an index
    /// outside the mesh.
    #[inline]
    pub fn neighbors(&self, voxel: VoxelIndex) -> &[VoxelIndex] {
        let v = voxel.index();
        if v + 1 >= self.moore_start.len() {
            return &[];
        }
        let start = self.moore_start[v] as usize;
        let end = self.moore_start[v + 1] as usize;
        &self.moore_indices[start..end]
    }

    #[inline]
    pub fn is_valid_voxel(&self, voxel: VoxelIndex) -> bool {
        voxel.index() < self.voxel_count()
    }

    /// Face of the bounding box that `p` has crossed, checked in the order
    /// −x, +x, −y, +y, −z, +z.  `None` if `p` is inside the box.
    pub fn escaping_face(&self, p: &Vec3) -> Option<DomainFace> {
        let t = self.tolerance;
        if !(p.x >= self.min.x - t) {
            return Some(DomainFace::LowerX);
        }
        if !(p.x <= self.max.x + t) {
            return Some(DomainFace::UpperX);
        }
        if !(p.y >= self.min.y - t) {
            return Some(DomainFace::LowerY);
        }
        if !(p.y <= self.max.y + t) {
            return Some(DomainFace::UpperY);
        }
        if !(p.z >= self.min.z - t) {
            return Some(DomainFace::LowerZ);
        }
        if !(p.z <= self.max.z + t) {
            return Some(DomainFace::UpperZ);
        }
        None
    }
}
