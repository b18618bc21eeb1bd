//! Per-voxel cell buckets.
//!
//! # Locking
//!
//! Each voxel owns its own `Mutex<Vec<CellKey>>`.  Every mutating operation
//! takes `&self` and locks only the bucket(s) it touches, so threads working
//! on disjoint voxels never contend and there is no global lock.  A move
//! between voxels locks the old bucket, releases it, then locks the new one;
//! two locks are never held at once, so lock ordering cannot deadlock.
//!
//! A poisoned bucket is recovered with `PoisonError::into_inner`: the data is
//! a plain `Vec` of handles and stays structurally valid.
//!
//! Removal is O(1) after the linear scan for the key: the last element is
//! swapped into the hole and the vector shrinks by one.

use std::sync::{Mutex, MutexGuard, PoisonError};

use mc_core::{CellKey, Vec3, VoxelIndex};
use tracing::trace;

use crate::{CartesianMesh, DomainFace, SpatialError, SpatialResult};

/// Mechanics voxel grid with one bucket of cell handles per voxel, plus six
/// outer lists for cells that left the domain (one per escaping face).
pub struct CellGrid {
    mesh:    CartesianMesh,
    buckets: Vec<Mutex<Vec<CellKey>>>,
    outer:   [Mutex<Vec<CellKey>>; 6],
}

impl CellGrid {
    pub fn new(mesh: CartesianMesh) -> Self {
        let buckets = (0..mesh.voxel_count()).map(|_| Mutex::new(Vec::new())).collect();
        trace!(buckets = mesh.voxel_count(), "cell grid allocated");
        Self {
            mesh,
            buckets,
            outer: std::array::from_fn(|_| Mutex::new(Vec::new())),
        }
    }

    #[inline]
    pub fn mesh(&self) -> &CartesianMesh {
        &self.mesh
    }

    #[inline]
    fn bucket(&self, voxel: VoxelIndex) -> SpatialResult<MutexGuard<'_, Vec<CellKey>>> {
        self.buckets
            .get(voxel.index())
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner))
            .ok_or(SpatialError::VoxelOutOfRange(voxel))
    }

    #[inline]
    fn outer_list(&self, face: DomainFace) -> MutexGuard<'_, Vec<CellKey>> {
        self.outer[face.index()].lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Append `key` to the bucket of the voxel containing `position`.
    ///
    /// Fails with [`SpatialError::OutOfDomain`] (and inserts nothing) if the
    /// position is outside the domain tolerance.
    pub fn insert(&self, key: CellKey, position: &Vec3) -> SpatialResult<VoxelIndex> {
        let voxel = self.mesh.voxel_index(position)?;
        self.bucket(voxel)?.push(key);
        Ok(voxel)
    }

    /// Re-bucket `key` after its position changed.
    ///
    /// No-op when the voxel is unchanged.  On an out-of-domain position the
    /// error is returned and `key` stays in `old`; the caller decides whether
    /// to remove it.
    pub fn move_cell(&self, key: CellKey, old: VoxelIndex, position: &Vec3) -> SpatialResult<VoxelIndex> {
        let new = self.mesh.voxel_index(position)?;
        if new == old {
            return Ok(old);
        }
        self.remove(key, old)?;
        self.bucket(new)?.push(key);
        Ok(new)
    }

    /// Swap-and-pop `key` out of `voxel`'s bucket.
    pub fn remove(&self, key: CellKey, voxel: VoxelIndex) -> SpatialResult<()> {
        let mut bucket = self.bucket(voxel)?;
        match bucket.iter().position(|&k| k == key) {
            Some(i) => {
                bucket.swap_remove(i);
                Ok(())
            }
            None => Err(SpatialError::NotInBucket { key, voxel }),
        }
    }

    /// Put every bucket in ascending key order.
    ///
    /// Concurrent moves leave buckets in scheduling order; sorting restores
    /// a canonical visiting order for the next pass.
    pub fn sort_buckets(&self) {
        for m in &self.buckets {
            m.lock().unwrap_or_else(PoisonError::into_inner).sort_unstable();
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Precomputed Moore neighbourhood of `voxel`.
    #[inline]
    pub fn neighbors_of(&self, voxel: VoxelIndex) -> &[VoxelIndex] {
        self.mesh.neighbors(voxel)
    }

    /// Copy of the handles currently in `voxel`.  Empty for an invalid index.
    pub fn agents_in_voxel(&self, voxel: VoxelIndex) -> Vec<CellKey> {
        self.bucket(voxel).map(|b| b.clone()).unwrap_or_default()
    }

    /// Run `f` on a borrowed view of `voxel`'s bucket while holding its lock.
    ///
    /// `f` must not call back into this grid for the same voxel.
    pub fn with_bucket<R>(&self, voxel: VoxelIndex, f: impl FnOnce(&[CellKey]) -> R) -> Option<R> {
        self.bucket(voxel).ok().map(|b| f(&b))
    }

    /// Visit every handle in `voxel` and its Moore neighbourhood.
    pub fn for_each_near(&self, voxel: VoxelIndex, mut f: impl FnMut(CellKey)) {
        if let Ok(b) = self.bucket(voxel) {
            b.iter().copied().for_each(&mut f);
        }
        for &n in self.neighbors_of(voxel) {
            if let Ok(b) = self.bucket(n) {
                b.iter().copied().for_each(&mut f);
            }
        }
    }

    /// `true` if `key` is in `voxel`'s bucket.
    pub fn contains(&self, key: CellKey, voxel: VoxelIndex) -> bool {
        self.bucket(voxel).map(|b| b.contains(&key)).unwrap_or(false)
    }

    /// Total number of handles across all buckets.
    pub fn len(&self) -> usize {
        self.buckets
            .iter()
            .map(|m| m.lock().unwrap_or_else(PoisonError::into_inner).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every `(voxel, key)` pair, in voxel order.  Used by consistency checks.
    pub fn entries(&self) -> Vec<(VoxelIndex, CellKey)> {
        let mut out = Vec::new();
        for (v, m) in self.buckets.iter().enumerate() {
            let bucket = m.lock().unwrap_or_else(PoisonError::into_inner);
            out.extend(bucket.iter().map(|&k| (VoxelIndex(v as u32), k)));
        }
        out
    }

    // ── Outer (escaped) cells ─────────────────────────────────────────────

    /// Record a cell that left the domain through `face`.
    pub fn add_to_outer(&self, key: CellKey, face: DomainFace) {
        self.outer_list(face).push(key);
    }

    /// Cells that escaped through `face`.
    pub fn outer(&self, face: DomainFace) -> Vec<CellKey> {
        self.outer_list(face).clone()
    }

    /// Forget an escaped cell.  Returns `true` if it was recorded.
    pub fn remove_from_outer(&self, key: CellKey) -> bool {
        for face in DomainFace::ALL {
            let mut list = self.outer_list(face);
            if let Some(i) = list.iter().position(|&k| k == key) {
                list.swap_remove(i);
                return true;
            }
        }
        false
    }

    pub fn outer_len(&self) -> usize {
        DomainFace::ALL.iter().map(|&f| self.outer_list(f).len()).sum()
    }
}
