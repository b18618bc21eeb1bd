//! Whole-population invariant check, used by tests and debug builds.

use rustc_hash::FxHashSet;

use mc_core::CellKey;

use crate::{Population, PopulationError, PopulationResult};

impl Population {
    /// Verify that
    ///
    /// - every in-play cell is in exactly one bucket, the one its `voxel`
    ///   names;
    /// - every bucket entry resolves to an in-play cell;
    /// - no out-of-domain cell holds a voxel;
    /// - attachments are symmetric and only name live cells.
    pub fn check_consistency(&self) -> PopulationResult<()> {
        let fail = |msg: String| Err(PopulationError::Inconsistent(msg));

        let mut seen: FxHashSet<CellKey> = FxHashSet::default();
        for (voxel, key) in self.grid.entries() {
            if !seen.insert(key) {
                return fail(format!("{key} appears in more than one bucket"));
            }
            let Some(cell) = self.store.get(key) else {
                return fail(format!("bucket {voxel} holds stale handle {key}"));
            };
            if !cell.is_in_play() {
                return fail(format!("bucket {voxel} holds inactive cell {}", cell.id));
            }
            if cell.voxel != Some(voxel) {
                return fail(format!("{} is in bucket {voxel} but records {:?}", cell.id, cell.voxel));
            }
        }

        for (key, cell) in self.store.iter() {
            if cell.is_in_play() && !seen.contains(&key) {
                return fail(format!("{} is in play but in no bucket", cell.id));
            }
            if cell.is_out_of_domain && cell.voxel.is_some() {
                return fail(format!("{} is out of domain but holds a voxel", cell.id));
            }
            for &other in &cell.attached {
                match self.store.get_by_id(other) {
                    None => return fail(format!("{} is attached to missing {other}", cell.id)),
                    Some(o) if !o.is_attached_to(cell.id) => {
                        return fail(format!("{} -> {other} has no back-link", cell.id));
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }
}
