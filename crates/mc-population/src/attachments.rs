//! Symmetric cell–cell attachments.
//!
//! Every operation edits both partners under one `&mut Population` borrow,
//! so the pair is never observed half-updated.

use tracing::warn;

use mc_agent::{AgentError, Cell};
use mc_core::CellId;

use crate::{Population, PopulationResult};

impl Population {
    /// Attach `a` and `b` to each other.
    ///
    /// Returns `false` (and changes nothing) if they are the same cell,
    /// already attached, or either is at its attachment limit.
    pub fn attach(&mut self, a: CellId, b: CellId) -> PopulationResult<bool> {
        if a == b {
            return Ok(false);
        }
        let ka = self.store.key_of(a).ok_or(AgentError::UnknownCell(a))?;
        let kb = self.store.key_of(b).ok_or(AgentError::UnknownCell(b))?;
        let Some((ca, cb)) = self.store.get_pair_mut(ka, kb) else {
            return Ok(false);
        };
        if ca.is_attached_to(b) {
            return Ok(false);
        }
        let full = |c: &Cell| c.attached.len() >= c.phenotype.mechanics.maximum_number_of_attachments;
        if full(&*ca) || full(&*cb) {
            return Ok(false);
        }
        ca.attached.push(b);
        cb.attached.push(a);
        Ok(true)
    }

    /// Break the `a`–`b` attachment.  Returns `false` if there was none.
    pub fn detach(&mut self, a: CellId, b: CellId) -> PopulationResult<bool> {
        if !self.store.contains_id(a) {
            return Err(AgentError::UnknownCell(a).into());
        }
        let mut found = false;
        for (from, to) in [(a, b), (b, a)] {
            if let Some(cell) = self.store.get_by_id_mut(from) {
                if let Some(i) = cell.attached.iter().position(|&x| x == to) {
                    cell.attached.swap_remove(i);
                    found = true;
                }
            }
        }
        Ok(found)
    }

    /// Break every attachment of `id`.  Returns how many were removed.
    pub fn remove_all_attachments(&mut self, id: CellId) -> PopulationResult<usize> {
        let cell = self.store.get_by_id_mut(id).ok_or(AgentError::UnknownCell(id))?;
        let partners = std::mem::take(&mut cell.attached);
        for &other in &partners {
            if let Some(o) = self.store.get_by_id_mut(other) {
                o.attached.retain(|&x| x != id);
            }
        }
        Ok(partners.len())
    }

    /// Restore symmetry: drop links to cells that no longer exist or to
    /// the cell itself, drop duplicates, and add missing back-links.
    /// Returns the number of repairs.
    pub fn heal_attachments(&mut self) -> usize {
        let mut repairs = 0;
        let ids = self.store.sorted_ids();

        for &id in &ids {
            let Some(cell) = self.store.get_by_id(id) else { continue };
            let keep: Vec<CellId> = {
                let mut seen = Vec::with_capacity(cell.attached.len());
                for &other in &cell.attached {
                    if other != id && !seen.contains(&other) && self.store.contains_id(other) {
                        seen.push(other);
                    }
                }
                seen
            };
            if keep.len() != cell.attached.len() {
                repairs += cell.attached.len() - keep.len();
                if let Some(c) = self.store.get_by_id_mut(id) {
                    c.attached = keep;
                }
            }
        }

        let mut missing = Vec::new();
        for &id in &ids {
            if let Some(cell) = self.store.get_by_id(id) {
                for &other in &cell.attached {
                    if self.store.get_by_id(other).is_some_and(|o| !o.is_attached_to(id)) {
                        missing.push((other, id));
                    }
                }
            }
        }
        for (owner, partner) in missing {
            if let Some(c) = self.store.get_by_id_mut(owner) {
                c.attached.push(partner);
                repairs += 1;
            }
        }

        if repairs > 0 {
            warn!(repairs, "repaired asymmetric attachments");
        }
        repairs
    }
}
