//! Generational cell arena plus the insertion-ordered population list.
//!
//! # Layout
//!
//! Cells live in `slots`.  A slot is reused after its cell is removed, and
//! its generation is bumped at that moment, so any [`CellKey`] still held
//! elsewhere (a grid bucket, an outer-face list) stops resolving instead of
//! aliasing the new occupant.
//!
//! The population order (`order`) is the authoritative iteration order for
//! output and for the sequential passes.  Removal swaps the last entry into
//! the hole, so it is O(1); each slot remembers its position in `order`.
//!
//! IDs come from a counter that only ever increases.

use rustc_hash::FxHashMap;

use mc_core::{CellId, CellKey};

use crate::{AgentError, AgentResult, Cell};

/// One arena slot.  Exposed so the parallel passes can iterate the arena
/// with `par_iter_mut`.
#[derive(Debug)]
pub struct Slot {
    generation:  u32,
    order_index: u32,
    cell:        Option<Cell>,
}

impl Slot {
    #[inline]
    pub fn cell(&self) -> Option<&Cell> {
        self.cell.as_ref()
    }

    #[inline]
    pub fn cell_mut(&mut self) -> Option<&mut Cell> {
        self.cell.as_mut()
    }

    #[inline]
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct CellStore {
    slots:   Vec<Slot>,
    free:    Vec<u32>,
    order:   Vec<CellKey>,
    by_id:   FxHashMap<CellId, CellKey>,
    next_id: u64,
}

impl CellStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `cell` under a freshly issued id.  Any id already on the cell
    /// is overwritten.
    pub fn insert(&mut self, mut cell: Cell) -> CellKey {
        let id = CellId(self.next_id);
        self.next_id += 1;
        cell.id = id;

        let order_index = self.order.len() as u32;
        let key = match self.free.pop() {
            Some(slot) => {
                let s = &mut self.slots[slot as usize];
                s.cell = Some(cell);
                s.order_index = order_index;
                CellKey::new(slot, s.generation)
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(Slot { generation: 0, order_index, cell: Some(cell) });
                CellKey::new(slot, 0)
            }
        };
        self.order.push(key);
        self.by_id.insert(id, key);
        key
    }

    /// Take a cell out of the store.
    pub fn remove(&mut self, key: CellKey) -> AgentResult<Cell> {
        let slot = self
            .slots
            .get_mut(key.slot_index())
            .filter(|s| s.generation == key.generation && s.cell.is_some())
            .ok_or(AgentError::StaleKey(key))?;
        let cell = slot.cell.take().ok_or(AgentError::StaleKey(key))?;
        let order_index = slot.order_index as usize;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(key.slot);

        self.order.swap_remove(order_index);
        if let Some(&moved) = self.order.get(order_index) {
            self.slots[moved.slot_index()].order_index = order_index as u32;
        }
        self.by_id.remove(&cell.id);
        Ok(cell)
    }

    #[inline]
    pub fn get(&self, key: CellKey) -> Option<&Cell> {
        self.slots
            .get(key.slot_index())
            .filter(|s| s.generation == key.generation)
            .and_then(|s| s.cell.as_ref())
    }

    #[inline]
    pub fn get_mut(&mut self, key: CellKey) -> Option<&mut Cell> {
        self.slots
            .get_mut(key.slot_index())
            .filter(|s| s.generation == key.generation)
            .and_then(|s| s.cell.as_mut())
    }

    pub fn require(&self, key: CellKey) -> AgentResult<&Cell> {
        self.get(key).ok_or(AgentError::StaleKey(key))
    }

    pub fn require_mut(&mut self, key: CellKey) -> AgentResult<&mut Cell> {
        self.get_mut(key).ok_or(AgentError::StaleKey(key))
    }

    /// Mutable access to two distinct cells at once.
    pub fn get_pair_mut(&mut self, a: CellKey, b: CellKey) -> Option<(&mut Cell, &mut Cell)> {
        if a.slot == b.slot || self.get(a).is_none() || self.get(b).is_none() {
            return None;
        }
        let (lo, hi, swapped) = if a.slot < b.slot { (a, b, false) } else { (b, a, true) };
        let (left, right) = self.slots.split_at_mut(hi.slot_index());
        let x = left[lo.slot_index()].cell.as_mut()?;
        let y = right[0].cell.as_mut()?;
        Some(if swapped { (y, x) } else { (x, y) })
    }

    #[inline]
    pub fn key_of(&self, id: CellId) -> Option<CellKey> {
        self.by_id.get(&id).copied()
    }

    pub fn get_by_id(&self, id: CellId) -> Option<&Cell> {
        self.key_of(id).and_then(|k| self.get(k))
    }

    pub fn get_by_id_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        let key = self.key_of(id)?;
        self.get_mut(key)
    }

    #[inline]
    pub fn contains_id(&self, id: CellId) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Keys in population order.
    #[inline]
    pub fn keys(&self) -> &[CellKey] {
        &self.order
    }

    /// `(key, cell)` pairs in population order.
    pub fn iter(&self) -> impl Iterator<Item = (CellKey, &Cell)> + '_ {
        self.order.iter().filter_map(|&k| self.get(k).map(|c| (k, c)))
    }

    /// All live cells in arena order.
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> + '_ {
        self.slots.iter_mut().filter_map(|s| s.cell.as_mut())
    }

    /// Raw arena, for data-parallel passes.  Empty slots have no cell.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    #[inline]
    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    /// Key of the cell in `slots()[index]`, if occupied.
    pub fn key_at_slot(&self, index: usize) -> Option<CellKey> {
        let s = self.slots.get(index)?;
        s.cell.as_ref().map(|_| CellKey::new(index as u32, s.generation))
    }

    /// Ids of all live cells in ascending order.
    pub fn sorted_ids(&self) -> Vec<CellId> {
        let mut ids: Vec<CellId> = self.by_id.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// The id the next insertion will receive.
    #[inline]
    pub fn next_id(&self) -> CellId {
        CellId(self.next_id)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
