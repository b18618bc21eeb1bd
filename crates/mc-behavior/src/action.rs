//! Population changes a behavior can request.

use mc_core::CellId;

/// A change a cell asks for during the phenotype or custom pass.
///
/// Actions are produced by [`CellBehavior`][crate::CellBehavior] callbacks
/// and applied by mc-sim at the next synchronisation point.  Several actions
/// may be returned at once; they are applied in order, and actions on a cell
/// that has already been removed in the same sync point are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellAction {
    /// Split now, independent of the cycle model.
    Divide,

    /// Enter the death model at this index of `phenotype.death`.
    Die(usize),

    /// Erase the cell immediately, without a death process.
    Remove,

    /// Attach to another cell (symmetric, subject to attachment limits).
    Attach(CellId),

    /// Break one attachment.
    Detach(CellId),

    /// Break every attachment.
    DetachAll,

    /// Toggle whether mechanics integrates this cell's position.
    SetMovable(bool),
}

impl CellAction {
    /// `true` for actions that end or replace the cell.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Die(_) | Self::Remove)
    }
}
