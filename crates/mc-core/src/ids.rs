//! Strongly typed identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash`.  The inner integer is `pub` so arena and
//! grid code can index `Vec`s directly, but callers should prefer `.index()`.
//!
//! Two kinds of cell reference exist and must not be confused:
//!
//! - [`CellId`] is the cell's *identity*: issued once, strictly increasing,
//!   never reused.  Attachment lists and output rows use it.
//! - [`CellKey`] is the cell's *arena handle*: a slot index plus a
//!   generation counter.  It is cheap to dereference and detects stale
//!   handles after the slot has been recycled.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Unique cell identity.  Issued in strictly increasing order by the
    /// cell store and never reused within one simulation.
    pub struct CellId(u64);
}

typed_id! {
    /// Index of a cell definition (type template) in `CellDefinitions`.
    pub struct CellTypeId(u16);
}

typed_id! {
    /// Linear index of a mechanics voxel: `i + nx * (j + ny * k)`.
    pub struct VoxelIndex(u32);
}

typed_id! {
    /// Index of a diffusing substrate in the microenvironment.
    pub struct SubstrateId(u16);
}

// ── CellKey ───────────────────────────────────────────────────────────────────

/// Generational arena handle for a live cell.
///
/// `slot` indexes the arena; `generation` must match the slot's current
/// generation for the handle to resolve.  Removing a cell bumps the slot's
/// generation, so any `CellKey` still held elsewhere becomes stale instead of
/// silently aliasing the next occupant.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellKey {
    pub slot:       u32,
    pub generation: u32,
}

impl CellKey {
    #[inline(always)]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    #[inline(always)]
    pub fn slot_index(self) -> usize {
        self.slot as usize
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CellKey({}v{})", self.slot, self.generation)
    }
}
