//! `mc-population` — the population manager.
//!
//! Owns the [`CellStore`](mc_agent::CellStore), the
//! [`CellGrid`](mc_spatial::CellGrid) and the cell definitions, and is the
//! only place where membership changes: creation, placement, division,
//! death, removal and attachments.  Every change keeps the grid and the
//! cells' voxel handles in agreement.
//!
//! # Crate layout
//!
//! | Module            | Contents                                                  |
//! |-------------------|-----------------------------------------------------------|
//! | [`population`]    | `Population`, `create`, `assign_position`, out-of-domain  |
//! | [`lifecycle`]     | `divide`, `mark_dead`, `finalize_removal`                 |
//! | [`attachments`]   | `attach`, `detach`, `remove_all_attachments`, healing     |
//! | [`consistency`]   | `check_consistency`                                       |
//! | [`error`]         | `PopulationError`, `PopulationResult<T>`                  |

pub mod attachments;
pub mod consistency;
pub mod error;
pub mod lifecycle;
pub mod population;

#[cfg(test)]
mod tests;

pub use error::{PopulationError, PopulationResult};
pub use lifecycle::DIVISION_OFFSET_FRACTION;
pub use population::{Placement, Population, PopulationCounts};
