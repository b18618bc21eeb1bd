//! `mc-spatial` — mechanics voxel mesh and the per-voxel cell index.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                        |
//! |------------|-----------------------------------------------------------------|
//! | [`mesh`]   | `CartesianMesh` (voxel indexing, Moore lists), `DomainFace`     |
//! | [`grid`]   | `CellGrid`: one locked bucket of `CellKey`s per voxel           |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`                              |
//!
//! # Invariant
//!
//! Every live, in-domain cell appears in exactly one bucket, and the voxel
//! handle stored on the cell names that bucket.  The grid stores handles
//! only; it never owns cells.  Keeping the handle on the cell in sync is the
//! caller's job (`mc-population` and `mc-mechanics`).
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `DomainFace`.           |

pub mod error;
pub mod grid;
pub mod mesh;

#[cfg(test)]
mod tests;

pub use error::{SpatialError, SpatialResult};
pub use grid::CellGrid;
pub use mesh::{CartesianMesh, DomainFace};
