//! Spatial-subsystem error type.

use thiserror::Error;

use mc_core::{CellKey, VoxelIndex};

/// Errors produced by `mc-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The position lies outside the domain plus its tolerance.  Callers
    /// recover by flagging the cell out-of-domain.
    #[error("position ({x}, {y}, {z}) is outside the domain")]
    OutOfDomain { x: f64, y: f64, z: f64 },

    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    #[error("voxel {0} is outside the mesh")]
    VoxelOutOfRange(VoxelIndex),

    #[error("{key} is not in the bucket of voxel {voxel}")]
    NotInBucket { key: CellKey, voxel: VoxelIndex },
}

impl SpatialError {
    pub fn is_out_of_domain(&self) -> bool {
        matches!(self, SpatialError::OutOfDomain { .. })
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
