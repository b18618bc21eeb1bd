use mc_agent::AgentError;
use mc_core::{CellId, CellKey};
use mc_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopulationError {
    #[error("cell {0} has not been positioned")]
    NotPositioned(CellKey),

    #[error("cell {0} cannot divide: {1}")]
    CannotDivide(CellId, &'static str),

    #[error("population inconsistent: {0}")]
    Inconsistent(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}

pub type PopulationResult<T> = Result<T, PopulationError>;
