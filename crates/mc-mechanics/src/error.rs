use thiserror::Error;

use mc_population::PopulationError;
use mc_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum MechanicsError {
    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error("invalid mechanics time step {0}")]
    InvalidTimeStep(f64),
}

pub type MechanicsResult<T> = Result<T, MechanicsError>;
