use mc_agent::AgentError;
use mc_behavior::BehaviorError;
use mc_core::McError;
use mc_mechanics::MechanicsError;
use mc_population::PopulationError;
use mc_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("placement {index}: unknown cell type {name:?}")]
    UnknownCellType { index: usize, name: String },

    #[error("simulation has already stopped")]
    Stopped,

    #[error("could not build the worker pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Core(#[from] McError),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error("behavior error: {0}")]
    Behavior(#[from] BehaviorError),

    #[error("mechanics error: {0}")]
    Mechanics(#[from] MechanicsError),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),
}

pub type SimResult<T> = Result<T, SimError>;
