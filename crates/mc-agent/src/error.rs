use mc_core::{CellId, CellKey, McError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("stale or unknown cell handle {0}")]
    StaleKey(CellKey),

    #[error("cell {0} not found")]
    UnknownCell(CellId),

    #[error("cell type {0:?} is already defined")]
    DuplicateCellType(String),

    #[error("death model index {0} does not exist")]
    UnknownDeathModel(usize),

    #[error("cycle model {model:?} has no transition {from} -> {to}")]
    UnknownTransition { model: String, from: usize, to: usize },

    #[error("cycle model {model:?} has no phase {phase}")]
    UnknownPhase { model: String, phase: usize },

    #[error("custom variable {0:?} is not defined")]
    UnknownCustomVariable(String),

    #[error("cell is dead; its cycle model can no longer be changed")]
    CellIsDead,

    #[error(transparent)]
    Core(#[from] McError),
}

pub type AgentResult<T> = Result<T, AgentError>;
