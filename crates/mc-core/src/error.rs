//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `McError` as one variant
//! via `#[from]`.

use thiserror::Error;

use crate::{CellId, CellTypeId};

#[derive(Debug, Error)]
pub enum McError {
    #[error("cell {0} not found")]
    CellNotFound(CellId),

    #[error("unknown cell type {0}")]
    UnknownCellType(CellTypeId),

    #[error("unknown cell type name {0:?}")]
    UnknownCellTypeName(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `mc-*` crates.
pub type McResult<T> = Result<T, McError>;
