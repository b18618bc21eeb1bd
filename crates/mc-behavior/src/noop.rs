//! A no-op behavior: cells follow their phenotype defaults only.

use crate::CellBehavior;

/// A [`CellBehavior`] that uses every default.
///
/// Useful as the registry default and in tests, where cells should cycle,
/// die and move purely by their phenotype parameters.
pub struct NoopBehavior;

impl CellBehavior for NoopBehavior {}
