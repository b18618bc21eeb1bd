//! The `CellBehavior` trait, the main extension point for user code.

use mc_agent::{Motility, Phenotype};
use mc_core::{CellRng, Vec3};

use crate::{CellAction, CellView, PhenotypeContext};

/// Pluggable per-cell-type behavior.
///
/// Every method has a no-op default, so a type that only needs, say, an
/// oxygen-dependent death rate implements just
/// [`update_phenotype`][Self::update_phenotype].
///
/// # Thread safety
///
/// mc-sim calls these methods for many cells in parallel, so implementations
/// must be `Send + Sync`.  Per-cell state belongs in the cell's
/// [`CustomData`](mc_agent::CustomData), not in the behavior.  Resolve custom
/// variable and substrate indices once when the behavior is built.
///
/// # Example
///
/// ```rust,ignore
/// struct HypoxicDeath { oxygen: SubstrateId, threshold: f64 }
///
/// impl CellBehavior for HypoxicDeath {
///     fn update_phenotype(
///         &self,
///         cell:      &CellView<'_>,
///         phenotype: &mut Phenotype,
///         ctx:       &PhenotypeContext<'_>,
///         _rng:      &mut CellRng,
///     ) -> Vec<CellAction> {
///         if ctx.concentration(cell, self.oxygen) < self.threshold {
///             return vec![CellAction::Die(1)];
///         }
///         vec![]
///     }
/// }
/// ```
pub trait CellBehavior: Send + Sync + 'static {
    /// Called once per phenotype step for every live cell, before the cycle
    /// advances.  Not called for dead cells.
    ///
    /// May change rates, secretion and custom data on `phenotype`.
    fn update_phenotype(
        &self,
        _cell:      &CellView<'_>,
        _phenotype: &mut Phenotype,
        _ctx:       &PhenotypeContext<'_>,
        _rng:       &mut CellRng,
    ) -> Vec<CellAction> {
        vec![]
    }

    /// Called on the custom timer for every in-play cell, dead or alive.
    fn custom_rule(
        &self,
        _cell:      &CellView<'_>,
        _phenotype: &mut Phenotype,
        _ctx:       &PhenotypeContext<'_>,
        _rng:       &mut CellRng,
    ) -> Vec<CellAction> {
        vec![]
    }

    /// Called during the mechanics pass, before the motility direction is
    /// resampled.  Only called for motile cells.
    fn update_migration_bias(
        &self,
        _cell:     &CellView<'_>,
        _motility: &mut Motility,
        _ctx:      &PhenotypeContext<'_>,
    ) {
    }

    /// Distance from `position` to the basement membrane and the unit normal
    /// pointing from the membrane towards the cell.  `None` means there is
    /// no membrane.
    fn distance_to_membrane(&self, _position: &Vec3) -> Option<(f64, Vec3)> {
        None
    }
}
