//! The phenotype: every behavioral sub-state of one cell.

pub mod custom;
pub mod cycle;
pub mod death;
pub mod mechanics;
pub mod motility;
pub mod secretion;
pub mod volume;

use std::sync::Arc;

use tracing::trace;

use crate::{AgentError, AgentResult, StandardModels};

pub use custom::CustomData;
pub use cycle::{ArrestCallback, ArrestCondition, CycleModel, CycleState, Phase, PhaseCallback, PhaseHook, PhaseLink};
pub use death::{Death, DeathModel, DeathParameters};
pub use mechanics::MechanicsParams;
pub use motility::Motility;
pub use secretion::Secretion;
pub use volume::{Geometry, Volume};

/// Uptake multiplier applied when a cell dies.
const DEATH_UPTAKE_FACTOR: f64 = 0.1;

#[derive(Clone, Debug)]
pub struct Phenotype {
    pub cycle:     CycleState,
    pub death:     Death,
    pub volume:    Volume,
    pub geometry:  Geometry,
    pub mechanics: MechanicsParams,
    pub motility:  Motility,
    pub secretion: Secretion,
    pub custom:    CustomData,

    /// Set by the cycle when a `division_at_exit` phase ends.  Consumed at
    /// the next synchronisation point.
    pub flagged_for_division: bool,
    /// Set by the cycle when a `removal_at_exit` phase ends.
    pub flagged_for_removal:  bool,
}

impl Phenotype {
    /// MCF-7 reference phenotype on the given cycle model, with the standard
    /// death models.
    pub fn new(cycle_model: Arc<CycleModel>, models: &StandardModels) -> Self {
        Self {
            cycle:     CycleState::new(cycle_model),
            death:     models.default_death(),
            volume:    Volume::default(),
            geometry:  Geometry::default(),
            mechanics: MechanicsParams::default(),
            motility:  Motility::default(),
            secretion: Secretion::default(),
            custom:    CustomData::default(),
            flagged_for_division: false,
            flagged_for_removal:  false,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.death.dead
    }

    /// Put a live cell on a different cycle model, starting at phase 0.
    pub fn set_cycle_model(&mut self, model: Arc<CycleModel>) -> AgentResult<()> {
        if self.is_dead() {
            return Err(AgentError::CellIsDead);
        }
        self.cycle = CycleState::new(model);
        Ok(())
    }

    /// Enter death model `model`.
    ///
    /// Switches the cycle onto the death model's graph and runs its first
    /// phase's entry hook, stops motility, zeroes secretion and cuts uptake
    /// to a tenth.  A pending division is cancelled.  Already-dead cells are
    /// left untouched and `Ok(false)` is returned.
    pub fn start_death(&mut self, model: usize, dt: f64) -> AgentResult<bool> {
        if self.is_dead() {
            return Ok(false);
        }
        let cycle_model = self
            .death
            .models
            .get(model)
            .map(|m| Arc::clone(&m.model))
            .ok_or(AgentError::UnknownDeathModel(model))?;

        self.death.mark(model);
        self.cycle = CycleState::new(Arc::clone(&cycle_model));
        self.flagged_for_division = false;

        self.motility.disable();
        self.secretion.set_all_secretion_to_zero();
        self.secretion.scale_all_uptake_by_factor(DEATH_UPTAKE_FACTOR);

        if let Some(first) = cycle_model.phase(0) {
            first.entry.run(self, dt);
        }
        trace!(model = %cycle_model.name, "cell entered death model");
        Ok(true)
    }

    /// Volume relaxation step followed by the geometry refresh.
    pub fn update_volume(&mut self, dt: f64) {
        self.volume.update(dt);
        self.geometry.update(&self.volume);
    }

    /// Halve volume for division and clear the division flag.
    pub fn divide(&mut self) {
        self.volume.divide();
        self.geometry.update(&self.volume);
        self.flagged_for_division = false;
    }
}
