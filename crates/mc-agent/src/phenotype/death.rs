//! Death models and their rates.

use std::sync::Arc;

use rand::Rng;

use super::cycle::{CycleModel, exit_probability};

/// Volume-change parameters applied by a death model's entry hooks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathParameters {
    pub unlysed_fluid_change_rate:       f64,
    pub lysed_fluid_change_rate:         f64,
    pub cytoplasmic_biomass_change_rate: f64,
    pub nuclear_biomass_change_rate:     f64,
    pub calcification_rate:              f64,
    pub relative_rupture_volume:         f64,
}

impl DeathParameters {
    pub fn apoptosis() -> Self {
        Self {
            unlysed_fluid_change_rate:       3.0 / 60.0,
            lysed_fluid_change_rate:         0.0,
            cytoplasmic_biomass_change_rate: 1.0 / 60.0,
            nuclear_biomass_change_rate:     0.35 / 60.0,
            calcification_rate:              0.0,
            relative_rupture_volume:         2.0,
        }
    }

    pub fn necrosis() -> Self {
        Self {
            unlysed_fluid_change_rate:       0.05 / 60.0,
            lysed_fluid_change_rate:         0.0,
            cytoplasmic_biomass_change_rate: 0.0166 / 60.0,
            nuclear_biomass_change_rate:     0.0055 / 60.0,
            calcification_rate:              0.0042 / 60.0,
            relative_rupture_volume:         2.0,
        }
    }
}

impl Default for DeathParameters {
    fn default() -> Self {
        Self::apoptosis()
    }
}

#[derive(Clone, Debug)]
pub struct DeathModel {
    pub model:      Arc<CycleModel>,
    pub parameters: DeathParameters,
}

/// Death sub-record of a phenotype.
///
/// `rates[i]` is the per-minute rate of entering `models[i]`.
#[derive(Clone, Debug, Default)]
pub struct Death {
    pub rates:     Vec<f64>,
    pub models:    Vec<DeathModel>,
    pub dead:      bool,
    current_model: Option<usize>,
}

impl Death {
    /// Register a death model and return its index.
    pub fn add_death_model(
        &mut self,
        rate: f64,
        model: Arc<CycleModel>,
        parameters: DeathParameters,
    ) -> usize {
        self.rates.push(rate);
        self.models.push(DeathModel { model, parameters });
        self.models.len() - 1
    }

    /// Index of the death model whose cycle model has this name.
    pub fn find_model(&self, name: &str) -> Option<usize> {
        self.models.iter().position(|m| m.model.name == name)
    }

    /// Index of the death model whose cycle model has this code.
    pub fn find_model_by_code(&self, code: i32) -> Option<usize> {
        self.models.iter().position(|m| m.model.code == code)
    }

    /// Mutable rate of the model with the given code, e.g.
    /// `death.rate_by_code_mut(APOPTOSIS_MODEL)`.
    pub fn rate_by_code_mut(&mut self, code: i32) -> Option<&mut f64> {
        let i = self.find_model_by_code(code)?;
        self.rates.get_mut(i)
    }

    #[inline]
    pub fn current_model(&self) -> Option<usize> {
        self.current_model
    }

    pub fn current_parameters(&self) -> Option<&DeathParameters> {
        self.current_model.and_then(|i| self.models.get(i)).map(|m| &m.parameters)
    }

    /// Draw once per model in registration order.  Returns the first model
    /// that fires, or `None` if the cell survives this step or is already
    /// dead.  Does not change any state.
    pub fn check_for_death<R: Rng + ?Sized>(&self, rng: &mut R, dt: f64) -> Option<usize> {
        if self.dead {
            return None;
        }
        self.rates.iter().position(|&rate| {
            rate > 0.0 && rng.r#gen::<f64>() < exit_probability(rate, dt)
        })
    }

    pub(crate) fn mark(&mut self, model: usize) {
        self.dead = true;
        self.current_model = Some(model);
    }
}
