//! The seam between the cell core and the diffusion-decay solver.
//!
//! The solver's numerics are not part of this workspace.  The scheduler only
//! needs three things from it: substrate names, the concentrations a cell
//! sees at its position, and a step function that consumes the cells'
//! secretion/uptake as source and sink terms.

use tracing::instrument;

use crate::{SubstrateId, Vec3};

/// Source/sink contribution of one cell for one diffusion step.
///
/// All rate vectors are indexed by [`SubstrateId`] and have one entry per
/// substrate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SourceSink {
    pub position:   Vec3,
    /// Cell volume in cubic microns.
    pub volume:     f64,
    pub secretion:  Vec<f64>,
    pub saturation: Vec<f64>,
    pub uptake:     Vec<f64>,
    /// Net export in substance per minute, independent of concentration.
    pub net_export: Vec<f64>,
}

/// Diffusion-decay collaborator.
///
/// Implementations must be `Send + Sync`: phenotype callbacks read
/// concentrations from many threads at once.
pub trait Microenvironment: Send + Sync {
    /// Names of the substrates, indexed by [`SubstrateId`].
    fn substrate_names(&self) -> &[String];

    /// Concentration of one substrate at `position`.
    fn concentration_at(&self, position: &Vec3, substrate: SubstrateId) -> f64;

    /// Advance the transport field by `dt` minutes with the given cell sources.
    fn simulate_diffusion_decay(&mut self, dt: f64, sources: &[SourceSink]);

    fn substrate_count(&self) -> usize {
        self.substrate_names().len()
    }

    /// Resolve a substrate name.  Meant to be called once at setup time.
    fn substrate_index(&self, name: &str) -> Option<SubstrateId> {
        self.substrate_names()
            .iter()
            .position(|n| n == name)
            .and_then(|i| SubstrateId::try_from(i).ok())
    }

    /// All concentrations at `position`, indexed by [`SubstrateId`].
    fn concentrations_at(&self, position: &Vec3) -> Vec<f64> {
        (0..self.substrate_count())
            .map(|i| self.concentration_at(position, SubstrateId(i as u16)))
            .collect()
    }
}

// ── NoMicroenvironment ────────────────────────────────────────────────────────

/// A microenvironment with no substrates.  Every step is a no-op.
#[derive(Clone, Debug, Default)]
pub struct NoMicroenvironment;

impl Microenvironment for NoMicroenvironment {
    fn substrate_names(&self) -> &[String] {
        &[]
    }

    fn concentration_at(&self, _position: &Vec3, _substrate: SubstrateId) -> f64 {
        0.0
    }

    fn simulate_diffusion_decay(&mut self, _dt: f64, _sources: &[SourceSink]) {}
}

// ── UniformMicroenvironment ───────────────────────────────────────────────────

/// Well-mixed microenvironment: one concentration per substrate for the whole
/// domain.
///
/// Per substrate, with `a = V_cell / V_domain`:
///
/// ```text
/// dC/dt = -λ C + k (C_b - C) + Σ a (S (C* - C) - U C) + Σ E / V_domain
/// ```
///
/// integrated with a linearly implicit step so large uptake rates cannot push
/// `C` negative.  `k` and `C_b` describe an optional far-field supply.
#[derive(Clone, Debug)]
pub struct UniformMicroenvironment {
    names:          Vec<String>,
    concentrations: Vec<f64>,
    decay_rates:    Vec<f64>,
    supply_rates:   Vec<f64>,
    supply_values:  Vec<f64>,
    domain_volume:  f64,
}

impl UniformMicroenvironment {
    /// Create a field with the given substrates, all at concentration 0 with
    /// no decay and no supply.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>, domain_volume: f64) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let n = names.len();
        Self {
            names,
            concentrations: vec![0.0; n],
            decay_rates:    vec![0.0; n],
            supply_rates:   vec![0.0; n],
            supply_values:  vec![0.0; n],
            domain_volume:  domain_volume.max(f64::MIN_POSITIVE),
        }
    }

    pub fn set_concentration(&mut self, substrate: SubstrateId, value: f64) {
        if let Some(c) = self.concentrations.get_mut(substrate.index()) {
            *c = value.max(0.0);
        }
    }

    pub fn set_decay_rate(&mut self, substrate: SubstrateId, rate: f64) {
        if let Some(r) = self.decay_rates.get_mut(substrate.index()) {
            *r = rate.max(0.0);
        }
    }

    /// Relax towards `value` at `rate` per minute (a far-field boundary).
    pub fn set_supply(&mut self, substrate: SubstrateId, value: f64, rate: f64) {
        let i = substrate.index();
        if i < self.names.len() {
            self.supply_values[i] = value.max(0.0);
            self.supply_rates[i] = rate.max(0.0);
        }
    }

    pub fn concentrations(&self) -> &[f64] {
        &self.concentrations
    }
}

impl Microenvironment for UniformMicroenvironment {
    fn substrate_names(&self) -> &[String] {
        &self.names
    }

    fn concentration_at(&self, _position: &Vec3, substrate: SubstrateId) -> f64 {
        self.concentrations.get(substrate.index()).copied().unwrap_or(0.0)
    }

    #[instrument(skip_all, fields(sources = sources.len()))]
    fn simulate_diffusion_decay(&mut self, dt: f64, sources: &[SourceSink]) {
        for i in 0..self.names.len() {
            // explicit part
            let mut gain = self.supply_rates[i] * self.supply_values[i];
            // implicit (linear in C) part
            let mut loss = self.decay_rates[i] + self.supply_rates[i];

            for s in sources {
                let a = s.volume / self.domain_volume;
                let sec = s.secretion.get(i).copied().unwrap_or(0.0);
                let sat = s.saturation.get(i).copied().unwrap_or(0.0);
                let upt = s.uptake.get(i).copied().unwrap_or(0.0);
                let exp = s.net_export.get(i).copied().unwrap_or(0.0);
                gain += a * sec * sat + exp / self.domain_volume;
                loss += a * (sec + upt);
            }

            let c = self.concentrations[i];
            self.concentrations[i] = ((c + dt * gain) / (1.0 + dt * loss)).max(0.0);
        }
    }
}
