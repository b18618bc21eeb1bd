//! Cycle models as directed phase graphs.
//!
//! A [`CycleModel`] is an immutable graph shared by every cell that uses it
//! (`Arc<CycleModel>`).  The per-cell part, [`CycleState`], holds the current
//! phase, the time spent in it and a private copy of the transition rates so
//! behaviors can change one cell's rates without touching the others.
//!
//! Death processes are cycle models too: a dying cell is switched onto the
//! death model's graph and never returns.

use std::fmt;
use std::sync::Arc;

use rand::Rng;

use crate::{AgentError, AgentResult, Phenotype};

// ── Hooks ─────────────────────────────────────────────────────────────────────

/// User code run on a phase entry or a link exit.
pub trait PhaseCallback: Send + Sync {
    fn call(&self, phenotype: &mut Phenotype, dt: f64);
}

/// User predicate that holds a transition back while it returns `true`.
pub trait ArrestCallback: Send + Sync {
    fn arrested(&self, phenotype: &Phenotype, dt: f64) -> bool;
}

/// Function run when a phase is entered or a link is taken.
#[derive(Clone, Default)]
pub enum PhaseHook {
    #[default]
    None,
    /// Double the solid volume targets so the cell grows toward division.
    DoubleBiomassTarget,
    /// Shrink toward zero at the apoptotic death rates.
    ApoptosisEntry,
    /// Swell toward an all-fluid cell at the necrotic death rates.
    NecrosisSwellingEntry,
    /// Lose the fluid of a ruptured necrotic cell.
    LysisEntry,
    Custom(Arc<dyn PhaseCallback>),
}

impl PhaseHook {
    pub fn run(&self, phenotype: &mut Phenotype, dt: f64) {
        match self {
            PhaseHook::None => {}
            PhaseHook::DoubleBiomassTarget => {
                phenotype.volume.target_solid_nuclear *= 2.0;
                phenotype.volume.target_solid_cytoplasmic *= 2.0;
            }
            PhaseHook::ApoptosisEntry => death_volume_targets(phenotype, 0.0, false),
            PhaseHook::NecrosisSwellingEntry => death_volume_targets(phenotype, 1.0, false),
            PhaseHook::LysisEntry => death_volume_targets(phenotype, 0.0, true),
            PhaseHook::Custom(cb) => cb.call(phenotype, dt),
        }
    }
}

impl fmt::Debug for PhaseHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseHook::None => f.write_str("None"),
            PhaseHook::DoubleBiomassTarget => f.write_str("DoubleBiomassTarget"),
            PhaseHook::ApoptosisEntry => f.write_str("ApoptosisEntry"),
            PhaseHook::NecrosisSwellingEntry => f.write_str("NecrosisSwellingEntry"),
            PhaseHook::LysisEntry => f.write_str("LysisEntry"),
            PhaseHook::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Shared body of the built-in death entry hooks.  Reads the parameters of
/// the cell's current death model; does nothing on a live cell.
fn death_volume_targets(phenotype: &mut Phenotype, target_fluid_fraction: f64, lysed: bool) {
    let Some(params) = phenotype.death.current_parameters().cloned() else {
        return;
    };
    let v = &mut phenotype.volume;
    v.target_fluid_fraction = target_fluid_fraction;
    v.target_solid_cytoplasmic = 0.0;
    v.target_solid_nuclear = 0.0;
    v.target_cytoplasmic_to_nuclear_ratio = 0.0;
    v.cytoplasmic_biomass_change_rate = params.cytoplasmic_biomass_change_rate;
    v.nuclear_biomass_change_rate = params.nuclear_biomass_change_rate;
    v.calcification_rate = params.calcification_rate;
    if lysed {
        v.fluid_change_rate = params.lysed_fluid_change_rate;
        v.relative_rupture_volume = 9e9;
    } else {
        v.fluid_change_rate = params.unlysed_fluid_change_rate;
        v.relative_rupture_volume = params.relative_rupture_volume;
    }
    v.rupture_volume = v.relative_rupture_volume * v.total;
}

/// Condition that blocks a link while it holds.
#[derive(Clone)]
pub enum ArrestCondition {
    /// Arrested while the cell is smaller than its rupture volume (necrotic
    /// swelling).
    BelowRuptureVolume,
    Custom(Arc<dyn ArrestCallback>),
}

impl ArrestCondition {
    pub fn is_arrested(&self, phenotype: &Phenotype, dt: f64) -> bool {
        match self {
            ArrestCondition::BelowRuptureVolume => {
                phenotype.volume.total < phenotype.volume.rupture_volume
            }
            ArrestCondition::Custom(cb) => cb.arrested(phenotype, dt),
        }
    }
}

impl fmt::Debug for ArrestCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrestCondition::BelowRuptureVolume => f.write_str("BelowRuptureVolume"),
            ArrestCondition::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Phase {
    pub name:             String,
    pub code:             i32,
    pub division_at_exit: bool,
    pub removal_at_exit:  bool,
    pub entry:            PhaseHook,
}

/// Directed edge of the phase graph.
#[derive(Clone, Debug)]
pub struct PhaseLink {
    pub to:             usize,
    /// Rate copied into every new [`CycleState`], in 1/min.
    pub default_rate:   f64,
    /// Leave after exactly `1 / rate` minutes instead of stochastically.
    pub fixed_duration: bool,
    pub arrest:         Option<ArrestCondition>,
    pub exit:           PhaseHook,
}

#[derive(Clone, Debug)]
pub struct CycleModel {
    pub name: String,
    pub code: i32,
    phases:   Vec<Phase>,
    links:    Vec<Vec<PhaseLink>>,
}

impl CycleModel {
    pub fn new(name: impl Into<String>, code: i32) -> Self {
        Self { name: name.into(), code, phases: Vec::new(), links: Vec::new() }
    }

    /// Append a phase and return its index.
    pub fn add_phase(&mut self, name: impl Into<String>, code: i32) -> usize {
        self.phases.push(Phase {
            name: name.into(),
            code,
            division_at_exit: false,
            removal_at_exit: false,
            entry: PhaseHook::None,
        });
        self.links.push(Vec::new());
        self.phases.len() - 1
    }

    /// Append a link `from -> to` with a default rate.  Links out of one
    /// phase are evaluated in the order they were added.
    pub fn add_link(&mut self, from: usize, to: usize, rate: f64) -> AgentResult<&mut PhaseLink> {
        if to >= self.phases.len() {
            return Err(AgentError::UnknownPhase { model: self.name.clone(), phase: to });
        }
        let name = self.name.clone();
        let out = self
            .links
            .get_mut(from)
            .ok_or(AgentError::UnknownPhase { model: name, phase: from })?;
        out.push(PhaseLink {
            to,
            default_rate: rate,
            fixed_duration: false,
            arrest: None,
            exit: PhaseHook::None,
        });
        let last = out.len() - 1;
        Ok(&mut out[last])
    }

    #[inline]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn phase(&self, index: usize) -> Option<&Phase> {
        self.phases.get(index)
    }

    pub fn phase_mut(&mut self, index: usize) -> AgentResult<&mut Phase> {
        let name = self.name.clone();
        self.phases.get_mut(index).ok_or(AgentError::UnknownPhase { model: name, phase: index })
    }

    /// Outgoing links of `phase`.  Empty for a terminal or unknown phase.
    pub fn links(&self, phase: usize) -> &[PhaseLink] {
        self.links.get(phase).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Position of the `from -> to` link within `links(from)`.
    pub fn link_index(&self, from: usize, to: usize) -> Option<usize> {
        self.links(from).iter().position(|l| l.to == to)
    }

    pub fn phase_index_by_code(&self, code: i32) -> Option<usize> {
        self.phases.iter().position(|p| p.code == code)
    }
}

// ── Per-cell state ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct CycleState {
    model:             Arc<CycleModel>,
    /// `rates[phase][k]` belongs to `model.links(phase)[k]`.
    rates:             Vec<Vec<f64>>,
    pub current_phase: usize,
    /// Minutes spent in the current phase.
    pub elapsed:       f64,
}

impl CycleState {
    /// Start at phase 0 with the model's default rates.
    pub fn new(model: Arc<CycleModel>) -> Self {
        let rates = (0..model.phases.len())
            .map(|p| model.links(p).iter().map(|l| l.default_rate).collect())
            .collect();
        Self { model, rates, current_phase: 0, elapsed: 0.0 }
    }

    #[inline]
    pub fn model(&self) -> &Arc<CycleModel> {
        &self.model
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.model.phase(self.current_phase)
    }

    /// Code of the current phase, `-1` if the model has no phases.
    pub fn phase_code(&self) -> i32 {
        self.current_phase().map(|p| p.code).unwrap_or(-1)
    }

    pub fn transition_rate(&self, from: usize, to: usize) -> Option<f64> {
        let k = self.model.link_index(from, to)?;
        Some(self.rates[from][k])
    }

    pub fn transition_rate_mut(&mut self, from: usize, to: usize) -> Option<&mut f64> {
        let k = self.model.link_index(from, to)?;
        Some(&mut self.rates[from][k])
    }

    pub fn set_transition_rate(&mut self, from: usize, to: usize, rate: f64) -> AgentResult<()> {
        let model = self.model.name.clone();
        let slot = self
            .transition_rate_mut(from, to)
            .ok_or(AgentError::UnknownTransition { model, from, to })?;
        *slot = rate;
        Ok(())
    }

    #[inline]
    pub(crate) fn rate_at(&self, phase: usize, link: usize) -> f64 {
        self.rates.get(phase).and_then(|r| r.get(link)).copied().unwrap_or(0.0)
    }
}

/// Probability that an exponential waiting time with the given rate ends
/// within `dt`.
#[inline]
pub fn exit_probability(rate: f64, dt: f64) -> f64 {
    if rate <= 0.0 {
        0.0
    } else {
        1.0 - (-rate * dt).exp()
    }
}

impl Phenotype {
    /// Advance the cycle by one phenotype step.
    ///
    /// At most one transition is taken.  Leaving a phase marked
    /// `division_at_exit` sets [`Phenotype::flagged_for_division`]; leaving one
    /// marked `removal_at_exit` sets [`Phenotype::flagged_for_removal`] and
    /// leaves the cell in that phase.
    pub fn advance_cycle<R: Rng + ?Sized>(&mut self, rng: &mut R, dt: f64) {
        let model = Arc::clone(&self.cycle.model);
        let i = self.cycle.current_phase;
        self.cycle.elapsed += dt;

        for (k, link) in model.links(i).iter().enumerate() {
            if link.arrest.as_ref().is_some_and(|a| a.is_arrested(self, dt)) {
                continue;
            }
            let rate = self.cycle.rate_at(i, k);
            let fire = if link.fixed_duration {
                rate > 0.0 && self.cycle.elapsed > 1.0 / rate - 0.5 * dt
            } else {
                rate > 0.0 && rng.r#gen::<f64>() < exit_probability(rate, dt)
            };
            if !fire {
                continue;
            }

            link.exit.run(self, dt);
            if let Some(phase) = model.phase(i) {
                if phase.division_at_exit {
                    self.flagged_for_division = true;
                }
                if phase.removal_at_exit {
                    self.flagged_for_removal = true;
                    return;
                }
            }
            self.cycle.current_phase = link.to;
            self.cycle.elapsed = 0.0;
            if let Some(next) = model.phase(link.to) {
                next.entry.run(self, dt);
            }
            return;
        }
    }
}
