//! Standard cycle and death models with reference rates (minutes).
//!
//! Build the set once per simulation with [`StandardModels::new`] and share
//! the `Arc`s between cell definitions.

use std::sync::Arc;

use crate::phenotype::cycle::{ArrestCondition, CycleModel, PhaseHook};
use crate::{AgentResult, Death, DeathParameters};

/// Model and phase codes, compatible with the usual MultiCellDS numbering.
pub mod codes {
    pub const ADVANCED_KI67_MODEL: i32 = 0;
    pub const BASIC_KI67_MODEL: i32 = 1;
    pub const FLOW_CYTOMETRY_MODEL: i32 = 2;
    pub const LIVE_MODEL: i32 = 5;
    pub const FLOW_CYTOMETRY_SEPARATED_MODEL: i32 = 6;
    pub const APOPTOSIS_MODEL: i32 = 100;
    pub const NECROSIS_MODEL: i32 = 101;

    pub const KI67_POSITIVE_PREMITOTIC: i32 = 0;
    pub const KI67_POSITIVE_POSTMITOTIC: i32 = 1;
    pub const KI67_POSITIVE: i32 = 2;
    pub const KI67_NEGATIVE: i32 = 3;
    pub const G0G1_PHASE: i32 = 4;
    pub const S_PHASE: i32 = 10;
    pub const G2M_PHASE: i32 = 11;
    pub const G2_PHASE: i32 = 12;
    pub const M_PHASE: i32 = 13;
    pub const LIVE: i32 = 14;
    pub const APOPTOTIC: i32 = 100;
    pub const NECROTIC_SWELLING: i32 = 101;
    pub const NECROTIC_LYSED: i32 = 102;
    pub const DEBRIS: i32 = 104;
}

use codes::*;

/// Default apoptosis rate of a fresh cell definition, 1/min.
pub const DEFAULT_APOPTOSIS_RATE: f64 = 0.00319 / 60.0;

pub fn ki67_basic() -> AgentResult<CycleModel> {
    let mut m = CycleModel::new("Ki67 (basic)", BASIC_KI67_MODEL);
    let neg = m.add_phase("Ki67-", KI67_NEGATIVE);
    let pos = m.add_phase("Ki67+", KI67_POSITIVE);
    m.phase_mut(pos)?.division_at_exit = true;
    m.phase_mut(pos)?.entry = PhaseHook::DoubleBiomassTarget;
    m.add_link(neg, pos, 1.0 / (4.59 * 60.0))?;
    m.add_link(pos, neg, 1.0 / (15.5 * 60.0))?.fixed_duration = true;
    Ok(m)
}

pub fn ki67_advanced() -> AgentResult<CycleModel> {
    let mut m = CycleModel::new("Ki67 (advanced)", ADVANCED_KI67_MODEL);
    let neg = m.add_phase("Ki67-", KI67_NEGATIVE);
    let pre = m.add_phase("Ki67+ (premitotic)", KI67_POSITIVE_PREMITOTIC);
    let post = m.add_phase("Ki67+ (postmitotic)", KI67_POSITIVE_POSTMITOTIC);
    m.phase_mut(pre)?.division_at_exit = true;
    m.phase_mut(pre)?.entry = PhaseHook::DoubleBiomassTarget;
    m.add_link(neg, pre, 1.0 / (3.62 * 60.0))?;
    m.add_link(pre, post, 1.0 / (13.0 * 60.0))?.fixed_duration = true;
    m.add_link(post, neg, 1.0 / (2.5 * 60.0))?.fixed_duration = true;
    Ok(m)
}

pub fn live() -> AgentResult<CycleModel> {
    let mut m = CycleModel::new("Live", LIVE_MODEL);
    let live = m.add_phase("Live", LIVE);
    m.phase_mut(live)?.division_at_exit = true;
    m.phase_mut(live)?.entry = PhaseHook::DoubleBiomassTarget;
    m.add_link(live, live, 0.0432 / 60.0)?;
    Ok(m)
}

pub fn flow_cytometry() -> AgentResult<CycleModel> {
    let mut m = CycleModel::new("Flow cytometry model (basic)", FLOW_CYTOMETRY_MODEL);
    let g0g1 = m.add_phase("G0/G1", G0G1_PHASE);
    let s = m.add_phase("S", S_PHASE);
    let g2m = m.add_phase("G2/M", G2M_PHASE);
    m.phase_mut(s)?.entry = PhaseHook::DoubleBiomassTarget;
    m.phase_mut(g2m)?.division_at_exit = true;
    m.add_link(g0g1, s, 0.00324)?;
    m.add_link(s, g2m, 0.00208)?;
    m.add_link(g2m, g0g1, 0.00333)?;
    Ok(m)
}

pub fn flow_cytometry_separated() -> AgentResult<CycleModel> {
    let mut m = CycleModel::new("Flow cytometry model (separated)", FLOW_CYTOMETRY_SEPARATED_MODEL);
    let g0g1 = m.add_phase("G0/G1", G0G1_PHASE);
    let s = m.add_phase("S", S_PHASE);
    let g2 = m.add_phase("G2", G2_PHASE);
    let mm = m.add_phase("M", M_PHASE);
    m.phase_mut(s)?.entry = PhaseHook::DoubleBiomassTarget;
    m.phase_mut(mm)?.division_at_exit = true;
    m.add_link(g0g1, s, 0.00335)?;
    m.add_link(s, g2, 0.00208)?;
    m.add_link(g2, mm, 0.00417)?;
    m.add_link(mm, g0g1, 0.0167)?;
    Ok(m)
}

pub fn apoptosis() -> AgentResult<CycleModel> {
    let mut m = CycleModel::new("Apoptosis", APOPTOSIS_MODEL);
    let a = m.add_phase("Apoptotic", APOPTOTIC);
    let debris = m.add_phase("Debris", DEBRIS);
    m.phase_mut(a)?.entry = PhaseHook::ApoptosisEntry;
    m.phase_mut(a)?.removal_at_exit = true;
    m.add_link(a, debris, 1.0 / (8.6 * 60.0))?.fixed_duration = true;
    Ok(m)
}

pub fn necrosis() -> AgentResult<CycleModel> {
    let mut m = CycleModel::new("Necrosis", NECROSIS_MODEL);
    let swelling = m.add_phase("Necrotic (swelling)", NECROTIC_SWELLING);
    let lysed = m.add_phase("Necrotic (lysed)", NECROTIC_LYSED);
    let debris = m.add_phase("Debris", DEBRIS);
    m.phase_mut(swelling)?.entry = PhaseHook::NecrosisSwellingEntry;
    m.phase_mut(lysed)?.entry = PhaseHook::LysisEntry;
    m.phase_mut(lysed)?.removal_at_exit = true;
    let rupture = m.add_link(swelling, lysed, 9e9)?;
    rupture.fixed_duration = true;
    rupture.arrest = Some(ArrestCondition::BelowRuptureVolume);
    m.add_link(lysed, debris, 1.0 / (60.0 * 24.0 * 60.0))?.fixed_duration = true;
    Ok(m)
}

/// One shared instance of every standard model.
#[derive(Clone, Debug)]
pub struct StandardModels {
    pub ki67_basic:               Arc<CycleModel>,
    pub ki67_advanced:            Arc<CycleModel>,
    pub live:                     Arc<CycleModel>,
    pub flow_cytometry:           Arc<CycleModel>,
    pub flow_cytometry_separated: Arc<CycleModel>,
    pub apoptosis:                Arc<CycleModel>,
    pub necrosis:                 Arc<CycleModel>,
}

impl StandardModels {
    pub fn new() -> AgentResult<Self> {
        Ok(Self {
            ki67_basic:               Arc::new(ki67_basic()?),
            ki67_advanced:            Arc::new(ki67_advanced()?),
            live:                     Arc::new(live()?),
            flow_cytometry:           Arc::new(flow_cytometry()?),
            flow_cytometry_separated: Arc::new(flow_cytometry_separated()?),
            apoptosis:                Arc::new(apoptosis()?),
            necrosis:                 Arc::new(necrosis()?),
        })
    }

    /// Apoptosis at [`DEFAULT_APOPTOSIS_RATE`] and necrosis at rate zero.
    pub fn default_death(&self) -> Death {
        let mut death = Death::default();
        death.add_death_model(DEFAULT_APOPTOSIS_RATE, Arc::clone(&self.apoptosis), DeathParameters::apoptosis());
        death.add_death_model(0.0, Arc::clone(&self.necrosis), DeathParameters::necrosis());
        death
    }
}
