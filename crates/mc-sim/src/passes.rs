//! The per-cell passes that run between synchronisation points.
//!
//! Both passes hand each worker a disjoint `&mut Cell` (one arena slot) and
//! read everything else through shared references.  Nothing here changes
//! population membership, buckets or attachments: what a cell wants done is
//! returned as a [`CellOutcome`] and applied by [`crate::sync`].

use tracing::instrument;

use mc_agent::{Cell, Slot};
use mc_behavior::{BehaviorRegistry, CellAction, CellBehavior, CellView, PhenotypeContext};
use mc_core::{CellId, CellKey, CellRng, Microenvironment, RngPurpose};
use mc_population::Population;

use crate::SimResult;

/// What one cell asks the sync point to do.
#[derive(Clone, Debug, PartialEq)]
pub struct CellOutcome {
    pub key:     CellKey,
    pub id:      CellId,
    /// The cycle completed a division phase.
    pub divide:  bool,
    /// The death cycle reached its removal phase.
    pub remove:  bool,
    /// The cell entered a death model during this pass.
    pub died:    bool,
    pub actions: Vec<CellAction>,
}

impl CellOutcome {
    fn new(key: CellKey, id: CellId) -> Self {
        Self { key, id, divide: false, remove: false, died: false, actions: Vec::new() }
    }

    /// Nothing for the sync point to do.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.divide && !self.remove && !self.died && self.actions.is_empty()
    }
}

/// Timing and seeding shared by every cell of one pass.
#[derive(Copy, Clone, Debug)]
pub struct PassParams {
    pub time: f64,
    pub dt:   f64,
    pub step: u64,
    pub seed: u64,
}

/// Phenotype update for every in-play cell.
///
/// Per cell, in order: the behavior's `update_phenotype` (live cells only),
/// one cycle step, the death draw, and the volume step.  Death is evaluated
/// after the cycle, so a division completed in the same step is cancelled.
/// Outcomes come back sorted by ascending id.
#[instrument(skip_all, fields(cells = population.len(), step = params.step))]
pub fn phenotype_pass(
    population:  &mut Population,
    behaviors:   &BehaviorRegistry,
    environment: &dyn Microenvironment,
    params:      PassParams,
) -> SimResult<Vec<CellOutcome>> {
    for_each_cell(population, environment, params, |key, cell, ctx| {
        let behavior = behaviors.get(cell.type_id);
        update_cell_phenotype(key, cell, behavior, ctx, params.seed)
    })
}

/// The behavior's `custom_rule` for every in-play cell, dead or alive.
#[instrument(skip_all, fields(cells = population.len(), step = params.step))]
pub fn custom_pass(
    population:  &mut Population,
    behaviors:   &BehaviorRegistry,
    environment: &dyn Microenvironment,
    params:      PassParams,
) -> SimResult<Vec<CellOutcome>> {
    for_each_cell(population, environment, params, |key, cell, ctx| {
        let behavior = behaviors.get(cell.type_id);
        let mut outcome = CellOutcome::new(key, cell.id);
        let mut rng = CellRng::for_step(params.seed, cell.id, ctx.step, RngPurpose::Custom);
        let (view, phenotype) = CellView::split(cell);
        outcome.actions = behavior.custom_rule(&view, phenotype, ctx, &mut rng);
        Ok(outcome)
    })
}

fn update_cell_phenotype(
    key:      CellKey,
    cell:     &mut Cell,
    behavior: &dyn CellBehavior,
    ctx:      &PhenotypeContext<'_>,
    seed:     u64,
) -> SimResult<CellOutcome> {
    let mut outcome = CellOutcome::new(key, cell.id);
    let mut rng = CellRng::for_step(seed, cell.id, ctx.step, RngPurpose::Phenotype);
    let (view, phenotype) = CellView::split(cell);

    if !phenotype.is_dead() {
        outcome.actions = behavior.update_phenotype(&view, phenotype, ctx, &mut rng);
    }

    phenotype.advance_cycle(rng.inner(), ctx.dt);
    if let Some(model) = phenotype.death.check_for_death(rng.inner(), ctx.dt) {
        outcome.died = phenotype.start_death(model, ctx.dt)?;
    }
    phenotype.update_volume(ctx.dt);

    outcome.divide = std::mem::take(&mut phenotype.flagged_for_division);
    outcome.remove = std::mem::take(&mut phenotype.flagged_for_removal);
    Ok(outcome)
}

/// Run `f` on every in-play cell, sequentially or on the rayon pool, and
/// collect the non-empty outcomes in ascending id order.
fn for_each_cell<F>(
    population:  &mut Population,
    environment: &dyn Microenvironment,
    params:      PassParams,
    f:           F,
) -> SimResult<Vec<CellOutcome>>
where
    F: Fn(CellKey, &mut Cell, &PhenotypeContext<'_>) -> SimResult<CellOutcome> + Send + Sync,
{
    let (store, _, definitions) = population.split_mut();
    let ctx = PhenotypeContext::new(params.time, params.dt, params.step, environment, definitions);

    let visit = |(i, slot): (usize, &mut Slot)| -> Option<SimResult<CellOutcome>> {
        let key = CellKey::new(i as u32, slot.generation());
        let cell = slot.cell_mut().filter(|c| c.is_in_play())?;
        match f(key, cell, &ctx) {
            Ok(outcome) if outcome.is_empty() => None,
            other => Some(other),
        }
    };

    #[cfg(not(feature = "parallel"))]
    let mut outcomes: Vec<CellOutcome> = store
        .slots_mut()
        .iter_mut()
        .enumerate()
        .filter_map(visit)
        .collect::<SimResult<_>>()?;

    #[cfg(feature = "parallel")]
    let mut outcomes: Vec<CellOutcome> = {
        use rayon::prelude::*;

        store
            .slots_mut()
            .par_iter_mut()
            .enumerate()
            .filter_map(visit)
            .collect::<SimResult<_>>()?
    };

    outcomes.sort_unstable_by_key(|o| o.id);
    Ok(outcomes)
}
