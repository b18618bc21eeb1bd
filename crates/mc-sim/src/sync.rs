//! The synchronisation point: applies pass outcomes to the population.
//!
//! Runs sequentially, after the pass that produced the outcomes has joined.
//! Outcomes are applied in ascending [`CellId`] order, so the result does not
//! depend on how the pass was scheduled.

use tracing::{instrument, trace};

use mc_behavior::CellAction;
use mc_core::{CellId, CellKey, CellRng, RngPurpose};
use mc_population::{Population, PopulationError};

use crate::passes::CellOutcome;
use crate::{SimResult, StepCounts};

/// Apply `outcomes` (sorted by id) and heal attachments.
///
/// For each cell: attachments are dropped if it died in the pass, its
/// actions run in the order returned, then a cycle-requested division and
/// a death-cycle removal are carried out.  A removed cell's remaining
/// actions are dropped; a dead cell never divides.
#[instrument(skip_all, fields(outcomes = outcomes.len()))]
pub fn apply_outcomes(
    population: &mut Population,
    outcomes:   Vec<CellOutcome>,
    dt:         f64,
    step:       u64,
    seed:       u64,
) -> SimResult<StepCounts> {
    let mut counts = StepCounts::default();

    for outcome in outcomes {
        let CellOutcome { key, id, divide, remove, died, actions } = outcome;
        if population.get(key).is_none() {
            continue;
        }
        if died {
            population.remove_all_attachments(id)?;
            counts.deaths += 1;
        }

        let mut divided = false;
        let mut removed = false;
        for action in actions {
            match action {
                CellAction::Divide => divided |= try_divide(population, key, id, step, seed, &mut counts)?,
                CellAction::Die(model) => {
                    if population.mark_dead(key, model, dt)? {
                        counts.deaths += 1;
                    }
                }
                CellAction::Remove => {
                    population.finalize_removal(key)?;
                    counts.removals += 1;
                    removed = true;
                }
                CellAction::Attach(other) => {
                    if is_live(population, other) && !population.get(key).is_some_and(|c| c.is_dead()) {
                        population.attach(id, other)?;
                    }
                }
                CellAction::Detach(other) => {
                    population.detach(id, other)?;
                }
                CellAction::DetachAll => {
                    population.remove_all_attachments(id)?;
                }
                CellAction::SetMovable(movable) => {
                    if let Some(cell) = population.get_mut(key) {
                        cell.is_movable = movable;
                    }
                }
            }
            if removed {
                break;
            }
        }
        if removed {
            continue;
        }

        if divide && !divided {
            try_divide(population, key, id, step, seed, &mut counts)?;
        }
        if remove {
            population.finalize_removal(key)?;
            counts.removals += 1;
        }
    }

    population.heal_attachments();
    Ok(counts)
}

fn is_live(population: &Population, id: CellId) -> bool {
    population.get_by_id(id).is_some_and(|c| c.is_in_play() && !c.is_dead())
}

/// Divide a live, in-domain cell.  Returns `false` when the cell is not
/// eligible.
fn try_divide(
    population: &mut Population,
    key:        CellKey,
    id:         CellId,
    step:       u64,
    seed:       u64,
    counts:     &mut StepCounts,
) -> SimResult<bool> {
    let mut rng = CellRng::for_step(seed, id, step, RngPurpose::Division);
    match population.divide(key, rng.inner()) {
        Ok(child) => {
            counts.divisions += 1;
            counts.out_of_domain += [key, child]
                .into_iter()
                .filter(|&k| population.get(k).is_some_and(|c| c.is_out_of_domain))
                .count();
            Ok(true)
        }
        Err(PopulationError::CannotDivide(cell, reason)) => {
            trace!(%cell, reason, "division skipped");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}
