//! The mechanics step: buffered velocity pass, integration, re-bucketing.

use tracing::{debug, instrument};

use mc_agent::{Cell, Motility};
use mc_behavior::{BehaviorRegistry, CellBehavior, CellView, PhenotypeContext};
use mc_core::{CellId, CellKey, CellRng, Integrator, Microenvironment, RngPurpose, SimConfig, Vec3};
use mc_population::Population;
use mc_spatial::CellGrid;

use crate::motility::update_motility_vector;
use crate::potentials::{attachment_velocity, membrane_velocity, pair_velocity};
use crate::{MechanicsError, MechanicsResult};

/// Buffered output of the velocity pass for one cell.
#[derive(Clone, Debug)]
pub struct VelocityUpdate {
    pub key:      CellKey,
    pub velocity: Vec3,
    /// Replacement motility state, when the walk turned or was cleared.
    pub motility: Option<Motility>,
    /// `false` for fixed cells: no integration, only the domain check.
    pub movable:  bool,
}

/// What one mechanics step did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MechanicsReport {
    /// Movable cells whose position was integrated.
    pub moved:         usize,
    /// Cells that changed bucket.
    pub rebucketed:    usize,
    /// Cells flagged out-of-domain by this step, by ascending id.
    pub out_of_domain: Vec<CellId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Outcome {
    Stayed,
    Rebucketed,
    Escaped,
}

/// Advances cell positions by one mechanics time step.
#[derive(Clone, Debug)]
pub struct MechanicsEngine {
    pub dt:         f64,
    pub integrator: Integrator,
    /// Zero the z component of every velocity.
    pub use_2d:     bool,
    /// Global seed for per-cell motility draws.
    pub seed:       u64,
}

impl MechanicsEngine {
    pub fn new(dt: f64, seed: u64) -> MechanicsResult<Self> {
        if !(dt > 0.0) {
            return Err(MechanicsError::InvalidTimeStep(dt));
        }
        Ok(Self { dt, integrator: Integrator::Euler, use_2d: false, seed })
    }

    pub fn from_config(config: &SimConfig) -> MechanicsResult<Self> {
        let mut engine = Self::new(config.time_steps.mechanics_dt, config.seed)?;
        engine.integrator = config.integrator;
        engine.use_2d = config.domain.use_2d;
        Ok(engine)
    }

    /// Run one full mechanics step over the population.
    ///
    /// `step` (the diffusion tick counter) selects the random stream for
    /// motility, so two runs with the same seed make the same turns whatever
    /// the thread count.
    #[instrument(skip_all, fields(cells = population.len()))]
    pub fn step(
        &self,
        population:  &mut Population,
        behaviors:   &BehaviorRegistry,
        environment: &dyn Microenvironment,
        time:        f64,
        step:        u64,
    ) -> MechanicsResult<MechanicsReport> {
        let updates = {
            let ctx = PhenotypeContext::new(time, self.dt, step, environment, population.definitions());
            self.compute_velocities(population, behaviors, &ctx)
        };
        let moved = updates.iter().filter(|u| u.movable).count();
        let mut report = MechanicsReport { moved, ..MechanicsReport::default() };

        let escaped = self.integrate(population, updates, &mut report)?;
        #[cfg(feature = "parallel")]
        population.grid().sort_buckets();
        for key in escaped {
            if let Some(id) = population.get(key).map(|c| c.id) {
                population.flag_out_of_domain(key)?;
                report.out_of_domain.push(id);
            }
        }
        if !report.out_of_domain.is_empty() {
            debug!(count = report.out_of_domain.len(), "cells pushed out of the domain");
        }
        Ok(report)
    }

    // ── Pass 1: velocities ────────────────────────────────────────────────

    /// Velocity of every in-play cell, from positions as they are now.
    /// Fixed cells get a zero update so their position is still checked
    /// against the domain.  Nothing is written.
    pub fn compute_velocities(
        &self,
        population: &Population,
        behaviors:  &BehaviorRegistry,
        ctx:        &PhenotypeContext<'_>,
    ) -> Vec<VelocityUpdate> {
        let keys: Vec<CellKey> = population
            .iter()
            .filter(|(_, c)| c.is_in_play())
            .map(|(k, _)| k)
            .collect();

        #[cfg(not(feature = "parallel"))]
        {
            keys.iter()
                .filter_map(|&key| self.cell_velocity(key, population, behaviors, ctx))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            keys.par_iter()
                .filter_map(|&key| self.cell_velocity(key, population, behaviors, ctx))
                .collect()
        }
    }

    fn cell_velocity(
        &self,
        key:        CellKey,
        population: &Population,
        behaviors:  &BehaviorRegistry,
        ctx:        &PhenotypeContext<'_>,
    ) -> Option<VelocityUpdate> {
        let cell = population.get(key)?;
        let mut velocity = Vec3::zeros();
        if !cell.is_movable {
            return Some(VelocityUpdate { key, velocity, motility: None, movable: false });
        }

        if let Some(voxel) = cell.voxel {
            population.grid().for_each_near(voxel, |other_key| {
                if other_key == key {
                    return;
                }
                if let Some(other) = population.get(other_key) {
                    velocity += pair_velocity(cell, other);
                }
            });
        }

        let behavior = behaviors.get(cell.type_id);
        if let Some((distance, normal)) = behavior.distance_to_membrane(&cell.position) {
            velocity += membrane_velocity(distance, &normal, cell.radius(), &cell.phenotype.mechanics);
        }

        let k = cell.phenotype.mechanics.attachment_elastic_constant;
        for &partner in &cell.attached {
            if let Some(p) = population.get_by_id(partner) {
                velocity += attachment_velocity(&cell.position, &p.position, k);
            }
        }

        let motility = self.motility_update(cell, behavior, ctx);
        velocity += motility
            .as_ref()
            .map_or(cell.phenotype.motility.motility_vector, |m| m.motility_vector);

        if self.use_2d {
            velocity.z = 0.0;
        }
        Some(VelocityUpdate { key, velocity, motility, movable: true })
    }

    fn motility_update(
        &self,
        cell:     &Cell,
        behavior: &dyn CellBehavior,
        ctx:      &PhenotypeContext<'_>,
    ) -> Option<Motility> {
        let current = &cell.phenotype.motility;
        if !current.is_motile {
            if current.motility_vector == Vec3::zeros() {
                return None;
            }
            let mut m = current.clone();
            m.disable();
            return Some(m);
        }

        let mut m = current.clone();
        behavior.update_migration_bias(&CellView::of(cell), &mut m, ctx);
        let mut rng = CellRng::for_step(self.seed, cell.id, ctx.step, RngPurpose::Mechanics);
        update_motility_vector(&mut m, self.dt, rng.inner(), self.use_2d);
        (m != *current).then_some(m)
    }

    // ── Pass 2: integration ───────────────────────────────────────────────

    /// Apply buffered velocities and re-bucket.  Returns the keys of cells
    /// that left the domain; they are still in their old bucket.
    fn integrate(
        &self,
        population: &mut Population,
        updates:    Vec<VelocityUpdate>,
        report:     &mut MechanicsReport,
    ) -> MechanicsResult<Vec<CellKey>> {
        let (store, grid, _) = population.split_mut();

        // Slot-indexed so the parallel pass can hand out disjoint &mut Cell.
        let mut buffer: Vec<Option<VelocityUpdate>> = vec![None; store.slots().len()];
        for u in updates {
            let i = u.key.slot_index();
            buffer[i] = Some(u);
        }

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<(CellKey, Outcome)> = {
            store
                .slots_mut()
                .iter_mut()
                .zip(buffer)
                .filter_map(|(slot, u)| {
                    let u = u.filter(|u| u.key.generation == slot.generation())?;
                    let cell = slot.cell_mut()?;
                    Some(self.advance(cell, u, grid))
                })
                .collect::<MechanicsResult<_>>()?
        };

        #[cfg(feature = "parallel")]
        let outcomes: Vec<(CellKey, Outcome)> = {
            use rayon::prelude::*;

            store
                .slots_mut()
                .par_iter_mut()
                .zip(buffer.into_par_iter())
                .filter_map(|(slot, u)| {
                    let u = u.filter(|u| u.key.generation == slot.generation())?;
                    let cell = slot.cell_mut()?;
                    Some(self.advance(cell, u, grid))
                })
                .collect::<MechanicsResult<_>>()?
        };

        let mut escaped = Vec::new();
        for (key, outcome) in outcomes {
            match outcome {
                Outcome::Stayed => {}
                Outcome::Rebucketed => report.rebucketed += 1,
                Outcome::Escaped => escaped.push(key),
            }
        }
        // Ascending id, whatever order the passes ran in.
        escaped.sort_unstable_by_key(|&k| store.get(k).map(|c| c.id));
        Ok(escaped)
    }

    fn advance(&self, cell: &mut Cell, update: VelocityUpdate, grid: &CellGrid) -> MechanicsResult<(CellKey, Outcome)> {
        let VelocityUpdate { key, velocity, motility, movable } = update;
        if let Some(m) = motility {
            cell.phenotype.motility = m;
        }

        if movable {
            let dx = match self.integrator {
                Integrator::Euler => velocity * self.dt,
                Integrator::AdamsBashforth => (velocity * 1.5 - cell.previous_velocity * 0.5) * self.dt,
            };
            cell.position += dx;
            cell.previous_velocity = velocity;
        }
        cell.velocity = Vec3::zeros();

        let Some(old) = cell.voxel else {
            return Ok((key, Outcome::Stayed));
        };
        match grid.move_cell(key, old, &cell.position) {
            Ok(new) if new == old => Ok((key, Outcome::Stayed)),
            Ok(new) => {
                cell.voxel = Some(new);
                Ok((key, Outcome::Rebucketed))
            }
            Err(e) if e.is_out_of_domain() => Ok((key, Outcome::Escaped)),
            Err(e) => Err(e.into()),
        }
    }
}
