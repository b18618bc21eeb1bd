//! The `Sim` struct and its tick loop.

use tracing::{debug, error, info, instrument};

use mc_behavior::BehaviorRegistry;
use mc_core::{Microenvironment, NoMicroenvironment, SimClock, SimConfig, SourceSink};
use mc_mechanics::MechanicsEngine;
use mc_population::Population;
use mc_schedule::{TimerKind, TimerSet};

use crate::observer::SimObserver;
use crate::passes::{PassParams, custom_pass, phenotype_pass};
use crate::sync::apply_outcomes;
use crate::workers::Workers;
use crate::{RunSummary, SimError, SimResult, StepCounts};

/// Lifecycle of one run.  Only moves forward.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunState {
    /// Ticking until the clock reaches `max_time`.
    #[default]
    Running,
    /// `max_time` reached or a tick failed; no more ticks will run.
    Terminating,
    /// Writing the final save.
    Finalizing,
    Stopped,
}

/// The complete simulation state.
///
/// Construct via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<E: Microenvironment = NoMicroenvironment> {
    pub config:      SimConfig,
    /// Advances by one diffusion step per tick.
    pub clock:       SimClock,
    pub population:  Population,
    pub behaviors:   BehaviorRegistry,
    pub environment: E,
    pub mechanics:   MechanicsEngine,
    pub timers:      TimerSet,

    pub(crate) state:          RunState,
    pub(crate) totals:         StepCounts,
    /// Changes not yet reported: mechanics out-of-domain flags and custom
    /// pass results since the last phenotype step.
    pub(crate) pending:        StepCounts,
    pub(crate) last_save_step: Option<u64>,
    pub(crate) workers:        Workers,
}

impl<E: Microenvironment> Sim<E> {
    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Cumulative changes over all phenotype steps so far.
    #[inline]
    pub fn totals(&self) -> StepCounts {
        self.totals
    }

    /// Run until the clock reaches `config.max_time`, then finalize.
    ///
    /// A full save goes to the observer before the first tick (unless one
    /// already happened), every `save_interval` minutes, and once at the end.
    /// If a tick fails the error is logged, the final save and
    /// [`SimObserver::on_sim_end`] still run, and the error is returned.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        if self.state != RunState::Running {
            return Err(SimError::Stopped);
        }
        info!(
            cells    = self.population.len(),
            max_time = self.config.max_time,
            dt       = self.clock.dt,
            seed     = self.config.seed,
            threads  = self.workers.threads(),
            "simulation start"
        );
        if self.last_save_step.is_none() {
            self.save(observer);
        }

        let result = self.run_to_end(observer);
        if let Err(e) = &result {
            error!(error = %e, time = self.clock.time, step = self.clock.step, "simulation aborted");
        }
        self.state = RunState::Terminating;
        let summary = self.finalize(observer, result.is_err());
        result.map(|()| summary)
    }

    /// Run exactly `n` ticks, ignoring `max_time`.  Does not finalize: no
    /// closing save and no `on_sim_end`.
    ///
    /// Useful for benchmarks and tests that want to inspect state mid-run.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        if self.state != RunState::Running {
            return Err(SimError::Stopped);
        }
        for _ in 0..n {
            self.tick(observer)?;
        }
        Ok(())
    }

    fn run_to_end<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while !self.clock.reached(self.config.max_time) {
            self.tick(observer)?;
        }
        Ok(())
    }

    /// A failed tick may have changed state after the last save, so an
    /// aborted run always saves again.
    fn finalize<O: SimObserver>(&mut self, observer: &mut O, aborted: bool) -> RunSummary {
        self.state = RunState::Finalizing;
        if aborted || self.last_save_step != Some(self.clock.step) {
            self.save(observer);
        }
        self.totals += std::mem::take(&mut self.pending);

        let summary = RunSummary::new(self.clock.time, self.clock.step, self.population.counts(), self.totals);
        self.state = RunState::Stopped;
        observer.on_sim_end(&summary);
        info!(
            time       = summary.final_time,
            ticks      = summary.ticks,
            live       = summary.live,
            dead       = summary.dead,
            divisions  = summary.totals.divisions,
            deaths     = summary.totals.deaths,
            "simulation stopped"
        );
        summary
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// One diffusion tick:
    ///
    /// 1. diffusion-decay with the cells' sources and sinks
    /// 2. mechanics step, if due (out-of-domain flagging happens inside)
    /// 3. phenotype pass and its sync point, if due
    /// 4. custom pass and its sync point, if due
    /// 5. timers count down, the clock advances
    /// 6. save and snapshot, if due
    fn tick<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        observer.on_tick_start(&self.clock);
        let (time, step, seed) = (self.clock.time, self.clock.step, self.config.seed);

        self.diffuse();

        if self.timers.poll(TimerKind::Mechanics) {
            let report = self.workers.install(|| {
                self.mechanics.step(&mut self.population, &self.behaviors, &self.environment, time, step)
            })?;
            self.pending.out_of_domain += report.out_of_domain.len();
        }

        if self.timers.poll(TimerKind::Phenotype) {
            let params = PassParams { time, dt: self.config.time_steps.phenotype_dt, step, seed };
            let outcomes = self.workers.install(|| {
                phenotype_pass(&mut self.population, &self.behaviors, &self.environment, params)
            })?;
            let mut counts = apply_outcomes(&mut self.population, outcomes, params.dt, step, seed)?;
            counts += std::mem::take(&mut self.pending);
            self.totals += counts;
            self.log_phenotype_step(&counts);
            observer.on_phenotype_step(&self.clock, &counts, &self.population);
        }

        if self.timers.poll(TimerKind::Custom) {
            let params = PassParams { time, dt: self.config.custom_interval, step, seed };
            let outcomes = self.workers.install(|| {
                custom_pass(&mut self.population, &self.behaviors, &self.environment, params)
            })?;
            let counts = apply_outcomes(&mut self.population, outcomes, params.dt, step, seed)?;
            self.pending += counts;
        }

        self.timers.tick();
        self.clock.advance();
        observer.on_tick_end(&self.clock);

        if self.timers.poll(TimerKind::Save) {
            self.save(observer);
        }
        if self.timers.poll(TimerKind::Snapshot) {
            observer.on_snapshot(&self.clock, &self.population);
        }
        Ok(())
    }

    /// Hand the in-domain cells' secretion and uptake to the transport
    /// solver and advance it by one diffusion step.  Dead cells stay coupled
    /// with their reduced uptake until they are removed.
    #[instrument(skip_all, fields(step = self.clock.step))]
    fn diffuse(&mut self) {
        if self.environment.substrate_count() == 0 {
            return;
        }
        let sources: Vec<SourceSink> = self
            .population
            .iter()
            .filter(|(_, c)| c.is_in_play())
            .map(|(_, c)| c.source_sink())
            .collect();
        self.environment.simulate_diffusion_decay(self.clock.dt, &sources);
    }

    fn save<O: SimObserver>(&mut self, observer: &mut O) {
        debug!(time = self.clock.time, cells = self.population.len(), "save");
        observer.on_save(&self.clock, &self.population);
        self.last_save_step = Some(self.clock.step);
    }

    fn log_phenotype_step(&self, counts: &StepCounts) {
        let pop = self.population.counts();
        info!(
            time          = self.clock.time,
            live          = pop.live,
            dead          = pop.dead,
            births        = counts.divisions,
            deaths        = counts.deaths,
            removals      = counts.removals,
            out_of_domain = counts.out_of_domain,
            "phenotype step"
        );
    }
}
