//! Fluent builder for constructing a [`Sim`].

use std::path::Path;

use tracing::debug;

use mc_agent::CellDefinitions;
use mc_behavior::BehaviorRegistry;
use mc_core::{CellTypeId, Microenvironment, NoMicroenvironment, SimClock, SimConfig};
use mc_mechanics::MechanicsEngine;
use mc_population::Population;
use mc_schedule::{InitialCell, TimerSet, load_placements_csv};

use crate::workers::Workers;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<E>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: time steps, domain, seed, output intervals
/// - [`CellDefinitions`]: the cell type templates
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                          |
/// |------------------------|----------------------------------|
/// | `.environment(e)`      | [`NoMicroenvironment`]           |
/// | `.behaviors(r)`        | `NoopBehavior` for every type    |
/// | `.placements(v)`       | No cells                         |
/// | `.placements_csv(p)`   | No cells                         |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, definitions)
///     .environment(UniformMicroenvironment::new(["oxygen"], 1e9))
///     .behaviors(registry)
///     .placements_csv(Path::new("cells.csv"))?
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<E: Microenvironment> {
    config:      SimConfig,
    definitions: CellDefinitions,
    environment: E,
    behaviors:   BehaviorRegistry,
    placements:  Vec<InitialCell>,
}

impl SimBuilder<NoMicroenvironment> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, definitions: CellDefinitions) -> Self {
        Self {
            config,
            definitions,
            environment: NoMicroenvironment,
            behaviors:   BehaviorRegistry::new(),
            placements:  Vec::new(),
        }
    }
}

impl<E: Microenvironment> SimBuilder<E> {
    /// Replace the diffusion collaborator.
    pub fn environment<F: Microenvironment>(self, environment: F) -> SimBuilder<F> {
        SimBuilder {
            config:      self.config,
            definitions: self.definitions,
            environment,
            behaviors:   self.behaviors,
            placements:  self.placements,
        }
    }

    pub fn behaviors(mut self, behaviors: BehaviorRegistry) -> Self {
        self.behaviors = behaviors;
        self
    }

    /// Cells to create before the first tick, in this order.
    pub fn placements(mut self, placements: Vec<InitialCell>) -> Self {
        self.placements = placements;
        self
    }

    /// Read the initial placements from a `x,y,z,type` CSV file.
    pub fn placements_csv(mut self, path: &Path) -> SimResult<Self> {
        self.placements = load_placements_csv(path)?;
        Ok(self)
    }

    /// Validate inputs and construct the [`Sim`].
    ///
    /// Every definition's secretion vectors are sized to the environment's
    /// substrate count.  Placements name their type either by definition
    /// name or by numeric type id; a placement outside the domain is kept
    /// and flagged out-of-domain.
    pub fn build(self) -> SimResult<Sim<E>> {
        let Self { config, mut definitions, environment, behaviors, placements } = self;
        config.validate()?;

        let substrates = environment.substrate_count();
        for i in 0..definitions.len() {
            let type_id = CellTypeId::try_from(i).map_err(|e| SimError::Config(e.to_string()))?;
            if let Some(def) = definitions.get_mut(type_id) {
                def.phenotype.secretion.resize(substrates);
            }
        }

        let mut population = Population::from_domain(&config.domain, definitions)?;
        for (index, initial) in placements.iter().enumerate() {
            let type_id = resolve_type(population.definitions(), initial)
                .ok_or_else(|| SimError::UnknownCellType { index, name: initial.cell_type.clone() })?;
            population.place(type_id, initial.position)?;
        }
        debug!(cells = population.len(), types = population.definitions().len(), "initial population placed");

        Ok(Sim {
            clock: SimClock::new(config.time_steps.diffusion_dt),
            timers: TimerSet::from_config(&config)?,
            mechanics: MechanicsEngine::from_config(&config)?,
            workers: Workers::new(config.num_threads)?,
            config,
            population,
            behaviors,
            environment,
            state: Default::default(),
            totals: Default::default(),
            pending: Default::default(),
            last_save_step: None,
        })
    }
}

fn resolve_type(definitions: &CellDefinitions, initial: &InitialCell) -> Option<CellTypeId> {
    definitions.by_name(&initial.cell_type).map(|d| d.type_id).or_else(|| {
        initial
            .type_index()
            .map(CellTypeId)
            .filter(|&t| definitions.get(t).is_some())
    })
}
