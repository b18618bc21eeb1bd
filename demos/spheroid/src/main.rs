//! spheroid — a small avascular tumour spheroid.
//!
//! 125 tumour cells in a well-mixed oxygen bath.  Cells consume oxygen,
//! cycle faster when it is plentiful and turn necrotic when it runs low.
//! Output goes to `output/spheroid/` as CSV (or SQLite with `--features
//! sqlite`).
//!
//! ```text
//! cargo run -p spheroid --release -- demos/spheroid/config.json demos/spheroid/cells.csv
//! RUST_LOG=mc_sim=debug cargo run -p spheroid
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mc_agent::{CellDefinitions, Phenotype, Secretion, StandardModels};
use mc_behavior::{BehaviorRegistry, CellAction, CellBehavior, CellView, PhenotypeContext};
use mc_core::{CellRng, Microenvironment, SimConfig, SubstrateId, UniformMicroenvironment};
use mc_output::SimOutputObserver;
use mc_sim::SimBuilder;

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR: &str = "output/spheroid";

/// mmHg.
const FAR_FIELD_OXYGEN:     f64 = 38.0;
const PROLIFERATION_OXYGEN: f64 = 10.0;
const NECROSIS_THRESHOLD:   f64 = 5.0;
const NECROSIS_MAX:         f64 = 2.5;

/// Live-cycle rate at full oxygen, 1/min.
const MAX_BIRTH_RATE:       f64 = 1.0 / 1_440.0;
const MAX_NECROSIS_RATE:    f64 = 1.0 / 360.0;
const OXYGEN_UPTAKE:        f64 = 10.0;

const NECROSIS: usize = 1;

// ── Behavior ──────────────────────────────────────────────────────────────────

/// Oxygen-gated proliferation and necrosis.
struct OxygenDependent {
    oxygen:        SubstrateId,
    hypoxic_hours: usize,
}

impl CellBehavior for OxygenDependent {
    fn update_phenotype(
        &self,
        cell:      &CellView<'_>,
        phenotype: &mut Phenotype,
        ctx:       &PhenotypeContext<'_>,
        _rng:      &mut CellRng,
    ) -> Vec<CellAction> {
        let o2 = ctx.concentration(cell, self.oxygen);

        let drive = ((o2 - NECROSIS_THRESHOLD) / (PROLIFERATION_OXYGEN - NECROSIS_THRESHOLD)).clamp(0.0, 1.0);
        if let Some(rate) = phenotype.cycle.transition_rate_mut(0, 0) {
            *rate = MAX_BIRTH_RATE * drive;
        }

        let hypoxia = ((NECROSIS_THRESHOLD - o2) / (NECROSIS_THRESHOLD - NECROSIS_MAX)).clamp(0.0, 1.0);
        if let Some(rate) = phenotype.death.rates.get_mut(NECROSIS) {
            *rate = MAX_NECROSIS_RATE * hypoxia;
        }
        vec![]
    }

    fn custom_rule(
        &self,
        cell:      &CellView<'_>,
        phenotype: &mut Phenotype,
        ctx:       &PhenotypeContext<'_>,
        _rng:      &mut CellRng,
    ) -> Vec<CellAction> {
        if phenotype.is_dead() || ctx.concentration(cell, self.oxygen) >= NECROSIS_THRESHOLD {
            return vec![];
        }
        let hours = phenotype.custom.get(self.hypoxic_hours).unwrap_or(0.0);
        phenotype.custom.set(self.hypoxic_hours, hours + ctx.dt / 60.0);
        vec![]
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let here = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let config_path = args.next().unwrap_or_else(|| here.join("config.json"));
    let cells_path = args.next().unwrap_or_else(|| here.join("cells.csv"));

    // 1. Configuration.
    let config = SimConfig::from_json_path(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    info!(max_time = config.max_time, seed = config.seed, "loaded {}", config_path.display());

    // 2. Microenvironment: one substrate held near the far-field value.
    let domain_volume: f64 = (0..3).map(|a| config.domain.max[a] - config.domain.min[a]).product();
    let mut environment = UniformMicroenvironment::new(["oxygen"], domain_volume);
    let oxygen = environment.substrate_index("oxygen").context("oxygen substrate")?;
    environment.set_concentration(oxygen, FAR_FIELD_OXYGEN);
    environment.set_supply(oxygen, FAR_FIELD_OXYGEN, 0.01);
    environment.set_decay_rate(oxygen, 0.1);

    // 3. Cell definitions.
    let models = StandardModels::new()?;
    let mut tumor = Phenotype::new(Arc::clone(&models.live), &models);
    tumor.secretion = Secretion::with_substrates(environment.substrate_count());
    tumor.secretion.set(oxygen, 0.0, FAR_FIELD_OXYGEN, OXYGEN_UPTAKE);
    let hypoxic_hours = tumor.custom.add_variable("hypoxic_hours", 0.0);

    let mut definitions = CellDefinitions::new();
    let tumor_id = definitions.add("tumor", tumor)?;

    let mut behaviors = BehaviorRegistry::new();
    behaviors.register(tumor_id, OxygenDependent { oxygen, hypoxic_hours });

    // 4. Build.
    let mut sim = SimBuilder::new(config, definitions)
        .environment(environment)
        .behaviors(behaviors)
        .placements_csv(&cells_path)
        .with_context(|| format!("loading {}", cells_path.display()))?
        .build()?;
    info!(cells = sim.population.len(), "population placed");

    // 5. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    #[cfg(not(feature = "sqlite"))]
    let writer = mc_output::CsvWriter::new(Path::new(OUTPUT_DIR))?;
    #[cfg(feature = "sqlite")]
    let writer = mc_output::SqliteWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = SimOutputObserver::new(writer);

    // 6. Run.
    let t0 = Instant::now();
    let summary = sim.run(&mut obs)?;
    if let Some(e) = obs.take_error() {
        warn!(error = %e, "output incomplete");
    }

    println!();
    println!("Simulated {:.0} min in {:.2} s ({} ticks)", summary.final_time, t0.elapsed().as_secs_f64(), summary.ticks);
    println!("  live          : {}", summary.live);
    println!("  dead          : {}", summary.dead);
    println!("  out of domain : {}", summary.out_of_domain);
    println!("  divisions     : {}", summary.totals.divisions);
    println!("  deaths        : {}", summary.totals.deaths);
    println!("  removals      : {}", summary.totals.removals);
    if let Some(o2) = sim.environment.concentrations().get(oxygen.index()) {
        println!("  oxygen        : {o2:.2} mmHg");
    }

    let hours: Vec<f64> = sim
        .population
        .iter()
        .filter_map(|(_, cell)| cell.phenotype.custom.get(hypoxic_hours))
        .filter(|&h| h > 0.0)
        .collect();
    if hours.is_empty() {
        println!("  hypoxic cells : 0");
    } else {
        let mean = hours.iter().sum::<f64>() / hours.len() as f64;
        println!("  hypoxic cells : {} (mean {mean:.1} h below {NECROSIS_THRESHOLD} mmHg)", hours.len());
    }
    Ok(())
}
