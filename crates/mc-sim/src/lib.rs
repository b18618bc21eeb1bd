//! `mc-sim` — the top-level scheduler of the multicellular simulator.
//!
//! # One tick
//!
//! ```text
//! every tick (dt = diffusion_dt):
//!   ① Diffusion  — collect SourceSink from in-domain cells (dead included),
//!                  Microenvironment::simulate_diffusion_decay(dt).
//!   ② Mechanics  — if the mechanics timer fired: buffered velocity pass,
//!                  integration, re-bucketing, out-of-domain flagging.
//!   ③ Phenotype  — if the phenotype timer fired: per cell (parallel with
//!                  the `parallel` feature) update_phenotype, cycle step,
//!                  death draw, volume step → CellOutcome.
//!   ④ Sync       — for each outcome in ascending CellId order: detach the
//!                  newly dead, apply CellActions, divide, remove; then
//!                  heal attachments.
//!   ⑤ Custom     — if the custom timer fired: custom_rule pass + sync.
//!   ⑥ Timers     — every countdown drops by dt; the clock advances.
//!   ⑦ Output     — save / snapshot callbacks when their timers fire.
//! ```
//!
//! A timer fires when its countdown is below `dt / 2` and is then reset by
//! its own period, so fire times never drift by more than half a step.
//!
//! # Run states
//!
//! `Running → Terminating → Finalizing → Stopped`.  [`Sim::run`] always ends
//! in `Stopped`, also when a tick fails: the error is logged, a final save
//! is attempted and the error is returned.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                        |
//! |------------|---------------------------------------------------------------|
//! | `parallel` | Mechanics and phenotype passes on a rayon pool (`num_threads`)|
//! | `serde`    | Serialize/deserialize `StepCounts`, `RunSummary`, `RunState`  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mc_agent::{CellDefinitions, Phenotype, StandardModels};
//! use mc_core::SimConfig;
//! use mc_sim::{NoopObserver, SimBuilder};
//!
//! let models = StandardModels::new()?;
//! let mut definitions = CellDefinitions::new();
//! definitions.add("tumor", Phenotype::new(models.live.clone(), &models))?;
//!
//! let mut sim = SimBuilder::new(SimConfig::default(), definitions)
//!     .placements_csv(Path::new("cells.csv"))?
//!     .build()?;
//! let summary = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod passes;
pub mod report;
pub mod sim;
pub mod sync;
mod workers;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use passes::{CellOutcome, PassParams};
pub use report::{RunSummary, StepCounts};
pub use sim::{RunState, Sim};
