//! Simulation observer trait for progress reporting and data collection.

use mc_core::SimClock;
use mc_population::Population;

use crate::{RunSummary, StepCounts};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct Progress;
///
/// impl SimObserver for Progress {
///     fn on_phenotype_step(&mut self, clock: &SimClock, counts: &StepCounts, pop: &Population) {
///         println!("{clock}: {} cells, {} births", pop.len(), counts.divisions);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the start of each tick, before diffusion.
    fn on_tick_start(&mut self, _clock: &SimClock) {}

    /// Called after the clock has advanced, before any save.
    fn on_tick_end(&mut self, _clock: &SimClock) {}

    /// Called after each phenotype synchronisation point.
    ///
    /// `counts` covers that sync point plus any out-of-domain flags from the
    /// mechanics steps since the previous one.
    fn on_phenotype_step(&mut self, _clock: &SimClock, _counts: &StepCounts, _population: &Population) {}

    /// Full save: at start, every `save_interval` minutes, and once more when
    /// the run ends (normally or on error).
    fn on_save(&mut self, _clock: &SimClock, _population: &Population) {}

    /// Lightweight snapshot, every `snapshot_interval` minutes.
    fn on_snapshot(&mut self, _clock: &SimClock, _population: &Population) {}

    /// Called once after the final save.
    fn on_sim_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
