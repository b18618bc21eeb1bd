//! Per-step tallies and the end-of-run summary.

use std::ops::AddAssign;

use mc_population::PopulationCounts;

/// Population changes applied at one synchronisation point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepCounts {
    pub divisions:     usize,
    pub deaths:        usize,
    pub removals:      usize,
    /// Cells flagged out-of-domain since the previous phenotype step.
    pub out_of_domain: usize,
}

impl StepCounts {
    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl AddAssign for StepCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.divisions += rhs.divisions;
        self.deaths += rhs.deaths;
        self.removals += rhs.removals;
        self.out_of_domain += rhs.out_of_domain;
    }
}

/// Returned by [`Sim::run`][crate::Sim::run].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Simulated minutes at the end of the run.
    pub final_time:    f64,
    /// Diffusion ticks executed.
    pub ticks:         u64,
    pub live:          usize,
    pub dead:          usize,
    pub out_of_domain: usize,
    /// Cumulative changes over the whole run.
    pub totals:        StepCounts,
}

impl RunSummary {
    pub(crate) fn new(final_time: f64, ticks: u64, counts: PopulationCounts, totals: StepCounts) -> Self {
        Self {
            final_time,
            ticks,
            live: counts.live,
            dead: counts.dead,
            out_of_domain: counts.out_of_domain,
            totals,
        }
    }
}
