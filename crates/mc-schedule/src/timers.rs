//! One timer per periodic subsystem.

use mc_core::SimConfig;

use crate::{PeriodicTimer, ScheduleResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerKind {
    Mechanics,
    Phenotype,
    Custom,
    Save,
    Snapshot,
}

impl TimerKind {
    pub const ALL: [TimerKind; 5] = [
        TimerKind::Mechanics,
        TimerKind::Phenotype,
        TimerKind::Custom,
        TimerKind::Save,
        TimerKind::Snapshot,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Every subsystem timer, driven by one diffusion step.
///
/// Update timers (mechanics, phenotype, custom) fire on the first tick.
/// Output timers (save, snapshot) first fire one period in, since the
/// initial state is written before the loop starts.  A zero interval
/// disables the custom and output timers.
#[derive(Clone, Debug)]
pub struct TimerSet {
    dt:     f64,
    timers: [PeriodicTimer; 5],
}

impl TimerSet {
    pub fn from_config(config: &SimConfig) -> ScheduleResult<Self> {
        let ts = &config.time_steps;
        Ok(Self {
            dt:     ts.diffusion_dt,
            timers: [
                PeriodicTimer::new(ts.mechanics_dt)?,
                PeriodicTimer::new(ts.phenotype_dt)?,
                PeriodicTimer::or_disabled(config.custom_interval, 0.0),
                PeriodicTimer::or_disabled(config.save_interval, config.save_interval),
                PeriodicTimer::or_disabled(config.snapshot_interval, config.snapshot_interval),
            ],
        })
    }

    /// The diffusion step every timer counts down by.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    #[inline]
    pub fn timer(&self, kind: TimerKind) -> &PeriodicTimer {
        &self.timers[kind.index()]
    }

    /// Fire `kind` if due.
    pub fn poll(&mut self, kind: TimerKind) -> bool {
        self.timers[kind.index()].poll(self.dt)
    }

    /// Count every timer down by one diffusion step.
    pub fn tick(&mut self) {
        for t in &mut self.timers {
            t.tick(self.dt);
        }
    }
}
