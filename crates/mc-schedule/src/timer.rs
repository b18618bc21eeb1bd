//! A countdown timer compared against the diffusion step.

use crate::{ScheduleError, ScheduleResult};

/// Fires every `period` minutes of simulated time.
///
/// A disabled timer (period 0) never fires.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodicTimer {
    period:    f64,
    countdown: f64,
    fired:     u64,
}

impl PeriodicTimer {
    /// A timer that fires on the first tick, then every `period`.
    pub fn new(period: f64) -> ScheduleResult<Self> {
        Self::starting_in(period, 0.0)
    }

    /// A timer whose first firing is `first` minutes from now.
    pub fn starting_in(period: f64, first: f64) -> ScheduleResult<Self> {
        if !(period > 0.0) || !period.is_finite() {
            return Err(ScheduleError::InvalidPeriod(period));
        }
        Ok(Self { period, countdown: first.max(0.0), fired: 0 })
    }

    pub fn disabled() -> Self {
        Self { period: 0.0, countdown: f64::INFINITY, fired: 0 }
    }

    /// `new` for positive periods, `disabled` otherwise.
    pub fn or_disabled(period: f64, first: f64) -> Self {
        Self::starting_in(period, first).unwrap_or_else(|_| Self::disabled())
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.period > 0.0
    }

    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Simulated minutes until the next firing.
    #[inline]
    pub fn countdown(&self) -> f64 {
        self.countdown
    }

    /// How many times the timer has fired.
    #[inline]
    pub fn fired(&self) -> u64 {
        self.fired
    }

    #[inline]
    pub fn is_due(&self, dt: f64) -> bool {
        self.countdown < 0.5 * dt
    }

    /// Fire if due.  Returns whether it fired.
    pub fn poll(&mut self, dt: f64) -> bool {
        if !self.is_due(dt) {
            return false;
        }
        self.countdown += self.period;
        self.fired += 1;
        true
    }

    /// One diffusion tick has passed.
    #[inline]
    pub fn tick(&mut self, dt: f64) {
        self.countdown -= dt;
    }
}
