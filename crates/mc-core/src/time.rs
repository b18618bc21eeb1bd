//! Simulation time model.
//!
//! The authoritative clock only advances by the diffusion time step.  Time is
//! kept as `f64` minutes, but the step counter is the canonical ordering key:
//! RNG streams and output rows are addressed by `step`, never by comparing
//! floating-point times.

use std::fmt;

/// Authoritative simulation clock.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Elapsed simulated time in minutes.
    pub time: f64,
    /// Number of diffusion steps taken so far.
    pub step: u64,
    /// Diffusion time step in minutes.
    pub dt:   f64,
}

impl SimClock {
    pub fn new(dt: f64) -> Self {
        Self { time: 0.0, step: 0, dt }
    }

    /// Advance by one diffusion step.
    #[inline]
    pub fn advance(&mut self) {
        self.step += 1;
        self.time += self.dt;
    }

    /// `true` once `time` has reached `max_time` within half a step.
    #[inline]
    pub fn reached(&self, max_time: f64) -> bool {
        self.time >= max_time - 0.5 * self.dt
    }

    /// Break elapsed time into (day, hour, minute) components.
    pub fn elapsed_dhm(&self) -> (u64, u32, u32) {
        let total_min = self.time.max(0.0).round() as u64;
        let days = total_min / 1_440;
        let hours = ((total_min % 1_440) / 60) as u32;
        let minutes = (total_min % 60) as u32;
        (days, hours, minutes)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (d, h, m) = self.elapsed_dhm();
        write!(f, "t={:.3} min (day {} {:02}:{:02})", self.time, d, h, m)
    }
}

/// The three nested time steps of the update loop, in minutes.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimeSteps {
    pub diffusion_dt: f64,
    pub mechanics_dt: f64,
    pub phenotype_dt: f64,
}

impl Default for TimeSteps {
    fn default() -> Self {
        Self {
            diffusion_dt: 0.01,
            mechanics_dt: 0.1,
            phenotype_dt: 6.0,
        }
    }
}
