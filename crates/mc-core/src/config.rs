//! Top-level simulation configuration.
//!
//! Usually built in code or, with the `serde` feature, loaded from JSON:
//!
//! ```json
//! {
//!   "time_steps": { "diffusion_dt": 0.01, "mechanics_dt": 0.1, "phenotype_dt": 6.0 },
//!   "max_time": 1440.0,
//!   "seed": 42,
//!   "domain": { "min": [-500, -500, -500], "max": [500, 500, 500], "voxel_size": 30 }
//! }
//! ```
//!
//! Missing fields fall back to [`SimConfig::default`].

use crate::{McError, McResult, TimeSteps};

/// Position integration scheme used by the mechanics pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Integrator {
    /// `x += dt * v`
    #[default]
    Euler,
    /// `x += dt * (1.5 v - 0.5 v_prev)`
    AdamsBashforth,
}

/// Simulation domain and mechanics voxel size, in microns.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DomainConfig {
    pub min: [f64; 3],
    pub max: [f64; 3],
    /// Edge length of a cubic mechanics voxel.
    pub voxel_size: f64,
    /// Positions up to this far outside the bounding box are clamped into the
    /// edge voxel instead of being flagged out-of-domain.
    pub out_of_bounds_tolerance: f64,
    /// Restrict random directions (motility, division) to the z = 0 plane.
    pub use_2d: bool,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            min: [-500.0; 3],
            max: [500.0; 3],
            voxel_size: 30.0,
            out_of_bounds_tolerance: 0.0,
            use_2d: false,
        }
    }
}

/// Global configuration for one simulation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    pub time_steps: TimeSteps,

    /// Run until the clock reaches this many minutes.
    pub max_time: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Worker threads for the parallel passes.  `None` uses all logical cores.
    pub num_threads: Option<usize>,

    /// Minutes between full saves.  `0` disables periodic saves (the final
    /// save still happens).
    pub save_interval: f64,

    /// Minutes between lightweight snapshots.  `0` disables them.
    pub snapshot_interval: f64,

    /// Minutes between custom (user) callbacks.
    pub custom_interval: f64,

    pub domain: DomainConfig,

    pub integrator: Integrator,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_steps:        TimeSteps::default(),
            max_time:          60.0 * 24.0,
            seed:              0,
            num_threads:       None,
            save_interval:     60.0,
            snapshot_interval: 0.0,
            custom_interval:   60.0,
            domain:            DomainConfig::default(),
            integrator:        Integrator::Euler,
        }
    }
}

impl SimConfig {
    /// Check the configuration for values the scheduler cannot run with.
    pub fn validate(&self) -> McResult<()> {
        let ts = &self.time_steps;
        for (name, dt) in [
            ("diffusion_dt", ts.diffusion_dt),
            ("mechanics_dt", ts.mechanics_dt),
            ("phenotype_dt", ts.phenotype_dt),
        ] {
            if !(dt.is_finite() && dt > 0.0) {
                return Err(McError::Config(format!("{name} must be positive, got {dt}")));
            }
        }
        if ts.mechanics_dt < ts.diffusion_dt {
            return Err(McError::Config(format!(
                "mechanics_dt ({}) is smaller than diffusion_dt ({})",
                ts.mechanics_dt, ts.diffusion_dt
            )));
        }
        if ts.phenotype_dt < ts.mechanics_dt {
            return Err(McError::Config(format!(
                "phenotype_dt ({}) is smaller than mechanics_dt ({})",
                ts.phenotype_dt, ts.mechanics_dt
            )));
        }
        if !(self.max_time.is_finite() && self.max_time >= 0.0) {
            return Err(McError::Config(format!("max_time must be >= 0, got {}", self.max_time)));
        }
        for (name, v) in [
            ("save_interval", self.save_interval),
            ("snapshot_interval", self.snapshot_interval),
            ("custom_interval", self.custom_interval),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(McError::Config(format!("{name} must be >= 0, got {v}")));
            }
        }
        let d = &self.domain;
        if !(d.voxel_size.is_finite() && d.voxel_size > 0.0) {
            return Err(McError::Config(format!("voxel_size must be positive, got {}", d.voxel_size)));
        }
        for axis in 0..3 {
            if !(d.max[axis] > d.min[axis]) {
                return Err(McError::Config(format!(
                    "empty domain on axis {axis}: [{}, {}]",
                    d.min[axis], d.max[axis]
                )));
            }
        }
        if d.out_of_bounds_tolerance < 0.0 {
            return Err(McError::Config("out_of_bounds_tolerance must be >= 0".into()));
        }
        if self.num_threads == Some(0) {
            return Err(McError::Config("num_threads must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    #[cfg(feature = "serde")]
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> McResult<Self> {
        let cfg: SimConfig =
            serde_json::from_reader(reader).map_err(|e| McError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Like [`from_json_reader`][Self::from_json_reader] for a file path.
    #[cfg(feature = "serde")]
    pub fn from_json_path(path: &std::path::Path) -> McResult<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(std::io::BufReader::new(file))
    }
}
