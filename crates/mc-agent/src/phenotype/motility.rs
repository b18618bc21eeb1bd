use mc_core::Vec3;

/// Persistent biased random walk state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Motility {
    pub is_motile:                bool,
    /// Mean time between direction changes, in minutes.
    pub persistence_time:         f64,
    /// µm/min
    pub migration_speed:          f64,
    pub migration_bias_direction: Vec3,
    /// 0 is a pure random walk, 1 follows the bias direction exactly.
    pub migration_bias:           f64,
    pub restrict_to_2d:           bool,
    /// Current self-propulsion velocity, added in the mechanics pass.
    pub motility_vector:          Vec3,
}

impl Default for Motility {
    fn default() -> Self {
        Self {
            is_motile:                false,
            persistence_time:         1.0,
            migration_speed:          1.0,
            migration_bias_direction: Vec3::zeros(),
            migration_bias:           0.0,
            restrict_to_2d:           false,
            motility_vector:          Vec3::zeros(),
        }
    }
}

impl Motility {
    /// Stop moving and drop the current propulsion.
    pub fn disable(&mut self) {
        self.is_motile = false;
        self.motility_vector = Vec3::zeros();
    }
}
