//! Persistent biased random walk.

use rand::Rng;

use mc_agent::Motility;
use mc_core::{Vec3, random_unit_vector};

/// Resample the propulsion direction with probability `dt / persistence_time`.
///
/// The new direction blends a random unit vector with the bias direction by
/// `migration_bias` and is scaled to `migration_speed`.  Returns `true` if
/// the direction changed.  A non-motile cell has its propulsion cleared.
pub fn update_motility_vector<R: Rng + ?Sized>(motility: &mut Motility, dt: f64, rng: &mut R, use_2d: bool) -> bool {
    if !motility.is_motile {
        motility.motility_vector = Vec3::zeros();
        return false;
    }
    let turn = motility.persistence_time <= 0.0 || rng.r#gen::<f64>() < dt / motility.persistence_time;
    if !turn {
        return false;
    }

    let random = random_unit_vector(rng, use_2d || motility.restrict_to_2d);
    let bias = motility.migration_bias.clamp(0.0, 1.0);
    let mut direction = motility.migration_bias_direction * bias + random * (1.0 - bias);
    let n = direction.norm();
    if n > 1e-12 {
        direction /= n;
    } else {
        direction = Vec3::zeros();
    }
    motility.motility_vector = direction * motility.migration_speed;
    true
}
