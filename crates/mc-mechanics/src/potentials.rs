//! Velocity contributions.  All functions return µm/min.

use mc_agent::{Cell, MechanicsParams};
use mc_core::Vec3;

/// Distances below this are treated as this, so coincident centres do not
/// divide by zero.
pub const MIN_DISTANCE: f64 = 1e-5;

/// Signed speed along the centre line for two bodies `distance` apart:
/// positive pushes apart, negative pulls together.
///
/// Repulsion strengths and adhesion strengths combine by geometric mean,
/// so the result is symmetric in the two bodies.
pub fn interaction_speed(
    distance: f64,
    ra:       f64,
    ma:       &MechanicsParams,
    rb:       f64,
    mb:       &MechanicsParams,
) -> f64 {
    let d = distance.max(MIN_DISTANCE);

    let contact = ra + rb;
    let mut speed = 0.0;
    if d < contact {
        let t = 1.0 - d / contact;
        speed = t * t * (ma.cell_cell_repulsion_strength * mb.cell_cell_repulsion_strength).sqrt();
    }

    let reach = ma.relative_maximum_adhesion_distance * ra + mb.relative_maximum_adhesion_distance * rb;
    if d < reach {
        let t = 1.0 - d / reach;
        speed -= t * t * (ma.cell_cell_adhesion_strength * mb.cell_cell_adhesion_strength).sqrt();
    }
    speed
}

/// Velocity that `b` imparts on `a`.
pub fn pair_velocity(a: &Cell, b: &Cell) -> Vec3 {
    let displacement = a.position - b.position;
    let d = displacement.norm().max(MIN_DISTANCE);
    let speed = interaction_speed(
        d,
        a.radius(),
        &a.phenotype.mechanics,
        b.radius(),
        &b.phenotype.mechanics,
    );
    if speed == 0.0 {
        return Vec3::zeros();
    }
    displacement * (speed / d)
}

/// Basement-membrane term for a cell `distance` from the membrane, along
/// `normal` (unit, pointing from the membrane to the cell).
pub fn membrane_velocity(distance: f64, normal: &Vec3, radius: f64, m: &MechanicsParams) -> Vec3 {
    let d = distance.max(MIN_DISTANCE);
    let mut speed = 0.0;
    if d < radius {
        let t = 1.0 - d / radius;
        speed = t * t * m.cell_bm_repulsion_strength;
    }
    let reach = m.relative_maximum_adhesion_distance * radius;
    if d < reach {
        let t = 1.0 - d / reach;
        speed -= t * t * m.cell_bm_adhesion_strength;
    }
    normal * speed
}

/// Linear spring towards an attached partner.
#[inline]
pub fn attachment_velocity(own: &Vec3, partner: &Vec3, elastic_constant: f64) -> Vec3 {
    (partner - own) * elastic_constant
}
