//! Vector type and small geometric helpers shared by every crate.

use std::f64::consts::PI;

use rand::Rng;

/// Position / velocity vector in microns (per minute).
pub type Vec3 = nalgebra::Vector3<f64>;

const FOUR_THIRDS_PI: f64 = 4.0 / 3.0 * PI;

/// Radius of a sphere with the given volume.
#[inline]
pub fn sphere_radius(volume: f64) -> f64 {
    (volume.max(0.0) / FOUR_THIRDS_PI).cbrt()
}

/// Volume of a sphere with the given radius.
#[inline]
pub fn sphere_volume(radius: f64) -> f64 {
    FOUR_THIRDS_PI * radius * radius * radius
}

/// Uniformly distributed random direction.
///
/// With `restrict_2d` the direction lies in the z = 0 plane.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R, restrict_2d: bool) -> Vec3 {
    let theta = rng.gen_range(0.0..2.0 * PI);
    if restrict_2d {
        return Vec3::new(theta.cos(), theta.sin(), 0.0);
    }
    // Uniform on the sphere: z = cos(phi) uniform in [-1, 1].
    let z: f64 = rng.gen_range(-1.0..=1.0);
    let s = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(s * theta.cos(), s * theta.sin(), z)
}

/// Convert a plain array (as found in configuration) into a [`Vec3`].
#[inline]
pub fn vec3(a: [f64; 3]) -> Vec3 {
    Vec3::new(a[0], a[1], a[2])
}
