//! Volume decomposition and the derived sphere geometry.
//!
//! Reference values are for an MCF-7 breast cancer cell (2494 µm³ total,
//! 540 µm³ nuclear, 75% fluid).

use mc_core::sphere_radius;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Volume {
    pub total:             f64,
    pub solid:             f64,
    pub fluid:             f64,
    pub fluid_fraction:    f64,
    pub nuclear:           f64,
    pub nuclear_fluid:     f64,
    pub nuclear_solid:     f64,
    pub cytoplasmic:       f64,
    pub cytoplasmic_fluid: f64,
    pub cytoplasmic_solid: f64,

    pub calcified_fraction:           f64,
    pub cytoplasmic_to_nuclear_ratio: f64,

    pub target_solid_cytoplasmic:            f64,
    pub target_solid_nuclear:                f64,
    pub target_fluid_fraction:               f64,
    pub target_cytoplasmic_to_nuclear_ratio: f64,

    /// All rates in 1/min.
    pub cytoplasmic_biomass_change_rate: f64,
    pub nuclear_biomass_change_rate:     f64,
    pub fluid_change_rate:               f64,
    pub calcification_rate:              f64,

    pub relative_rupture_volume: f64,
    pub rupture_volume:          f64,
}

impl Default for Volume {
    fn default() -> Self {
        let fluid_fraction = 0.75;
        let total = 2494.0;
        let nuclear = 540.0;
        let fluid = fluid_fraction * total;
        let nuclear_fluid = fluid_fraction * nuclear;
        let cytoplasmic = total - nuclear;
        let cytoplasmic_fluid = fluid_fraction * cytoplasmic;
        let ratio = cytoplasmic / (1e-16 + nuclear);
        Self {
            total,
            solid: total - fluid,
            fluid,
            fluid_fraction,
            nuclear,
            nuclear_fluid,
            nuclear_solid: nuclear - nuclear_fluid,
            cytoplasmic,
            cytoplasmic_fluid,
            cytoplasmic_solid: cytoplasmic - cytoplasmic_fluid,
            calcified_fraction: 0.0,
            cytoplasmic_to_nuclear_ratio: ratio,
            target_solid_cytoplasmic: cytoplasmic - cytoplasmic_fluid,
            target_solid_nuclear: nuclear - nuclear_fluid,
            target_fluid_fraction: fluid_fraction,
            target_cytoplasmic_to_nuclear_ratio: ratio,
            cytoplasmic_biomass_change_rate: 0.27 / 60.0,
            nuclear_biomass_change_rate: 0.33 / 60.0,
            fluid_change_rate: 3.0 / 60.0,
            calcification_rate: 0.0,
            relative_rupture_volume: 2.0,
            rupture_volume: 2.0 * total,
        }
    }
}

impl Volume {
    /// One explicit Euler step of the relaxation toward the targets.
    ///
    /// Every component is clamped at zero instead of going negative.
    pub fn update(&mut self, dt: f64) {
        self.fluid += dt * self.fluid_change_rate * (self.target_fluid_fraction * self.total - self.fluid);
        self.fluid = self.fluid.max(0.0);

        self.nuclear_fluid = (self.nuclear / (self.total + 1e-16)) * self.fluid;
        self.cytoplasmic_fluid = (self.fluid - self.nuclear_fluid).max(0.0);

        self.nuclear_solid +=
            dt * self.nuclear_biomass_change_rate * (self.target_solid_nuclear - self.nuclear_solid);
        self.nuclear_solid = self.nuclear_solid.max(0.0);

        self.target_solid_cytoplasmic = self.target_cytoplasmic_to_nuclear_ratio * self.target_solid_nuclear;
        self.cytoplasmic_solid += dt
            * self.cytoplasmic_biomass_change_rate
            * (self.target_solid_cytoplasmic - self.cytoplasmic_solid);
        self.cytoplasmic_solid = self.cytoplasmic_solid.max(0.0);

        self.solid = self.nuclear_solid + self.cytoplasmic_solid;
        self.nuclear = self.nuclear_solid + self.nuclear_fluid;
        self.cytoplasmic = self.cytoplasmic_solid + self.cytoplasmic_fluid;

        self.calcified_fraction += dt * self.calcification_rate * (1.0 - self.calcified_fraction);
        self.calcified_fraction = self.calcified_fraction.clamp(0.0, 1.0);

        self.total = self.solid + self.fluid;
        self.fluid_fraction = self.fluid / (1e-16 + self.total);
    }

    /// Scale every volume component, the rupture volume and the solid
    /// targets by `ratio`.
    pub fn multiply_by_ratio(&mut self, ratio: f64) {
        self.total *= ratio;
        self.solid *= ratio;
        self.fluid *= ratio;
        self.nuclear *= ratio;
        self.nuclear_fluid *= ratio;
        self.nuclear_solid *= ratio;
        self.cytoplasmic *= ratio;
        self.cytoplasmic_fluid *= ratio;
        self.cytoplasmic_solid *= ratio;
        self.rupture_volume *= ratio;
        self.target_solid_nuclear *= ratio;
        self.target_solid_cytoplasmic *= ratio;
    }

    /// Halve the cell for division.
    pub fn divide(&mut self) {
        self.multiply_by_ratio(0.5);
    }

    /// Set the total volume, keeping the current fractions.
    pub fn set_total(&mut self, total: f64) {
        let total = total.max(0.0);
        if self.total > 0.0 {
            self.multiply_by_ratio(total / self.total);
        } else {
            self.total = total;
        }
    }
}

/// Sphere-equivalent geometry derived from [`Volume`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub radius:         f64,
    pub nuclear_radius: f64,
    pub surface_area:   f64,
    pub polarity:       f64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            radius:         8.412_710_547_954_228,
            nuclear_radius: 5.051_670_902_881_889,
            surface_area:   889.368_528_413_169_3,
            polarity:       0.0,
        }
    }
}

impl Geometry {
    pub fn update(&mut self, volume: &Volume) {
        self.radius = sphere_radius(volume.total);
        self.nuclear_radius = sphere_radius(volume.nuclear);
        // 4πr² = 3V / r
        self.surface_area = if self.radius > 0.0 { 3.0 * volume.total / self.radius } else { 0.0 };
    }
}
