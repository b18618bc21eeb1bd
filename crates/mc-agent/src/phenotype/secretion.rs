//! Secretion and uptake rates, indexed by `SubstrateId`.

use mc_core::{SourceSink, SubstrateId, Vec3};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Secretion {
    pub secretion_rates:     Vec<f64>,
    pub uptake_rates:        Vec<f64>,
    pub saturation_densities: Vec<f64>,
    pub net_export_rates:    Vec<f64>,
}

impl Secretion {
    /// All-zero rates for `n` substrates.
    pub fn with_substrates(n: usize) -> Self {
        let mut s = Self::default();
        s.resize(n);
        s
    }

    /// Grow or shrink every vector to `n` entries, padding with zero.
    pub fn resize(&mut self, n: usize) {
        self.secretion_rates.resize(n, 0.0);
        self.uptake_rates.resize(n, 0.0);
        self.saturation_densities.resize(n, 0.0);
        self.net_export_rates.resize(n, 0.0);
    }

    #[inline]
    pub fn substrate_count(&self) -> usize {
        self.secretion_rates.len()
    }

    /// Set one substrate's rates.  Out-of-range ids are ignored.
    pub fn set(&mut self, substrate: SubstrateId, secretion: f64, saturation: f64, uptake: f64) {
        let i = substrate.index();
        if i < self.substrate_count() {
            self.secretion_rates[i] = secretion;
            self.saturation_densities[i] = saturation;
            self.uptake_rates[i] = uptake;
        }
    }

    pub fn set_all_secretion_to_zero(&mut self) {
        self.secretion_rates.iter_mut().for_each(|r| *r = 0.0);
        self.net_export_rates.iter_mut().for_each(|r| *r = 0.0);
    }

    pub fn set_all_uptake_to_zero(&mut self) {
        self.uptake_rates.iter_mut().for_each(|r| *r = 0.0);
    }

    pub fn scale_all_secretion_by_factor(&mut self, factor: f64) {
        self.secretion_rates.iter_mut().for_each(|r| *r *= factor);
        self.net_export_rates.iter_mut().for_each(|r| *r *= factor);
    }

    pub fn scale_all_uptake_by_factor(&mut self, factor: f64) {
        self.uptake_rates.iter_mut().for_each(|r| *r *= factor);
    }

    /// Package the rates as a source term for the diffusion solver.
    pub fn source_sink(&self, position: Vec3, volume: f64) -> SourceSink {
        SourceSink {
            position,
            volume,
            secretion:  self.secretion_rates.clone(),
            saturation: self.saturation_densities.clone(),
            uptake:     self.uptake_rates.clone(),
            net_export: self.net_export_rates.clone(),
        }
    }
}
