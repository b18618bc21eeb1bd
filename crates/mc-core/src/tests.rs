//! Unit tests for mc-core primitives.

#[cfg(test)]
mod ids {
    use crate::{CellId, CellKey, CellTypeId, VoxelIndex};

    #[test]
    fn index_roundtrip() {
        let id = VoxelIndex(42);
        assert_eq!(id.index(), 42);
        assert_eq!(VoxelIndex::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(CellId::INVALID.0, u64::MAX);
        assert_eq!(CellTypeId::default(), CellTypeId::INVALID);
        assert!(!VoxelIndex::INVALID.is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(CellId(7).to_string(), "CellId(7)");
        assert_eq!(CellKey::new(3, 1).to_string(), "CellKey(3v1)");
    }

    #[test]
    fn type_id_overflow_rejected() {
        assert!(CellTypeId::try_from(70_000usize).is_err());
    }
}

#[cfg(test)]
mod geometry {
    use approx::assert_relative_eq;

    use crate::{CellId, CellRng, RngPurpose, random_unit_vector, sphere_radius, sphere_volume};

    #[test]
    fn mcf7_radius() {
        // Reference MCF-7 cell: 2494 µm³ → r ≈ 8.4127 µm
        assert_relative_eq!(sphere_radius(2494.0), 8.412_710_547_954_228, epsilon = 1e-9);
        assert_relative_eq!(sphere_volume(sphere_radius(2494.0)), 2494.0, epsilon = 1e-9);
    }

    #[test]
    fn negative_volume_clamps_to_zero_radius() {
        assert_eq!(sphere_radius(-1.0), 0.0);
    }

    #[test]
    fn unit_vectors_are_unit() {
        let mut rng = CellRng::for_step(7, CellId(0), 0, RngPurpose::Mechanics);
        for _ in 0..500 {
            let v = random_unit_vector(rng.inner(), false);
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn planar_unit_vectors_stay_in_plane() {
        let mut rng = CellRng::for_step(7, CellId(0), 0, RngPurpose::Mechanics);
        for _ in 0..100 {
            let v = random_unit_vector(rng.inner(), true);
            assert_eq!(v.z, 0.0);
            assert_relative_eq!(v.norm(), 1.0, epsilon = 1e-12);
        }
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig};

    #[test]
    fn clock_advances_by_dt() {
        let mut clock = SimClock::new(0.5);
        clock.advance();
        clock.advance();
        assert_eq!(clock.step, 2);
        assert!((clock.time - 1.0).abs() < 1e-12);
    }

    #[test]
    fn reached_uses_half_step() {
        let mut clock = SimClock::new(0.1);
        for _ in 0..10 {
            clock.advance();
        }
        // Accumulated 0.1 ten times is not exactly 1.0.
        assert!(clock.reached(1.0));
        assert!(!clock.reached(1.2));
    }

    #[test]
    fn clock_dhm() {
        let mut clock = SimClock::new(60.0);
        for _ in 0..25 {
            clock.advance();
        }
        assert_eq!(clock.elapsed_dhm(), (1, 1, 0));
    }

    #[test]
    fn default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn mechanics_step_smaller_than_diffusion_rejected() {
        let mut cfg = SimConfig::default();
        cfg.time_steps.mechanics_dt = 0.001;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_domain_rejected() {
        let mut cfg = SimConfig::default();
        cfg.domain.max[1] = cfg.domain.min[1];
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_threads_rejected() {
        let cfg = SimConfig { num_threads: Some(0), ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{CellId, CellRng, RngPurpose};

    #[test]
    fn same_address_same_stream() {
        let mut a = CellRng::for_step(99, CellId(5), 12, RngPurpose::Phenotype);
        let mut b = CellRng::for_step(99, CellId(5), 12, RngPurpose::Phenotype);
        for _ in 0..50 {
            assert_eq!(a.uniform(), b.uniform());
        }
    }

    #[test]
    fn cells_steps_and_purposes_differ() {
        let base = CellRng::for_step(1, CellId(0), 0, RngPurpose::Phenotype).random::<u64>();
        let other_cell = CellRng::for_step(1, CellId(1), 0, RngPurpose::Phenotype).random::<u64>();
        let other_step = CellRng::for_step(1, CellId(0), 1, RngPurpose::Phenotype).random::<u64>();
        let other_purpose = CellRng::for_step(1, CellId(0), 0, RngPurpose::Mechanics).random::<u64>();
        assert_ne!(base, other_cell);
        assert_ne!(base, other_step);
        assert_ne!(base, other_purpose);
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = CellRng::for_step(0, CellId(0), 0, RngPurpose::Division);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
        assert!(rng.gen_bool(3.0));
    }
}

#[cfg(test)]
mod environment {
    use approx::assert_relative_eq;

    use crate::{Microenvironment, SourceSink, SubstrateId, UniformMicroenvironment, Vec3};

    #[test]
    fn substrate_lookup() {
        let env = UniformMicroenvironment::new(["oxygen", "drug"], 1e6);
        assert_eq!(env.substrate_index("drug"), Some(SubstrateId(1)));
        assert_eq!(env.substrate_index("glucose"), None);
    }

    #[test]
    fn decay_reduces_concentration() {
        let mut env = UniformMicroenvironment::new(["oxygen"], 1e6);
        env.set_concentration(SubstrateId(0), 10.0);
        env.set_decay_rate(SubstrateId(0), 0.1);
        env.simulate_diffusion_decay(1.0, &[]);
        assert_relative_eq!(env.concentrations()[0], 10.0 / 1.1, epsilon = 1e-12);
    }

    #[test]
    fn uptake_never_goes_negative() {
        let mut env = UniformMicroenvironment::new(["oxygen"], 1.0);
        env.set_concentration(SubstrateId(0), 1.0);
        let sink = SourceSink {
            position:   Vec3::zeros(),
            volume:     1.0,
            secretion:  vec![0.0],
            saturation: vec![0.0],
            uptake:     vec![1e6],
            net_export: vec![0.0],
        };
        env.simulate_diffusion_decay(1.0, &[sink]);
        let c = env.concentration_at(&Vec3::zeros(), SubstrateId(0));
        assert!(c >= 0.0 && c < 1e-3, "got {c}");
    }

    #[test]
    fn supply_relaxes_to_boundary_value() {
        let mut env = UniformMicroenvironment::new(["oxygen"], 1e6);
        env.set_supply(SubstrateId(0), 38.0, 1.0);
        for _ in 0..200 {
            env.simulate_diffusion_decay(0.1, &[]);
        }
        assert_relative_eq!(env.concentrations()[0], 38.0, epsilon = 1e-3);
    }
}
