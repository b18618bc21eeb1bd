//! Unit tests for mc-mechanics.
//!
//! Cells are MCF-7 defaults (radius ≈ 8.41 µm) in a [0, 100]³ domain with
//! 20 µm voxels.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use mc_agent::{CellDefinitions, Phenotype, StandardModels};
    use mc_behavior::BehaviorRegistry;
    use mc_core::{CellKey, CellTypeId, DomainConfig, NoMicroenvironment, Vec3};
    use mc_population::Population;

    use crate::{MechanicsEngine, MechanicsReport};

    pub fn population() -> (Population, CellTypeId) {
        let models = StandardModels::new().unwrap();
        let mut defs = CellDefinitions::new();
        let ty = defs.add("tumor", Phenotype::new(Arc::clone(&models.live), &models)).unwrap();
        let domain = DomainConfig { min: [0.0; 3], max: [100.0; 3], voxel_size: 20.0, ..DomainConfig::default() };
        (Population::from_domain(&domain, defs).unwrap(), ty)
    }

    pub fn at(pop: &mut Population, ty: CellTypeId, x: f64, y: f64, z: f64) -> CellKey {
        pop.place(ty, Vec3::new(x, y, z)).unwrap()
    }

    pub fn engine() -> MechanicsEngine {
        MechanicsEngine::new(0.1, 42).unwrap()
    }

    pub fn run(engine: &MechanicsEngine, pop: &mut Population, behaviors: &BehaviorRegistry, step: u64) -> MechanicsReport {
        engine.step(pop, behaviors, &NoMicroenvironment, step as f64 * 0.1, step).unwrap()
    }
}

// ── Potentials ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod potential_tests {
    use approx::assert_relative_eq;

    use mc_agent::MechanicsParams;
    use mc_core::Vec3;

    use crate::potentials::{attachment_velocity, interaction_speed, membrane_velocity};

    #[test]
    fn overlap_repels() {
        let m = MechanicsParams::default();
        let s = interaction_speed(5.0, 8.0, &m, 8.0, &m);
        // (1 - 5/16)² · 10  -  (1 - 5/20)² · 0.4
        let expected = (11.0_f64 / 16.0).powi(2) * 10.0 - 0.75_f64.powi(2) * 0.4;
        assert_relative_eq!(s, expected, epsilon = 1e-12);
        assert!(s > 0.0);
    }

    #[test]
    fn adhesion_band_attracts() {
        let m = MechanicsParams::default();
        // Past contact (16) but inside adhesion reach (20).
        assert!(interaction_speed(18.0, 8.0, &m, 8.0, &m) < 0.0);
        assert_eq!(interaction_speed(20.0, 8.0, &m, 8.0, &m), 0.0);
        assert_eq!(interaction_speed(50.0, 8.0, &m, 8.0, &m), 0.0);
    }

    #[test]
    fn strengths_combine_symmetrically() {
        let soft = MechanicsParams::default();
        let stiff = MechanicsParams { cell_cell_repulsion_strength: 40.0, ..MechanicsParams::default() };
        let ab = interaction_speed(6.0, 8.0, &soft, 9.0, &stiff);
        let ba = interaction_speed(6.0, 9.0, &stiff, 8.0, &soft);
        assert_relative_eq!(ab, ba, epsilon = 1e-12);
    }

    #[test]
    fn coincident_centres_are_finite() {
        let m = MechanicsParams::default();
        assert!(interaction_speed(0.0, 8.0, &m, 8.0, &m).is_finite());
    }

    #[test]
    fn membrane_pushes_along_normal() {
        let m = MechanicsParams::default();
        let v = membrane_velocity(2.0, &Vec3::z(), 8.0, &m);
        assert!(v.z > 0.0);
        assert_eq!(v.x, 0.0);
        assert_eq!(membrane_velocity(20.0, &Vec3::z(), 8.0, &m), Vec3::zeros());
    }

    #[test]
    fn spring_points_at_partner() {
        let v = attachment_velocity(&Vec3::zeros(), &Vec3::new(10.0, 0.0, 0.0), 0.01);
        assert_relative_eq!(v, Vec3::new(0.1, 0.0, 0.0), epsilon = 1e-12);
    }
}

// ── Motility ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod motility_tests {
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use mc_agent::Motility;
    use mc_core::Vec3;

    use crate::motility::update_motility_vector;

    #[test]
    fn non_motile_cell_is_cleared() {
        let mut m = Motility { motility_vector: Vec3::x(), ..Motility::default() };
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(!update_motility_vector(&mut m, 0.1, &mut rng, false));
        assert_eq!(m.motility_vector, Vec3::zeros());
    }

    #[test]
    fn full_bias_follows_direction() {
        let mut m = Motility {
            is_motile: true,
            persistence_time: 0.05,
            migration_speed: 2.0,
            migration_bias: 1.0,
            migration_bias_direction: Vec3::y(),
            ..Motility::default()
        };
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(update_motility_vector(&mut m, 0.1, &mut rng, false));
        assert_relative_eq!(m.motility_vector, Vec3::new(0.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn random_walk_has_configured_speed() {
        let mut m = Motility { is_motile: true, persistence_time: 0.0, migration_speed: 3.0, ..Motility::default() };
        let mut rng = SmallRng::seed_from_u64(9);
        for _ in 0..50 {
            update_motility_vector(&mut m, 0.1, &mut rng, true);
            assert_relative_eq!(m.motility_vector.norm(), 3.0, epsilon = 1e-9);
            assert_eq!(m.motility_vector.z, 0.0);
        }
    }

    #[test]
    fn turn_frequency_matches_persistence() {
        let mut rng = SmallRng::seed_from_u64(3);
        let trials = 20_000;
        let mut turns = 0;
        for _ in 0..trials {
            let mut m = Motility { is_motile: true, persistence_time: 1.0, ..Motility::default() };
            if update_motility_vector(&mut m, 0.1, &mut rng, false) {
                turns += 1;
            }
        }
        let freq = turns as f64 / trials as f64;
        assert!((freq - 0.1).abs() < 0.01, "turn frequency {freq}");
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod engine_tests {
    use approx::assert_relative_eq;

    use mc_behavior::{BehaviorRegistry, CellBehavior};
    use mc_core::{CellId, Integrator, NoMicroenvironment, Vec3};

    use super::helpers::{at, engine, population, run};
    use crate::MechanicsEngine;

    #[test]
    fn rejects_bad_time_step() {
        assert!(MechanicsEngine::new(0.0, 1).is_err());
        assert!(MechanicsEngine::new(f64::NAN, 1).is_err());
    }

    #[test]
    fn overlapping_pair_repels_equally() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let b = at(&mut pop, ty, 55.0, 50.0, 50.0);
        let behaviors = BehaviorRegistry::new();

        run(&engine(), &mut pop, &behaviors, 0);

        let (ca, cb) = (pop.get(a).unwrap(), pop.get(b).unwrap());
        let (va, vb) = (ca.previous_velocity, cb.previous_velocity);
        assert!(va.x < 0.0 && vb.x > 0.0);
        assert_relative_eq!(va, -vb, epsilon = 1e-12);
        assert_relative_eq!(va.y, 0.0);
        assert!(cb.position.x - ca.position.x > 5.0);
        assert_eq!(ca.velocity, Vec3::zeros());
        pop.check_consistency().unwrap();
    }

    #[test]
    fn isolated_cell_stays_put() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let report = run(&engine(), &mut pop, &BehaviorRegistry::new(), 0);
        assert_eq!(report.moved, 1);
        assert_eq!(pop.get(a).unwrap().position, Vec3::new(50.0, 50.0, 50.0));
    }

    #[test]
    fn attachment_pulls_distant_partners() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 30.0, 50.0, 50.0);
        let b = at(&mut pop, ty, 70.0, 50.0, 50.0);
        let (ia, ib) = (pop.get(a).unwrap().id, pop.get(b).unwrap().id);
        pop.attach(ia, ib).unwrap();

        run(&engine(), &mut pop, &BehaviorRegistry::new(), 0);
        let va = pop.get(a).unwrap().previous_velocity;
        // k = 0.01/min over 40 µm
        assert_relative_eq!(va, Vec3::new(0.4, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn fixed_cell_still_pushes_neighbours() {
        let (mut pop, ty) = population();
        let wall = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let free = at(&mut pop, ty, 55.0, 50.0, 50.0);
        pop.get_mut(wall).unwrap().is_movable = false;

        let report = run(&engine(), &mut pop, &BehaviorRegistry::new(), 0);
        assert_eq!(report.moved, 1);
        assert_eq!(pop.get(wall).unwrap().position, Vec3::new(50.0, 50.0, 50.0));
        assert!(pop.get(free).unwrap().position.x > 55.0);
    }

    #[test]
    fn escaping_cell_is_flagged_not_faulted() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 90.0, 50.0, 50.0);
        let id = pop.get(key).unwrap().id;
        pop.store_mut().get_mut(key).unwrap().position = Vec3::new(150.0, 50.0, 50.0);

        let report = run(&engine(), &mut pop, &BehaviorRegistry::new(), 0);
        assert_eq!(report.out_of_domain, vec![id]);

        let cell = pop.get(key).unwrap();
        assert!(cell.is_out_of_domain);
        assert_eq!(cell.voxel, None);
        assert!(pop.grid().is_empty());
        pop.check_consistency().unwrap();

        // Out of play: the next step ignores it.
        let report = run(&engine(), &mut pop, &BehaviorRegistry::new(), 1);
        assert_eq!(report.moved, 0);
        assert!(report.out_of_domain.is_empty());
    }

    #[test]
    fn fixed_cell_moved_outside_is_flagged() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 90.0, 50.0, 50.0);
        let id = pop.get(key).unwrap().id;
        let cell = pop.store_mut().get_mut(key).unwrap();
        cell.is_movable = false;
        cell.position = Vec3::new(150.0, 50.0, 50.0);

        let report = run(&engine(), &mut pop, &BehaviorRegistry::new(), 0);
        assert_eq!(report.moved, 0);
        assert_eq!(report.out_of_domain, vec![id]);

        let cell = pop.get(key).unwrap();
        assert!(cell.is_out_of_domain);
        assert_eq!(cell.voxel, None);
        assert_eq!(cell.position, Vec3::new(150.0, 50.0, 50.0));
        assert!(pop.grid().is_empty());
        pop.check_consistency().unwrap();
    }

    #[test]
    fn fixed_cell_is_rebucketed_when_placed_elsewhere() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 10.0, 50.0, 50.0);
        let old = pop.get(key).unwrap().voxel;
        let cell = pop.store_mut().get_mut(key).unwrap();
        cell.is_movable = false;
        cell.position = Vec3::new(70.0, 50.0, 50.0);

        let report = run(&engine(), &mut pop, &BehaviorRegistry::new(), 0);
        assert_eq!(report.rebucketed, 1);
        assert_ne!(pop.get(key).unwrap().voxel, old);
        pop.check_consistency().unwrap();
    }

    #[test]
    fn crossing_a_voxel_boundary_rebuckets() {
        let (mut pop, ty) = population();
        // Voxel boundary at x = 40; repulsion moves `a` about 0.6 µm in -x.
        let a = at(&mut pop, ty, 40.3, 50.0, 50.0);
        let b = at(&mut pop, ty, 43.8, 50.0, 50.0);
        let (old_a, old_b) = (pop.get(a).unwrap().voxel, pop.get(b).unwrap().voxel);
        assert_eq!(old_a, old_b);

        let report = run(&engine(), &mut pop, &BehaviorRegistry::new(), 0);
        assert_eq!(report.rebucketed, 1);
        assert!(pop.get(a).unwrap().position.x < 40.0);
        assert_ne!(pop.get(a).unwrap().voxel, old_a);
        assert_eq!(pop.get(b).unwrap().voxel, old_b);
        pop.check_consistency().unwrap();
    }

    #[test]
    fn adams_bashforth_uses_previous_velocity() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 50.0);
        pop.get_mut(a).unwrap().previous_velocity = Vec3::new(1.0, 0.0, 0.0);
        let mut e = engine();
        e.integrator = Integrator::AdamsBashforth;

        run(&e, &mut pop, &BehaviorRegistry::new(), 0);
        // v = 0 this step: x += 0.1 * (0 - 0.5 * 1)
        assert_relative_eq!(pop.get(a).unwrap().position.x, 49.95, epsilon = 1e-12);
        assert_eq!(pop.get(a).unwrap().previous_velocity, Vec3::zeros());
    }

    #[test]
    fn two_dimensional_runs_stay_planar() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 50.0);
        at(&mut pop, ty, 53.0, 52.0, 54.0);
        let mut e = engine();
        e.use_2d = true;
        run(&e, &mut pop, &BehaviorRegistry::new(), 0);
        assert_eq!(pop.get(a).unwrap().position.z, 50.0);
        assert!(pop.get(a).unwrap().position.x < 50.0);
    }

    struct Floor;

    impl CellBehavior for Floor {
        fn distance_to_membrane(&self, position: &Vec3) -> Option<(f64, Vec3)> {
            Some((position.z, Vec3::z()))
        }
    }

    #[test]
    fn membrane_behavior_lifts_cell() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 2.0);
        let behaviors = BehaviorRegistry::with_default(Floor);
        run(&engine(), &mut pop, &behaviors, 0);
        assert!(pop.get(a).unwrap().position.z > 2.0);
    }

    #[test]
    fn motile_cells_move_reproducibly() {
        let setup = || {
            let (mut pop, ty) = population();
            for i in 0..4 {
                let k = at(&mut pop, ty, 20.0 + 20.0 * i as f64, 50.0, 50.0);
                let m = &mut pop.get_mut(k).unwrap().phenotype.motility;
                m.is_motile = true;
                m.persistence_time = 0.5;
                m.migration_speed = 1.0;
            }
            pop
        };
        let e = engine();
        let behaviors = BehaviorRegistry::new();
        let mut first = setup();
        let mut second = setup();
        for step in 0..20 {
            run(&e, &mut first, &behaviors, step);
            run(&e, &mut second, &behaviors, step);
        }
        for id in 0..4 {
            let p1 = first.get_by_id(CellId(id)).unwrap().position;
            let p2 = second.get_by_id(CellId(id)).unwrap().position;
            assert_eq!(p1, p2);
        }
        let moved = first.get_by_id(CellId(0)).unwrap().position;
        assert_ne!(moved, Vec3::new(20.0, 50.0, 50.0));
    }

    #[test]
    fn velocity_pass_writes_nothing() {
        let (mut pop, ty) = population();
        at(&mut pop, ty, 50.0, 50.0, 50.0);
        at(&mut pop, ty, 55.0, 50.0, 50.0);
        let defs = pop.definitions().clone();
        let ctx = mc_behavior::PhenotypeContext::new(0.0, 0.1, 0, &NoMicroenvironment, &defs);
        let before: Vec<Vec3> = pop.iter().map(|(_, c)| c.position).collect();

        let updates = engine().compute_velocities(&pop, &BehaviorRegistry::new(), &ctx);
        assert_eq!(updates.len(), 2);
        let after: Vec<Vec3> = pop.iter().map(|(_, c)| c.position).collect();
        assert_eq!(before, after);
        assert_relative_eq!(updates[0].velocity, -updates[1].velocity, epsilon = 1e-12);
    }
}
