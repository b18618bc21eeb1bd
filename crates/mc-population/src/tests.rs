//! Unit tests for mc-population.
//!
//! The default domain is [0, 100]³ with 20 µm voxels; cells are MCF-7
//! defaults on the `live` cycle.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use mc_agent::{CellDefinitions, Phenotype, StandardModels};
    use mc_core::{CellId, CellKey, CellRng, CellTypeId, DomainConfig, RngPurpose, Vec3};

    use crate::Population;

    pub fn domain() -> DomainConfig {
        DomainConfig { min: [0.0; 3], max: [100.0; 3], voxel_size: 20.0, ..DomainConfig::default() }
    }

    pub fn population() -> (Population, CellTypeId) {
        let models = StandardModels::new().unwrap();
        let mut defs = CellDefinitions::new();
        let tumor = defs.add("tumor", Phenotype::new(Arc::clone(&models.live), &models)).unwrap();
        (Population::from_domain(&domain(), defs).unwrap(), tumor)
    }

    pub fn at(pop: &mut Population, ty: CellTypeId, x: f64, y: f64, z: f64) -> CellKey {
        pop.place(ty, Vec3::new(x, y, z)).unwrap()
    }

    pub fn rng() -> CellRng {
        CellRng::for_step(5, CellId(0), 0, RngPurpose::Division)
    }
}

// ── Creation and placement ────────────────────────────────────────────────────

#[cfg(test)]
mod placement_tests {
    use mc_core::{CellId, Vec3};
    use mc_spatial::DomainFace;

    use super::helpers::{at, population};
    use crate::{Placement, PopulationError};

    #[test]
    fn created_cell_is_invisible_until_positioned() {
        let (mut pop, ty) = population();
        let key = pop.create(ty).unwrap();
        assert_eq!(pop.len(), 1);
        assert!(pop.grid().is_empty());
        assert!(!pop.get(key).unwrap().is_in_play());

        let placed = pop.assign_position(key, Vec3::new(50.0, 50.0, 50.0)).unwrap();
        let Placement::Inside(voxel) = placed else { panic!("expected inside, got {placed:?}") };
        assert!(pop.grid().contains(key, voxel));
        assert_eq!(pop.get(key).unwrap().voxel, Some(voxel));
        pop.check_consistency().unwrap();
    }

    #[test]
    fn ids_increase_monotonically() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 10.0, 10.0, 10.0);
        let b = at(&mut pop, ty, 30.0, 10.0, 10.0);
        let ida = pop.get(a).unwrap().id;
        pop.finalize_removal(a).unwrap();
        let c = at(&mut pop, ty, 50.0, 10.0, 10.0);
        let (idb, idc) = (pop.get(b).unwrap().id, pop.get(c).unwrap().id);
        assert!(ida < idb && idb < idc);
        assert_eq!(idc, CellId(2));
    }

    #[test]
    fn unknown_type_name_fails() {
        let (mut pop, _) = population();
        assert!(matches!(pop.create_by_name("stroma"), Err(PopulationError::Agent(_))));
        assert!(pop.create_by_name("tumor").is_ok());
    }

    #[test]
    fn move_updates_bucket() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 10.0, 10.0, 10.0);
        let old = pop.get(key).unwrap().voxel.unwrap();
        pop.move_cell(key, Vec3::new(90.0, 90.0, 90.0)).unwrap();
        let new = pop.get(key).unwrap().voxel.unwrap();
        assert_ne!(old, new);
        assert!(!pop.grid().contains(key, old));
        assert!(pop.grid().contains(key, new));
        pop.check_consistency().unwrap();
    }

    #[test]
    fn move_requires_position() {
        let (mut pop, ty) = population();
        let key = pop.create(ty).unwrap();
        let err = pop.move_cell(key, Vec3::zeros()).unwrap_err();
        assert!(matches!(err, PopulationError::NotPositioned(k) if k == key));
    }

    #[test]
    fn position_outside_domain_flags_cell() {
        let (mut pop, ty) = population();
        let key = pop.create(ty).unwrap();
        let placed = pop.assign_position(key, Vec3::new(-5.0, 50.0, 50.0)).unwrap();
        assert_eq!(placed, Placement::OutOfDomain(DomainFace::LowerX));

        let cell = pop.get(key).unwrap();
        assert!(cell.is_out_of_domain);
        assert!(!cell.is_active);
        assert_eq!(cell.voxel, None);
        assert_eq!(pop.grid().outer(DomainFace::LowerX), vec![key]);
        assert_eq!(pop.counts().out_of_domain, 1);
        pop.check_consistency().unwrap();
    }

    #[test]
    fn flagging_is_idempotent() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 50.0, 50.0, 50.0);
        pop.get_mut(key).unwrap().position = Vec3::new(50.0, 150.0, 50.0);
        assert_eq!(pop.flag_out_of_domain(key).unwrap(), DomainFace::UpperY);
        assert_eq!(pop.flag_out_of_domain(key).unwrap(), DomainFace::UpperY);
        assert_eq!(pop.grid().outer_len(), 1);
        assert!(pop.grid().is_empty());
    }

    #[test]
    fn purge_removes_only_escaped_cells() {
        let (mut pop, ty) = population();
        let inside = at(&mut pop, ty, 50.0, 50.0, 50.0);
        at(&mut pop, ty, 50.0, 50.0, 120.0);
        at(&mut pop, ty, 50.0, -30.0, 50.0);

        let removed = pop.purge_out_of_domain().unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(pop.len(), 1);
        assert!(pop.get(inside).is_some());
        assert_eq!(pop.grid().outer_len(), 0);
        pop.check_consistency().unwrap();
    }
}

// ── Division, death, removal ──────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use approx::assert_relative_eq;

    use super::helpers::{at, population, rng};
    use crate::{DIVISION_OFFSET_FRACTION, PopulationError};

    #[test]
    fn division_conserves_volume() {
        let (mut pop, ty) = population();
        let parent = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let before = pop.get(parent).unwrap().volume();

        let child = pop.divide(parent, rng().inner()).unwrap();
        let (p, c) = (pop.get(parent).unwrap(), pop.get(child).unwrap());
        assert_relative_eq!(p.volume() + c.volume(), before, epsilon = 1e-9);
        assert_relative_eq!(p.volume(), c.volume(), epsilon = 1e-9);
        pop.check_consistency().unwrap();
    }

    #[test]
    fn daughters_are_offset_symmetrically() {
        let (mut pop, ty) = population();
        let parent = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let centre = pop.get(parent).unwrap().position;
        let child = pop.divide(parent, rng().inner()).unwrap();

        let (p, c) = (pop.get(parent).unwrap(), pop.get(child).unwrap());
        let offset = DIVISION_OFFSET_FRACTION * p.radius();
        assert_relative_eq!((p.position - centre).norm(), offset, epsilon = 1e-9);
        assert_relative_eq!((c.position - centre).norm(), offset, epsilon = 1e-9);
        assert_relative_eq!((p.position + c.position) * 0.5, centre, epsilon = 1e-9);

        let pv = p.voxel.unwrap();
        let cv = c.voxel.unwrap();
        assert!(pv == cv || pop.grid().neighbors_of(pv).contains(&cv));
    }

    #[test]
    fn child_inherits_state_but_not_attachments() {
        let (mut pop, ty) = population();
        let parent = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let other = at(&mut pop, ty, 60.0, 50.0, 50.0);
        let (pid, oid) = (pop.get(parent).unwrap().id, pop.get(other).unwrap().id);
        assert!(pop.attach(pid, oid).unwrap());
        pop.get_mut(parent).unwrap().phenotype.custom.add_variable("oxygen_debt", 3.5);

        let child = pop.divide(parent, rng().inner()).unwrap();
        let (p, c) = (pop.get(parent).unwrap(), pop.get(child).unwrap());
        assert!(c.attached.is_empty());
        assert!(p.is_attached_to(oid));
        assert_eq!(c.phenotype.cycle.current_phase, p.phenotype.cycle.current_phase);
        assert_eq!(c.phenotype.custom.get_by_name("oxygen_debt"), Some(3.5));
        assert_eq!(c.type_id, p.type_id);
        assert!(c.id > p.id);
    }

    #[test]
    fn dead_cells_do_not_divide() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 50.0, 50.0, 50.0);
        assert!(pop.mark_dead(key, 0, 0.1).unwrap());
        let err = pop.divide(key, rng().inner()).unwrap_err();
        assert!(matches!(err, PopulationError::CannotDivide(..)));
        assert_eq!(pop.len(), 1);
    }

    #[test]
    fn mark_dead_detaches_and_is_terminal() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let b = at(&mut pop, ty, 60.0, 50.0, 50.0);
        let (ida, idb) = (pop.get(a).unwrap().id, pop.get(b).unwrap().id);
        pop.attach(ida, idb).unwrap();

        assert!(pop.mark_dead(a, 0, 0.1).unwrap());
        assert!(pop.get(a).unwrap().is_dead());
        assert!(pop.get(a).unwrap().attached.is_empty());
        assert!(pop.get(b).unwrap().attached.is_empty());

        assert!(!pop.mark_dead(a, 1, 0.1).unwrap());
        assert_eq!(pop.get(a).unwrap().phenotype.death.current_model(), Some(0));
        assert_eq!(pop.counts().dead, 1);
        assert_eq!(pop.counts().live, 1);
    }

    #[test]
    fn removal_invalidates_key_and_bucket() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let voxel = pop.get(key).unwrap().voxel.unwrap();
        let removed = pop.finalize_removal(key).unwrap();

        assert!(!pop.grid().contains(key, voxel));
        assert!(pop.get(key).is_none());
        assert!(pop.get_by_id(removed.id).is_none());

        let reused = at(&mut pop, ty, 50.0, 50.0, 50.0);
        assert_eq!(reused.slot, key.slot);
        assert_ne!(reused.generation, key.generation);
        assert!(pop.finalize_removal(key).is_err());
        pop.check_consistency().unwrap();
    }
}

// ── Attachments ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod attachment_tests {
    use mc_core::{CellId, CellKey};

    use super::helpers::{at, population};
    use crate::{Population, PopulationError};

    fn id(pop: &Population, key: CellKey) -> CellId {
        pop.get(key).unwrap().id
    }

    #[test]
    fn attach_is_symmetric_and_idempotent() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let b = at(&mut pop, ty, 60.0, 50.0, 50.0);
        let (ia, ib) = (id(&pop, a), id(&pop, b));

        assert!(pop.attach(ia, ib).unwrap());
        assert!(!pop.attach(ib, ia).unwrap());
        assert!(!pop.attach(ia, ia).unwrap());
        assert_eq!(pop.get(a).unwrap().attached, vec![ib]);
        assert_eq!(pop.get(b).unwrap().attached, vec![ia]);

        assert!(pop.detach(ib, ia).unwrap());
        assert!(!pop.detach(ia, ib).unwrap());
        assert!(pop.get(a).unwrap().attached.is_empty());
        assert!(pop.get(b).unwrap().attached.is_empty());
    }

    #[test]
    fn attachment_limit_is_respected() {
        let (mut pop, ty) = population();
        let hub = at(&mut pop, ty, 50.0, 50.0, 50.0);
        pop.get_mut(hub).unwrap().phenotype.mechanics.maximum_number_of_attachments = 2;
        let ih = id(&pop, hub);

        let mut made = 0;
        for i in 0..4 {
            let k = at(&mut pop, ty, 10.0 + 20.0 * i as f64, 10.0, 10.0);
            if pop.attach(ih, id(&pop, k)).unwrap() {
                made += 1;
            }
        }
        assert_eq!(made, 2);
        assert_eq!(pop.get(hub).unwrap().attached.len(), 2);
        pop.check_consistency().unwrap();
    }

    #[test]
    fn unknown_partner_is_an_error() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let err = pop.attach(id(&pop, a), CellId(999)).unwrap_err();
        assert!(matches!(err, PopulationError::Agent(_)));
        assert!(pop.detach(CellId(999), id(&pop, a)).is_err());
    }

    #[test]
    fn removal_detaches_partners() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let b = at(&mut pop, ty, 60.0, 50.0, 50.0);
        let c = at(&mut pop, ty, 40.0, 50.0, 50.0);
        let (ia, ib, ic) = (id(&pop, a), id(&pop, b), id(&pop, c));
        pop.attach(ia, ib).unwrap();
        pop.attach(ia, ic).unwrap();

        pop.finalize_removal(a).unwrap();
        assert!(pop.get(b).unwrap().attached.is_empty());
        assert!(pop.get(c).unwrap().attached.is_empty());
        pop.check_consistency().unwrap();
    }

    #[test]
    fn heal_repairs_broken_links() {
        let (mut pop, ty) = population();
        let a = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let b = at(&mut pop, ty, 60.0, 50.0, 50.0);
        let (ia, ib) = (id(&pop, a), id(&pop, b));

        // One-sided link, a dangling id, a self-link and a duplicate.
        pop.store_mut().get_mut(a).unwrap().attached = vec![ib, CellId(77), ia, ib];
        assert!(pop.check_consistency().is_err());

        assert_eq!(pop.heal_attachments(), 4);
        assert_eq!(pop.get(a).unwrap().attached, vec![ib]);
        assert_eq!(pop.get(b).unwrap().attached, vec![ia]);
        assert_eq!(pop.heal_attachments(), 0);
        pop.check_consistency().unwrap();
    }
}

// ── Consistency checker ───────────────────────────────────────────────────────

#[cfg(test)]
mod consistency_tests {
    use mc_core::Vec3;

    use super::helpers::{at, population};
    use crate::PopulationError;

    #[test]
    fn detects_stray_voxel_handle() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let elsewhere = pop.grid().mesh().voxel_index(&Vec3::new(10.0, 10.0, 10.0)).unwrap();
        pop.store_mut().get_mut(key).unwrap().voxel = Some(elsewhere);
        assert!(matches!(pop.check_consistency(), Err(PopulationError::Inconsistent(_))));
    }

    #[test]
    fn detects_cell_missing_from_grid() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 50.0, 50.0, 50.0);
        let voxel = pop.get(key).unwrap().voxel.unwrap();
        pop.grid().remove(key, voxel).unwrap();
        assert!(pop.check_consistency().is_err());
    }

    #[test]
    fn detects_cell_in_two_buckets() {
        let (mut pop, ty) = population();
        let key = at(&mut pop, ty, 10.0, 10.0, 10.0);
        pop.grid().insert(key, &Vec3::new(50.0, 50.0, 50.0)).unwrap();
        let err = pop.check_consistency().unwrap_err();
        assert!(err.to_string().contains("more than one bucket"), "{err}");
    }

    #[test]
    fn busy_population_stays_consistent() {
        let (mut pop, ty) = population();
        let mut keys = Vec::new();
        for i in 0..5 {
            for j in 0..5 {
                keys.push(at(&mut pop, ty, 10.0 + 20.0 * i as f64, 10.0 + 20.0 * j as f64, 50.0));
            }
        }
        let mut rng = super::helpers::rng();
        for &k in keys.iter().step_by(3) {
            pop.divide(k, rng.inner()).unwrap();
        }
        for &k in keys.iter().skip(1).step_by(4) {
            pop.finalize_removal(k).unwrap();
        }
        pop.move_cell(keys[0], Vec3::new(95.0, 95.0, 5.0)).unwrap();
        pop.move_cell(keys[2], Vec3::new(500.0, 0.0, 0.0)).unwrap();

        pop.check_consistency().unwrap();
        let counts = pop.counts();
        assert_eq!(counts.live + counts.dead + counts.out_of_domain, pop.len());
        assert_eq!(counts.out_of_domain, 1);
    }
}
