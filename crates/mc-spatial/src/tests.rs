//! Unit tests for mc-spatial.
//!
//! All tests use a 3×3×3 mesh of 10 µm voxels spanning [0, 30]³ unless
//! stated otherwise.

#[cfg(test)]
mod helpers {
    use mc_core::Vec3;

    use crate::{CartesianMesh, CellGrid};

    pub fn cube_mesh() -> CartesianMesh {
        CartesianMesh::new(Vec3::zeros(), Vec3::new(30.0, 30.0, 30.0), 10.0, 0.0).unwrap()
    }

    pub fn cube_grid() -> CellGrid {
        CellGrid::new(cube_mesh())
    }
}

// ── Mesh geometry ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod mesh_tests {
    use mc_core::{DomainConfig, Vec3, VoxelIndex};

    use super::helpers::cube_mesh;
    use crate::{CartesianMesh, DomainFace, SpatialError};

    #[test]
    fn dimensions() {
        let mesh = cube_mesh();
        assert_eq!(mesh.dims(), [3, 3, 3]);
        assert_eq!(mesh.voxel_count(), 27);
    }

    #[test]
    fn partial_voxel_rounds_up() {
        let mesh = CartesianMesh::new(Vec3::zeros(), Vec3::new(25.0, 10.0, 10.0), 10.0, 0.0).unwrap();
        assert_eq!(mesh.dims(), [3, 1, 1]);
    }

    #[test]
    fn invalid_mesh_rejected() {
        assert!(CartesianMesh::new(Vec3::zeros(), Vec3::new(10.0, 10.0, 10.0), 0.0, 0.0).is_err());
        assert!(CartesianMesh::new(Vec3::zeros(), Vec3::new(10.0, 0.0, 10.0), 1.0, 0.0).is_err());
    }

    #[test]
    fn voxel_index_by_integer_division() {
        let mesh = cube_mesh();
        assert_eq!(mesh.voxel_index(&Vec3::new(0.5, 0.5, 0.5)).unwrap(), VoxelIndex(0));
        assert_eq!(mesh.voxel_index(&Vec3::new(15.0, 0.5, 0.5)).unwrap(), VoxelIndex(1));
        assert_eq!(mesh.voxel_index(&Vec3::new(0.5, 15.0, 0.5)).unwrap(), VoxelIndex(3));
        assert_eq!(mesh.voxel_index(&Vec3::new(0.5, 0.5, 15.0)).unwrap(), VoxelIndex(9));
        assert_eq!(mesh.voxel_index(&Vec3::new(29.9, 29.9, 29.9)).unwrap(), VoxelIndex(26));
    }

    #[test]
    fn upper_boundary_clamps_into_last_voxel() {
        let mesh = cube_mesh();
        assert_eq!(mesh.voxel_index(&Vec3::new(30.0, 30.0, 30.0)).unwrap(), VoxelIndex(26));
    }

    #[test]
    fn outside_without_tolerance_is_error() {
        let mesh = cube_mesh();
        let err = mesh.voxel_index(&Vec3::new(30.5, 1.0, 1.0)).unwrap_err();
        assert!(matches!(err, SpatialError::OutOfDomain { .. }));
        assert!(mesh.voxel_index(&Vec3::new(f64::NAN, 1.0, 1.0)).is_err());
    }

    #[test]
    fn tolerance_band_clamps() {
        let mesh = CartesianMesh::new(Vec3::zeros(), Vec3::new(30.0, 30.0, 30.0), 10.0, 2.0).unwrap();
        assert_eq!(mesh.voxel_index(&Vec3::new(-1.5, 0.5, 0.5)).unwrap(), VoxelIndex(0));
        assert!(mesh.voxel_index(&Vec3::new(-2.5, 0.5, 0.5)).is_err());
    }

    #[test]
    fn moore_neighbour_counts() {
        let mesh = cube_mesh();
        // corner, edge, face, centre
        assert_eq!(mesh.neighbors(mesh.index_of([0, 0, 0])).len(), 7);
        assert_eq!(mesh.neighbors(mesh.index_of([1, 0, 0])).len(), 11);
        assert_eq!(mesh.neighbors(mesh.index_of([1, 1, 0])).len(), 17);
        assert_eq!(mesh.neighbors(mesh.index_of([1, 1, 1])).len(), 26);
    }

    #[test]
    fn moore_lists_exclude_self_and_are_symmetric() {
        let mesh = cube_mesh();
        for v in 0..mesh.voxel_count() as u32 {
            let v = VoxelIndex(v);
            assert!(!mesh.neighbors(v).contains(&v));
            for &n in mesh.neighbors(v) {
                assert!(mesh.neighbors(n).contains(&v), "{v} -> {n} not symmetric");
            }
        }
    }

    #[test]
    fn ijk_roundtrip_and_centres() {
        let mesh = cube_mesh();
        let v = mesh.index_of([2, 1, 0]);
        assert_eq!(mesh.ijk_of(v), [2, 1, 0]);
        assert_eq!(mesh.voxel_center(v), Vec3::new(25.0, 15.0, 5.0));
    }

    #[test]
    fn escaping_face() {
        let mesh = cube_mesh();
        assert_eq!(mesh.escaping_face(&Vec3::new(31.0, 5.0, 5.0)), Some(DomainFace::UpperX));
        assert_eq!(mesh.escaping_face(&Vec3::new(5.0, -1.0, 5.0)), Some(DomainFace::LowerY));
        assert_eq!(mesh.escaping_face(&Vec3::new(5.0, 5.0, 40.0)), Some(DomainFace::UpperZ));
        assert_eq!(mesh.escaping_face(&Vec3::new(5.0, 5.0, 5.0)), None);
    }

    #[test]
    fn from_config() {
        let mesh = CartesianMesh::from_config(&DomainConfig::default()).unwrap();
        // 1000 µm / 30 µm → 34 voxels per axis
        assert_eq!(mesh.dims(), [34, 34, 34]);
    }

    #[test]
    fn construction_is_logged() {
        use std::io::Write;
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Buf(Arc<Mutex<Vec<u8>>>);
        impl Write for Buf {
            fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(bytes);
                Ok(bytes.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buf = Buf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            crate::CellGrid::new(cube_mesh());
        });

        let log = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(log.contains("mechanics mesh built"), "{log}");
        assert!(log.contains("voxels=27"), "{log}");
        assert!(log.contains("cell grid allocated"), "{log}");
    }
}

// ── Grid membership ───────────────────────────────────────────────────────────

#[cfg(test)]
mod grid_tests {
    use mc_core::{CellKey, Vec3, VoxelIndex};

    use super::helpers::cube_grid;
    use crate::{DomainFace, SpatialError};

    #[test]
    fn insert_places_in_one_bucket() {
        let grid = cube_grid();
        let key = CellKey::new(0, 0);
        let v = grid.insert(key, &Vec3::new(15.0, 15.0, 15.0)).unwrap();
        assert_eq!(v, VoxelIndex(13));
        assert_eq!(grid.agents_in_voxel(v), vec![key]);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn insert_out_of_domain_inserts_nothing() {
        let grid = cube_grid();
        let err = grid.insert(CellKey::new(0, 0), &Vec3::new(100.0, 0.0, 0.0)).unwrap_err();
        assert!(err.is_out_of_domain());
        assert!(grid.is_empty());
    }

    #[test]
    fn move_within_voxel_is_noop() {
        let grid = cube_grid();
        let key = CellKey::new(1, 0);
        let v = grid.insert(key, &Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let v2 = grid.move_cell(key, v, &Vec3::new(9.0, 9.0, 9.0)).unwrap();
        assert_eq!(v, v2);
        assert_eq!(grid.agents_in_voxel(v), vec![key]);
    }

    #[test]
    fn move_across_voxels_rebuckets() {
        let grid = cube_grid();
        let key = CellKey::new(1, 0);
        let v = grid.insert(key, &Vec3::new(1.0, 1.0, 1.0)).unwrap();
        let v2 = grid.move_cell(key, v, &Vec3::new(11.0, 1.0, 1.0)).unwrap();
        assert_eq!(v2, VoxelIndex(1));
        assert!(grid.agents_in_voxel(v).is_empty());
        assert_eq!(grid.agents_in_voxel(v2), vec![key]);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn move_out_of_domain_leaves_membership() {
        let grid = cube_grid();
        let key = CellKey::new(1, 0);
        let v = grid.insert(key, &Vec3::new(1.0, 1.0, 1.0)).unwrap();
        assert!(grid.move_cell(key, v, &Vec3::new(-50.0, 1.0, 1.0)).is_err());
        assert!(grid.contains(key, v));
    }

    #[test]
    fn swap_remove_keeps_others() {
        let grid = cube_grid();
        let p = Vec3::new(5.0, 5.0, 5.0);
        let keys: Vec<CellKey> = (0..4).map(|i| CellKey::new(i, 0)).collect();
        for &k in &keys {
            grid.insert(k, &p).unwrap();
        }
        grid.remove(keys[1], VoxelIndex(0)).unwrap();
        let mut left = grid.agents_in_voxel(VoxelIndex(0));
        left.sort();
        assert_eq!(left, vec![keys[0], keys[2], keys[3]]);
    }

    #[test]
    fn sort_buckets_restores_key_order() {
        let grid = cube_grid();
        let p = Vec3::new(5.0, 5.0, 5.0);
        for i in [3, 0, 2, 1] {
            grid.insert(CellKey::new(i, 0), &p).unwrap();
        }
        grid.sort_buckets();
        let keys: Vec<u32> = grid.agents_in_voxel(VoxelIndex(0)).iter().map(|k| k.slot).collect();
        assert_eq!(keys, vec![0, 1, 2, 3]);
    }

    #[test]
    fn remove_missing_is_error() {
        let grid = cube_grid();
        let err = grid.remove(CellKey::new(9, 0), VoxelIndex(0)).unwrap_err();
        assert!(matches!(err, SpatialError::NotInBucket { .. }));
        assert!(matches!(
            grid.remove(CellKey::new(9, 0), VoxelIndex(1000)),
            Err(SpatialError::VoxelOutOfRange(_))
        ));
    }

    #[test]
    fn stale_generation_is_a_different_key() {
        let grid = cube_grid();
        let p = Vec3::new(5.0, 5.0, 5.0);
        grid.insert(CellKey::new(3, 1), &p).unwrap();
        assert!(grid.remove(CellKey::new(3, 0), VoxelIndex(0)).is_err());
    }

    #[test]
    fn neighbourhood_visit_covers_adjacent_voxels() {
        let grid = cube_grid();
        grid.insert(CellKey::new(0, 0), &Vec3::new(15.0, 15.0, 15.0)).unwrap();
        grid.insert(CellKey::new(1, 0), &Vec3::new(25.0, 25.0, 25.0)).unwrap();
        grid.insert(CellKey::new(2, 0), &Vec3::new(5.0, 5.0, 5.0)).unwrap();
        // From a corner voxel only the centre voxel is adjacent.
        let mut seen = Vec::new();
        grid.for_each_near(VoxelIndex(0), |k| seen.push(k));
        seen.sort();
        assert_eq!(seen, vec![CellKey::new(0, 0), CellKey::new(2, 0)]);
    }

    #[test]
    fn outer_lists_by_face() {
        let grid = cube_grid();
        let key = CellKey::new(4, 0);
        grid.add_to_outer(key, DomainFace::UpperX);
        assert_eq!(grid.outer(DomainFace::UpperX), vec![key]);
        assert_eq!(grid.outer_len(), 1);
        assert!(grid.remove_from_outer(key));
        assert!(!grid.remove_from_outer(key));
        assert_eq!(grid.outer_len(), 0);
    }

    #[test]
    fn concurrent_inserts_on_shared_grid() {
        use std::sync::Arc;
        use std::thread;

        let grid = Arc::new(cube_grid());
        let handles: Vec<_> = (0..4u32)
            .map(|t| {
                let grid = Arc::clone(&grid);
                thread::spawn(move || {
                    for i in 0..100u32 {
                        let p = Vec3::new((i % 30) as f64, t as f64 * 7.0, 3.0);
                        grid.insert(CellKey::new(t * 1000 + i, 0), &p).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(grid.len(), 400);
        assert_eq!(grid.entries().len(), 400);
    }
}
