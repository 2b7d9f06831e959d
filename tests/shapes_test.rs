use approx::assert_relative_eq;
use orrery_ngin::shapes;

mod common;
use common::test_utils::{EPSILON, assert_well_formed, length};

#[test]
fn every_generator_is_well_formed() {
    for res in [2, 3, 7, 16] {
        assert_well_formed(&shapes::grid(res, res + 1));
        assert_well_formed(&shapes::sphere(res, res + 2, 1.5));
        assert_well_formed(&shapes::torus(res + 1, res, 1.0, 2.0));
        assert_well_formed(&shapes::circle_ring(res, res + 3, 0.5, 2.0));
    }
    assert_well_formed(&shapes::quad(4.0, 6.0));
}

#[test]
fn sphere_vertices_lie_on_the_radius() {
    let radius = 2.5;
    let mesh = shapes::sphere(12, 9, radius);
    assert_eq!(mesh.positions.len(), 12 * 9);
    for p in &mesh.positions {
        assert_relative_eq!(length(*p), radius, epsilon = EPSILON);
    }
}

#[test]
fn ring_vertices_stay_between_the_radii() {
    let (inner, outer) = (1.0, 2.0);
    let res_radius = 4;
    let mesh = shapes::circle_ring(res_radius, 60, inner, outer);
    for p in &mesh.positions {
        let r = length(*p);
        assert!(r >= inner - EPSILON && r <= outer + EPSILON, "radius {r}");
    }
    // radial index 0 of every spoke sits on the inner edge
    for spoke in mesh.positions.chunks(res_radius as usize) {
        assert_relative_eq!(length(spoke[0]), inner, epsilon = EPSILON);
    }
}

#[test]
fn grid_counts_and_layout() {
    let (w, h) = (5u32, 3u32);
    let mesh = shapes::grid(w, h);
    assert_eq!(mesh.positions.len(), (w * h) as usize);
    assert_eq!(mesh.indices.len(), (2 * (w - 1) * (h - 1)) as usize);
    for p in &mesh.positions {
        assert_eq!(p.y, 0.0);
    }
    for i in 0..w as usize {
        for j in 1..h as usize {
            let k = i * h as usize + j;
            assert!(mesh.positions[k].z > mesh.positions[k - 1].z);
        }
    }
    for i in 1..w as usize {
        for j in 0..h as usize {
            let k = i * h as usize + j;
            assert!(mesh.positions[k].x > mesh.positions[k - h as usize].x);
        }
    }
}

#[test]
fn degenerate_resolutions_do_not_panic() {
    let tiny = shapes::sphere(1, 1, 1.0);
    assert!(tiny.indices.is_empty());
    let empty = shapes::grid(0, 0);
    assert_eq!(empty.positions.len(), 0);
}
