use approx::assert_relative_eq;
use orrery_ngin::{
    Vector3,
    interpolation::{Interpolation, Path, catmull_rom, lerp},
};

mod common;
use common::test_utils::EPSILON;

fn square() -> Path {
    Path::new(vec![
        Vector3::new(0.0, 0.0, 0.0),
        Vector3::new(1.0, 0.0, 0.0),
        Vector3::new(1.0, 1.0, 0.0),
        Vector3::new(0.0, 1.0, 0.0),
    ])
}

#[test]
fn segment_ends_hit_the_control_points() {
    let p = [
        Vector3::new(-1.0, 0.0, 2.0),
        Vector3::new(0.0, 3.0, 1.0),
        Vector3::new(4.0, 1.0, -2.0),
        Vector3::new(5.0, 5.0, 5.0),
    ];
    for tension in [0.0, 0.5, 1.0] {
        assert_relative_eq!(catmull_rom(p[0], p[1], p[2], p[3], tension, 0.0), p[1], epsilon = EPSILON);
        assert_relative_eq!(catmull_rom(p[0], p[1], p[2], p[3], tension, 1.0), p[2], epsilon = EPSILON);
    }
    assert_relative_eq!(lerp(p[0], p[1], 0.5), Vector3::new(-0.5, 1.5, 1.5), epsilon = EPSILON);
}

#[test]
fn linear_path_visits_each_corner() {
    let path = square();
    for (i, corner) in path.points().iter().enumerate() {
        let sampled = path.sample(i as f32, Interpolation::Linear).unwrap();
        assert_relative_eq!(sampled, *corner, epsilon = EPSILON);
    }
    // the last segment closes the loop
    assert_relative_eq!(
        path.sample(3.5, Interpolation::Linear).unwrap(),
        Vector3::new(0.0, 0.5, 0.0),
        epsilon = EPSILON
    );
}

#[test]
fn advancing_wraps_around_the_loop() {
    let path = square();
    let mut s = 0.0;
    for _ in 0..10 {
        s = path.advance(s, 0.7);
        assert!((0.0..4.0).contains(&s));
    }
    assert_relative_eq!(s, 3.0, epsilon = EPSILON);
    assert_relative_eq!(path.advance(0.5, -1.0), 3.5, epsilon = EPSILON);
}

#[test]
fn catmull_rom_path_stays_continuous_across_segments() {
    let path = square();
    let mode = Interpolation::CatmullRom { tension: 0.5 };
    let before = path.sample(1.0 - 1e-3, mode).unwrap();
    let after = path.sample(1.0, mode).unwrap();
    assert_relative_eq!(before, after, epsilon = 1e-2);
}

#[test]
fn empty_path_has_no_position() {
    let path = Path::new(Vec::new());
    assert!(path.sample(1.0, Interpolation::Linear).is_none());
    assert_eq!(path.advance(2.0, 1.0), 0.0);
}
