//! Curve interpolation for moving objects along control points.

use cgmath::Vector3;

/// How a [`Path`] blends between control points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interpolation {
    Linear,
    /// Cardinal spline with the given tension; 0.5 is the classic Catmull-Rom.
    CatmullRom { tension: f32 },
}

/// `p0` at `x = 0`, `p1` at `x = 1`.
pub fn lerp(p0: Vector3<f32>, p1: Vector3<f32>, x: f32) -> Vector3<f32> {
    p0 * (1.0 - x) + p1 * x
}

/// Point on the cubic between `p1` (`x = 0`) and `p2` (`x = 1`).
///
/// `p0` and `p3` only shape the tangents at the ends. With tension `t = 0`
/// the tangents vanish and the segment eases in and out of each point.
pub fn catmull_rom(
    p0: Vector3<f32>,
    p1: Vector3<f32>,
    p2: Vector3<f32>,
    p3: Vector3<f32>,
    t: f32,
    x: f32,
) -> Vector3<f32> {
    let x2 = x * x;
    let x3 = x2 * x;
    p0 * (-t * x + 2.0 * t * x2 - t * x3)
        + p1 * (1.0 + (t - 3.0) * x2 - (t - 2.0) * x3)
        + p2 * (t * x + (3.0 - 2.0 * t) * x2 + (t - 2.0) * x3)
        + p3 * (-t * x2 + t * x3)
}

/// Closed loop through a list of control points.
///
/// Parameter `s` runs over `[0, n)`: its integer part picks the segment, its
/// fractional part the position within.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    points: Vec<Vector3<f32>>,
}

impl Path {
    pub fn new(points: Vec<Vector3<f32>>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Vector3<f32>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    fn point(&self, index: usize) -> Vector3<f32> {
        self.points[index % self.points.len()]
    }

    /// Position at parameter `s`; `None` for an empty path.
    pub fn sample(&self, s: f32, mode: Interpolation) -> Option<Vector3<f32>> {
        if self.points.is_empty() {
            return None;
        }
        let s = self.wrap(s);
        let i = s.floor() as usize;
        let x = s - s.floor();
        Some(match mode {
            Interpolation::Linear => lerp(self.point(i), self.point(i + 1), x),
            Interpolation::CatmullRom { tension } => catmull_rom(
                self.point(i),
                self.point(i + 1),
                self.point(i + 2),
                self.point(i + 3),
                tension,
                x,
            ),
        })
    }

    /// Move the parameter forward by `ds`, wrapping around the loop.
    pub fn advance(&self, s: f32, ds: f32) -> f32 {
        self.wrap(s + ds)
    }

    fn wrap(&self, s: f32) -> f32 {
        let n = self.points.len() as f32;
        if n == 0.0 {
            return 0.0;
        }
        let wrapped = s.rem_euclid(n);
        // rem_euclid can round up to exactly n for tiny negative inputs
        if wrapped >= n { 0.0 } else { wrapped }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn triangle() -> Path {
        Path::new(vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(4.0, 0.0, 0.0),
            Vector3::new(4.0, 4.0, 0.0),
        ])
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(3.0, 2.0, 1.0);
        assert_eq!(lerp(a, b, 0.0), a);
        assert_eq!(lerp(a, b, 1.0), b);
        assert_relative_eq!(lerp(a, b, 0.5), Vector3::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn catmull_rom_hits_the_inner_points() {
        let p = [
            Vector3::new(-1.0, 5.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(7.0, -3.0, 2.0),
        ];
        for tension in [0.0, 0.5, 1.0] {
            assert_relative_eq!(catmull_rom(p[0], p[1], p[2], p[3], tension, 0.0), p[1]);
            assert_relative_eq!(
                catmull_rom(p[0], p[1], p[2], p[3], tension, 1.0),
                p[2],
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn linear_path_wraps_to_the_start() {
        let path = triangle();
        assert_relative_eq!(
            path.sample(2.5, Interpolation::Linear).unwrap(),
            Vector3::new(2.0, 2.0, 0.0)
        );
        assert_eq!(path.advance(2.5, 1.0), 0.5);
        assert_eq!(path.advance(0.5, -1.0), 2.5);
    }

    #[test]
    fn catmull_rom_path_starts_at_the_second_point() {
        let path = triangle();
        let at_zero = path
            .sample(0.0, Interpolation::CatmullRom { tension: 0.5 })
            .unwrap();
        assert_relative_eq!(at_zero, Vector3::new(4.0, 0.0, 0.0));
    }

    #[test]
    fn empty_path_has_no_samples() {
        let path = Path::new(Vec::new());
        assert_eq!(path.sample(1.0, Interpolation::Linear), None);
        assert_eq!(path.advance(3.0, 1.0), 0.0);
    }
}
