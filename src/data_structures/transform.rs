//! Local transforms of scene nodes.
//!
//! A [`Transform`] stores translation, rotation and scale separately so that
//! simulation code can nudge one component per frame (spin a planet, move a
//! bullet) without decomposing matrices.

use cgmath::{InnerSpace, Matrix4, One, Quaternion, Rad, Rotation3, Vector3};

/// Translation, rotation (as quaternion) and scale of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transform: no translation, no rotation, unit scale.
    pub fn new() -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Composed matrix `T * R * S`: scale first, then rotate, then translate.
    ///
    /// Rotation therefore happens around the node's own origin. Orbits are
    /// built by rotating a pivot node and translating its child.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.translation = translation;
    }

    pub fn translate(&mut self, delta: Vector3<f32>) {
        self.translation += delta;
    }

    pub fn set_scaling(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
    }

    /// Compose `delta` onto the current orientation, in the node's local frame.
    pub fn rotate(&mut self, delta: Quaternion<f32>) {
        // renormalise so thousands of per-frame deltas don't drift
        self.rotation = (self.rotation * delta).normalize();
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.rotate(Quaternion::from_angle_x(Rad(angle)));
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.rotate(Quaternion::from_angle_y(Rad(angle)));
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.rotate(Quaternion::from_angle_z(Rad(angle)));
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(translation: Vector3<f32>) -> Self {
        Transform {
            translation,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use cgmath::{SquareMatrix, Vector4};

    use super::*;

    #[test]
    fn identity_is_identity_matrix() {
        assert_eq!(Transform::new().to_matrix(), Matrix4::identity());
    }

    #[test]
    fn matrix_scales_then_rotates_then_translates() {
        let mut transform = Transform::from(Vector3::new(10.0, 0.0, 0.0));
        transform.set_scaling(Vector3::new(2.0, 2.0, 2.0));
        transform.rotate_z(std::f32::consts::FRAC_PI_2);
        let p = transform.to_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        // (1,0,0) -> scale (2,0,0) -> rotate (0,2,0) -> translate (10,2,0)
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn rotations_accumulate() {
        let mut twice = Transform::new();
        twice.rotate_y(0.3);
        twice.rotate_y(0.9);
        let mut once = Transform::new();
        once.rotate_y(1.2);
        assert_relative_eq!(twice.to_matrix(), once.to_matrix(), epsilon = 1e-5);
    }

    #[test]
    fn translate_adds_and_set_replaces() {
        let mut transform = Transform::new();
        transform.translate(Vector3::new(0.0, 1.0, 0.0));
        transform.translate(Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(transform.translation, Vector3::new(0.0, 2.0, 0.0));
        transform.set_translation(Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(transform.translation, Vector3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn long_spins_stay_unit_length() {
        let mut transform = Transform::new();
        for _ in 0..10_000 {
            transform.rotate_x(0.013);
            transform.rotate_y(0.021);
        }
        assert_relative_eq!(transform.rotation.magnitude(), 1.0, epsilon = 1e-5);
    }
}
