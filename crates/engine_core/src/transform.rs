//! Transform component with a cached model matrix.

use glam::{Mat3, Mat4, Vec3};
use std::cell::Cell;

/// A 3D transform: position, Euler rotation (degrees), and scale.
///
/// The composed model matrix is `translate * rotate_z * rotate_y * rotate_x *
/// scale`. Wheel and door placement compose local matrices on top of this
/// base, so the axis order is a contract, not an implementation detail.
///
/// The matrix is cached and recomputed lazily: every setter marks the cache
/// dirty, and the next [`Transform::matrix`] call rebuilds it, so a read
/// never observes a stale matrix.
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    /// Euler angles in degrees, applied in ZYX order.
    rotation: Vec3,
    scale: Vec3,
    cached: Cell<Mat4>,
    dirty: Cell<bool>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            cached: Cell::new(Mat4::IDENTITY),
            dirty: Cell::new(false),
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        let mut t = Self::default();
        t.set_position(position);
        t
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Euler rotation in degrees (ZYX application order).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty.set(true);
    }

    /// Set the Euler rotation in degrees.
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.dirty.set(true);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty.set(true);
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.set_scale(Vec3::splat(scale));
    }

    /// Translate the transform by a delta.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.dirty.set(true);
    }

    /// The composed model matrix. Rebuilds the cache if any setter ran since
    /// the last read.
    pub fn matrix(&self) -> Mat4 {
        if self.dirty.get() {
            self.cached.set(self.compose());
            self.dirty.set(false);
        }
        self.cached.get()
    }

    fn compose(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_z(self.rotation.z.to_radians())
            * Mat4::from_rotation_y(self.rotation.y.to_radians())
            * Mat4::from_rotation_x(self.rotation.x.to_radians())
            * Mat4::from_scale(self.scale)
    }

    /// Forward direction (+Z rotated by the current Euler angles).
    pub fn forward(&self) -> Vec3 {
        self.rotation_matrix() * Vec3::Z
    }

    /// Right direction (+X rotated by the current Euler angles).
    pub fn right(&self) -> Vec3 {
        self.rotation_matrix() * Vec3::X
    }

    fn rotation_matrix(&self) -> Mat3 {
        Mat3::from_rotation_z(self.rotation.z.to_radians())
            * Mat3::from_rotation_y(self.rotation.y.to_radians())
            * Mat3::from_rotation_x(self.rotation.x.to_radians())
    }
}

/// Normal matrix for a world transform: inverse-transpose of the upper-left
/// 3x3, so normals stay perpendicular under non-uniform scale.
pub fn normal_matrix(world: &Mat4) -> Mat3 {
    Mat3::from_mat4(*world).inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_by_default() {
        let t = Transform::default();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    /// A setter must be visible in the very next matrix read, without any
    /// explicit recompute call.
    #[test]
    fn set_position_reflected_on_next_read() {
        let mut t = Transform::default();
        assert_eq!(t.matrix(), Mat4::IDENTITY);

        t.set_position(Vec3::new(1.0, 0.0, 0.0));
        let m = t.matrix();
        assert_relative_eq!(m.w_axis.x, 1.0);
        assert_relative_eq!(m.w_axis.y, 0.0);
        assert_relative_eq!(m.w_axis.z, 0.0);
    }

    /// Matrix composition must follow translate * rz * ry * rx * scale exactly.
    #[test]
    fn composition_order_is_t_rz_ry_rx_s() {
        let mut t = Transform::default();
        t.set_position(Vec3::new(1.0, 2.0, 3.0));
        t.set_rotation(Vec3::new(30.0, 45.0, 60.0));
        t.set_scale(Vec3::new(2.0, 2.0, 0.5));

        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_z(60.0_f32.to_radians())
            * Mat4::from_rotation_y(45.0_f32.to_radians())
            * Mat4::from_rotation_x(30.0_f32.to_radians())
            * Mat4::from_scale(Vec3::new(2.0, 2.0, 0.5));

        let got = t.matrix();
        for (a, b) in got.to_cols_array().iter().zip(expected.to_cols_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-5);
        }
    }

    #[test]
    fn repeated_setters_never_leave_stale_cache() {
        let mut t = Transform::default();
        t.set_position(Vec3::X);
        let _ = t.matrix();
        t.set_position(Vec3::Y);
        t.set_scale(Vec3::splat(3.0));
        let m = t.matrix();
        assert_relative_eq!(m.w_axis.y, 1.0);
        assert_relative_eq!(m.x_axis.x, 3.0);
    }

    #[test]
    fn forward_follows_yaw() {
        let mut t = Transform::default();
        t.set_rotation(Vec3::new(0.0, 90.0, 0.0));
        let f = t.forward();
        assert_relative_eq!(f.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(f.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(f.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn normal_matrix_of_rotation_matches_rotation() {
        let mut t = Transform::default();
        t.set_rotation(Vec3::new(0.0, 37.0, 0.0));
        let n = normal_matrix(&t.matrix());
        let r = Mat3::from_rotation_y(37.0_f32.to_radians());
        for (a, b) in n.to_cols_array().iter().zip(r.to_cols_array()) {
            assert_relative_eq!(*a, b, epsilon = 1e-5);
        }
    }
}
