//! Rigid transforms on SE(3) and their action on spatial vectors.

use nalgebra::{Matrix3, Matrix6, Point3, Rotation3, Unit, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::{Force, Motion};
use crate::skew;

/// A rigid transform: rotation `R` and translation `t`.
///
/// Written `aMb`, it maps coordinates in frame `b` to frame `a`:
/// `x_a = R · x_b + t`, where `t` is the position of `b`'s origin in `a`.
///
/// # Example
///
/// ```
/// use rdyn_spatial::SE3;
/// use nalgebra::{Point3, Vector3};
/// use std::f64::consts::FRAC_PI_2;
///
/// let m = SE3::rotation_about(&Vector3::z(), FRAC_PI_2)
///     .with_translation(Vector3::new(1.0, 0.0, 0.0));
/// let p = m.act_point(&Point3::new(1.0, 0.0, 0.0));
/// assert!((p - Point3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SE3 {
    /// Rotation matrix (frame `b`'s axes expressed in frame `a`).
    pub rotation: Matrix3<f64>,
    /// Position of frame `b`'s origin in frame `a`.
    pub translation: Vector3<f64>,
}

impl Default for SE3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl SE3 {
    /// Create a transform from rotation and translation.
    #[must_use]
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// The identity transform.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// A pure translation.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation,
        }
    }

    /// A pure rotation about a (non-zero) axis by `angle` radians.
    #[must_use]
    pub fn rotation_about(axis: &Vector3<f64>, angle: f64) -> Self {
        let rot = Rotation3::from_axis_angle(&Unit::new_normalize(*axis), angle);
        Self {
            rotation: rot.into_inner(),
            translation: Vector3::zeros(),
        }
    }

    /// A rotation from extrinsic roll-pitch-yaw angles (URDF `rpy` convention:
    /// `R = Rz(yaw) · Ry(pitch) · Rx(roll)`).
    #[must_use]
    pub fn from_rpy(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            rotation: Rotation3::from_euler_angles(roll, pitch, yaw).into_inner(),
            translation: Vector3::zeros(),
        }
    }

    /// Replace the translation, keeping the rotation.
    #[must_use]
    pub fn with_translation(mut self, translation: Vector3<f64>) -> Self {
        self.translation = translation;
        self
    }

    /// Compose two transforms: `(self * other)` maps `other`'s source frame
    /// through `other` then `self`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// The inverse transform (`bMa` from `aMb`).
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rt = self.rotation.transpose();
        Self {
            rotation: rt,
            translation: -(rt * self.translation),
        }
    }

    /// Transform a point from frame `b` to frame `a`.
    #[must_use]
    pub fn act_point(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation * p.coords + self.translation)
    }

    /// Transform a point from frame `a` back to frame `b`.
    #[must_use]
    pub fn act_inv_point(&self, p: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.transpose() * (p.coords - self.translation))
    }

    /// Rotate a free vector from frame `b` to frame `a`.
    #[must_use]
    pub fn act_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * v
    }

    /// Rotate a free vector from frame `a` back to frame `b`.
    #[must_use]
    pub fn act_inv_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.rotation.transpose() * v
    }

    /// Change a motion vector's frame from `b` to `a` (adjoint action).
    ///
    /// The reference point moves with the frame origin, so the linear part
    /// picks up the lever-arm term `t × (R·ω)`.
    #[must_use]
    pub fn act_motion(&self, m: &Motion) -> Motion {
        let angular = self.rotation * m.angular;
        Motion {
            linear: self.rotation * m.linear + self.translation.cross(&angular),
            angular,
        }
    }

    /// Change a motion vector's frame from `a` back to `b`.
    #[must_use]
    pub fn act_inv_motion(&self, m: &Motion) -> Motion {
        let rt = self.rotation.transpose();
        Motion {
            linear: rt * (m.linear - self.translation.cross(&m.angular)),
            angular: rt * m.angular,
        }
    }

    /// Change a force vector's frame from `b` to `a` (co-adjoint action).
    ///
    /// The torque picks up the moment of the transported force: `t × (R·f)`.
    #[must_use]
    pub fn act_force(&self, f: &Force) -> Force {
        let linear = self.rotation * f.linear;
        Force {
            linear,
            angular: self.rotation * f.angular + self.translation.cross(&linear),
        }
    }

    /// Change a force vector's frame from `a` back to `b`.
    #[must_use]
    pub fn act_inv_force(&self, f: &Force) -> Force {
        let rt = self.rotation.transpose();
        Force {
            linear: rt * f.linear,
            angular: rt * (f.angular - self.translation.cross(&f.linear)),
        }
    }

    /// The 6×6 matrix of [`act_motion`](Self::act_motion) in
    /// \[linear; angular\] block order.
    #[must_use]
    pub fn motion_matrix(&self) -> Matrix6<f64> {
        let mut x = Matrix6::zeros();
        x.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        x.fixed_view_mut::<3, 3>(0, 3)
            .copy_from(&(skew(&self.translation) * self.rotation));
        x.fixed_view_mut::<3, 3>(3, 3).copy_from(&self.rotation);
        x
    }

    /// The 6×6 matrix of [`act_force`](Self::act_force) in
    /// \[linear; angular\] block order.
    #[must_use]
    pub fn force_matrix(&self) -> Matrix6<f64> {
        let mut x = Matrix6::zeros();
        x.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        x.fixed_view_mut::<3, 3>(3, 0)
            .copy_from(&(skew(&self.translation) * self.rotation));
        x.fixed_view_mut::<3, 3>(3, 3).copy_from(&self.rotation);
        x
    }

    /// Transform a 6×6 spatial operator expressed in frame `b` (mapping
    /// motions to forces, e.g. an articulated-body inertia) into frame `a`.
    ///
    /// With `Xf` the force matrix, this is `Xf · Y · Xfᵀ`.
    #[must_use]
    pub fn act_spatial_matrix(&self, y: &Matrix6<f64>) -> Matrix6<f64> {
        let xf = self.force_matrix();
        xf * y * xf.transpose()
    }

    /// Check that rotation and translation contain no `NaN` or `Inf`.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.rotation.iter().all(|x| x.is_finite())
            && self.translation.iter().all(|x| x.is_finite())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_is_noop() {
        let m = SE3::identity();
        let v = Motion::new(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
        );
        let out = m.act_motion(&v);
        assert_relative_eq!(out.linear, v.linear, epsilon = 1e-12);
        assert_relative_eq!(out.angular, v.angular, epsilon = 1e-12);
    }

    #[test]
    fn compose_then_invert_roundtrips() {
        let m = SE3::rotation_about(&Vector3::new(1.0, 1.0, 0.0), 0.7)
            .with_translation(Vector3::new(1.0, -2.0, 3.0));
        let id = m.compose(&m.inverse());
        assert_relative_eq!(id.rotation, Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(id.translation, Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn motion_roundtrip_through_inverse_action() {
        let m = SE3::rotation_about(&Vector3::z(), 0.5)
            .with_translation(Vector3::new(0.2, 0.0, -1.0));
        let v = Motion::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        let back = m.act_inv_motion(&m.act_motion(&v));
        assert_relative_eq!(back.linear, v.linear, epsilon = 1e-12);
        assert_relative_eq!(back.angular, v.angular, epsilon = 1e-12);
    }

    #[test]
    fn rotation_about_z_turns_x_into_y() {
        let m = SE3::rotation_about(&Vector3::z(), FRAC_PI_2);
        let p = m.act_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.coords, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn rpy_matches_composed_axis_rotations() {
        let (r, p, y) = (0.1, -0.2, 0.3);
        let rpy = SE3::from_rpy(r, p, y);
        let composed = SE3::rotation_about(&Vector3::z(), y)
            .compose(&SE3::rotation_about(&Vector3::y(), p))
            .compose(&SE3::rotation_about(&Vector3::x(), r));
        assert_relative_eq!(rpy.rotation, composed.rotation, epsilon = 1e-12);
    }

    #[test]
    fn motion_matrix_matches_action() {
        let m = SE3::rotation_about(&Vector3::y(), 1.1)
            .with_translation(Vector3::new(0.5, 1.5, -0.5));
        let v = Motion::new(Vector3::new(1.0, -1.0, 2.0), Vector3::new(0.3, 0.0, -0.7));
        let via_matrix = m.motion_matrix() * v.to_vector6();
        let via_action = m.act_motion(&v).to_vector6();
        assert_relative_eq!(via_matrix, via_action, epsilon = 1e-12);
    }

    #[test]
    fn force_matrix_matches_action() {
        let m = SE3::rotation_about(&Vector3::x(), -0.4)
            .with_translation(Vector3::new(-1.0, 0.25, 2.0));
        let f = Force::new(Vector3::new(0.0, 9.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let via_matrix = m.force_matrix() * f.to_vector6();
        let via_action = m.act_force(&f).to_vector6();
        assert_relative_eq!(via_matrix, via_action, epsilon = 1e-12);
    }
}
