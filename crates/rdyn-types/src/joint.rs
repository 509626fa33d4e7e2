//! Joint taxonomy: kinds, limits, transforms, and motion subspaces.

use nalgebra::{Matrix3, Vector3};
use rdyn_spatial::{skew, Motion, SE3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position limits for a single movable joint.
///
/// Unbounded directions use `±∞` sentinels, matching URDF revolute joints
/// declared without a `<limit>` element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLimits {
    /// Minimum position (rad or m).
    pub lower: f64,
    /// Maximum position (rad or m).
    pub upper: f64,
}

impl Default for JointLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl JointLimits {
    /// Create limits with the given bounds.
    #[must_use]
    pub const fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Unbounded limits (`±∞` sentinels).
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    /// The full-turn default for continuous joints: `[−π, π]`.
    #[must_use]
    pub fn full_turn() -> Self {
        Self {
            lower: -std::f64::consts::PI,
            upper: std::f64::consts::PI,
        }
    }

    /// Whether both bounds are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }

    /// `upper − lower`; infinite for unbounded joints.
    #[must_use]
    pub fn range(&self) -> f64 {
        self.upper - self.lower
    }

    /// Midpoint of the bounds, or the fallback's midpoint when unbounded.
    #[must_use]
    pub fn midpoint_or(&self, fallback: Self) -> f64 {
        let l = if self.is_bounded() { *self } else { fallback };
        0.5 * (l.lower + l.upper)
    }

    /// Clamp a position into the bounds.
    #[must_use]
    pub fn clamp(&self, position: f64) -> f64 {
        position.clamp(self.lower, self.upper)
    }
}

/// The kind of a joint, carrying its axis where one applies.
///
/// The kernel is polymorphic over this tagged sum: each variant supplies
/// its own placement formula and motion subspace, with no dynamic dispatch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// No relative motion; contributes 0 DoF.
    Fixed,
    /// Rotation about `axis` with position limits; 1 DoF, 1 q-slot.
    Revolute {
        /// Unit rotation axis in the joint frame.
        axis: Vector3<f64>,
    },
    /// Unbounded rotation about `axis`; 1 DoF, stored as `(cos θ, sin θ)`.
    Continuous {
        /// Unit rotation axis in the joint frame.
        axis: Vector3<f64>,
    },
    /// Translation along `axis`; 1 DoF, 1 q-slot.
    Prismatic {
        /// Unit translation axis in the joint frame.
        axis: Vector3<f64>,
    },
}

impl JointKind {
    /// A revolute joint about the given axis.
    #[must_use]
    pub const fn revolute(axis: Vector3<f64>) -> Self {
        Self::Revolute { axis }
    }

    /// A continuous joint about the given axis.
    #[must_use]
    pub const fn continuous(axis: Vector3<f64>) -> Self {
        Self::Continuous { axis }
    }

    /// A prismatic joint along the given axis.
    #[must_use]
    pub const fn prismatic(axis: Vector3<f64>) -> Self {
        Self::Prismatic { axis }
    }

    /// Number of configuration slots this joint occupies.
    #[must_use]
    pub const fn nq(&self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::Revolute { .. } | Self::Prismatic { .. } => 1,
            Self::Continuous { .. } => 2,
        }
    }

    /// Number of velocity degrees of freedom this joint contributes.
    #[must_use]
    pub const fn nv(&self) -> usize {
        match self {
            Self::Fixed => 0,
            _ => 1,
        }
    }

    /// The joint axis, if this kind has one.
    #[must_use]
    pub fn axis(&self) -> Option<&Vector3<f64>> {
        match self {
            Self::Fixed => None,
            Self::Revolute { axis } | Self::Continuous { axis } | Self::Prismatic { axis } => {
                Some(axis)
            }
        }
    }

    /// The joint placement `jMi(q)` for this joint's configuration slice.
    ///
    /// `q` must have length [`nq`](Self::nq). Continuous `(cos, sin)` pairs
    /// are renormalized here, so any finite pair is accepted.
    #[must_use]
    pub fn joint_transform(&self, q: &[f64]) -> SE3 {
        match self {
            Self::Fixed => SE3::identity(),
            Self::Revolute { axis } => {
                SE3::new(rotation_cos_sin(axis, q[0].cos(), q[0].sin()), Vector3::zeros())
            }
            Self::Continuous { axis } => {
                let (c, s) = normalize_cos_sin(q[0], q[1]);
                SE3::new(rotation_cos_sin(axis, c, s), Vector3::zeros())
            }
            Self::Prismatic { axis } => SE3::from_translation(axis * q[0]),
        }
    }

    /// The joint motion subspace `S` in the joint frame, or `None` for
    /// fixed joints.
    #[must_use]
    pub fn motion_subspace(&self) -> Option<Motion> {
        match self {
            Self::Fixed => None,
            Self::Revolute { axis } | Self::Continuous { axis } => Some(Motion::angular(*axis)),
            Self::Prismatic { axis } => Some(Motion::linear(*axis)),
        }
    }

    /// Write this joint's neutral configuration into its `q` slice.
    ///
    /// Zero for scalar joints, `(1, 0)` for continuous.
    pub fn write_neutral(&self, q: &mut [f64]) {
        match self {
            Self::Fixed => {}
            Self::Revolute { .. } | Self::Prismatic { .. } => q[0] = 0.0,
            Self::Continuous { .. } => {
                q[0] = 1.0;
                q[1] = 0.0;
            }
        }
    }

    /// Read the scalar joint position from its `q` slice.
    ///
    /// For continuous joints this is `atan2(sin, cos)`.
    #[must_use]
    pub fn position_from_slice(&self, q: &[f64]) -> f64 {
        match self {
            Self::Fixed => 0.0,
            Self::Revolute { .. } | Self::Prismatic { .. } => q[0],
            Self::Continuous { .. } => q[1].atan2(q[0]),
        }
    }

    /// Write a scalar joint position into its `q` slice.
    pub fn position_into_slice(&self, position: f64, q: &mut [f64]) {
        match self {
            Self::Fixed => {}
            Self::Revolute { .. } | Self::Prismatic { .. } => q[0] = position,
            Self::Continuous { .. } => {
                q[0] = position.cos();
                q[1] = position.sin();
            }
        }
    }
}

impl std::fmt::Display for JointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Revolute { .. } => write!(f, "revolute"),
            Self::Continuous { .. } => write!(f, "continuous"),
            Self::Prismatic { .. } => write!(f, "prismatic"),
        }
    }
}

/// Rodrigues rotation about a unit axis from precomputed cosine and sine.
fn rotation_cos_sin(axis: &Vector3<f64>, c: f64, s: f64) -> Matrix3<f64> {
    let k = skew(axis);
    Matrix3::identity() + k * s + k * k * (1.0 - c)
}

/// Rescale a `(cos, sin)` pair to unit norm; degenerate pairs become `(1, 0)`.
fn normalize_cos_sin(c: f64, s: f64) -> (f64, f64) {
    let n = c.hypot(s);
    if n < 1e-12 {
        (1.0, 0.0)
    } else {
        (c / n, s / n)
    }
}

/// A joint in a finalized model: kind, tree position, and offsets.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Joint {
    /// Joint name (unique within the model).
    pub name: String,
    /// Parent joint index (`parents[j] < j`; the universe is its own parent).
    pub parent: usize,
    /// Joint kind with axis.
    pub kind: JointKind,
    /// Joint frame relative to the parent joint frame.
    pub placement: SE3,
    /// First configuration slot.
    pub idx_q: usize,
    /// First velocity slot.
    pub idx_v: usize,
}

impl Joint {
    /// Number of configuration slots.
    #[must_use]
    pub fn nq(&self) -> usize {
        self.kind.nq()
    }

    /// Number of velocity degrees of freedom.
    #[must_use]
    pub fn nv(&self) -> usize {
        self.kind.nv()
    }

    /// Whether this joint moves at all.
    #[must_use]
    pub fn is_movable(&self) -> bool {
        self.kind.nv() > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn dof_counts() {
        assert_eq!(JointKind::Fixed.nq(), 0);
        assert_eq!(JointKind::Fixed.nv(), 0);
        assert_eq!(JointKind::revolute(Vector3::z()).nq(), 1);
        assert_eq!(JointKind::continuous(Vector3::z()).nq(), 2);
        assert_eq!(JointKind::continuous(Vector3::z()).nv(), 1);
        assert_eq!(JointKind::prismatic(Vector3::x()).nq(), 1);
    }

    #[test]
    fn revolute_transform_rotates() {
        let kind = JointKind::revolute(Vector3::z());
        let m = kind.joint_transform(&[FRAC_PI_2]);
        let p = m.act_vector(&Vector3::x());
        assert_relative_eq!(p, Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn continuous_transform_matches_revolute() {
        let angle = 0.73;
        let rev = JointKind::revolute(Vector3::y()).joint_transform(&[angle]);
        let cont =
            JointKind::continuous(Vector3::y()).joint_transform(&[angle.cos(), angle.sin()]);
        assert_relative_eq!(rev.rotation, cont.rotation, epsilon = 1e-12);
    }

    #[test]
    fn continuous_transform_renormalizes() {
        // A scaled (cos, sin) pair must give the same rotation
        let angle: f64 = 1.1;
        let scaled = [3.0 * angle.cos(), 3.0 * angle.sin()];
        let m = JointKind::continuous(Vector3::z()).joint_transform(&scaled);
        let exact = JointKind::revolute(Vector3::z()).joint_transform(&[angle]);
        assert_relative_eq!(m.rotation, exact.rotation, epsilon = 1e-12);
    }

    #[test]
    fn prismatic_transform_translates() {
        let kind = JointKind::prismatic(Vector3::x());
        let m = kind.joint_transform(&[2.5]);
        assert_relative_eq!(m.translation, Vector3::new(2.5, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(m.rotation, Matrix3::identity(), epsilon = 1e-12);
    }

    #[test]
    fn neutral_and_position_roundtrip() {
        let kind = JointKind::continuous(Vector3::z());
        let mut q = [0.0; 2];
        kind.write_neutral(&mut q);
        assert_relative_eq!(kind.position_from_slice(&q), 0.0, epsilon = 1e-12);

        kind.position_into_slice(1.2, &mut q);
        assert_relative_eq!(kind.position_from_slice(&q), 1.2, epsilon = 1e-12);
    }

    #[test]
    fn limits_midpoint_and_fallback() {
        let bounded = JointLimits::new(-1.0, 3.0);
        assert_relative_eq!(bounded.midpoint_or(JointLimits::full_turn()), 1.0);

        let unbounded = JointLimits::unlimited();
        assert!(!unbounded.is_bounded());
        assert_relative_eq!(unbounded.midpoint_or(JointLimits::full_turn()), 0.0);
        assert_relative_eq!(JointLimits::full_turn().lower, -PI);
    }
}
