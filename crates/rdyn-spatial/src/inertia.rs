//! Spatial inertia of a rigid body.

use nalgebra::{Matrix3, Matrix6, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::motion::{Force, Motion};
use crate::se3::SE3;
use crate::skew;

/// Spatial inertia: mass, center-of-mass offset, and rotational inertia
/// about the center of mass.
///
/// Expressed in a body frame; the CoM offset `com` is the position of the
/// center of mass in that frame, and `inertia` is the 3×3 tensor about the
/// CoM with the frame's orientation.
///
/// # Example
///
/// ```
/// use rdyn_spatial::{Motion, SpatialInertia};
/// use nalgebra::Vector3;
///
/// let body = SpatialInertia::point_mass(2.0, Vector3::new(1.0, 0.0, 0.0));
/// let push = Motion::linear(Vector3::x());
/// let momentum = body.mul_motion(&push);
/// assert!((momentum.linear - Vector3::new(2.0, 0.0, 0.0)).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpatialInertia {
    /// Mass (kg).
    pub mass: f64,
    /// Center of mass in the body frame (m).
    pub com: Vector3<f64>,
    /// Rotational inertia about the CoM (kg·m²).
    pub inertia: Matrix3<f64>,
}

impl Default for SpatialInertia {
    fn default() -> Self {
        Self::zero()
    }
}

impl SpatialInertia {
    /// Create a spatial inertia from mass, CoM, and tensor about the CoM.
    #[must_use]
    pub const fn new(mass: f64, com: Vector3<f64>, inertia: Matrix3<f64>) -> Self {
        Self { mass, com, inertia }
    }

    /// The zero inertia (massless body).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            mass: 0.0,
            com: Vector3::zeros(),
            inertia: Matrix3::zeros(),
        }
    }

    /// A point mass at the given offset.
    #[must_use]
    pub fn point_mass(mass: f64, at: Vector3<f64>) -> Self {
        Self {
            mass,
            com: at,
            inertia: Matrix3::zeros(),
        }
    }

    /// A solid sphere centered at the body-frame origin.
    #[must_use]
    pub fn sphere(mass: f64, radius: f64) -> Self {
        let i = 0.4 * mass * radius * radius;
        Self {
            mass,
            com: Vector3::zeros(),
            inertia: Matrix3::from_diagonal(&Vector3::new(i, i, i)),
        }
    }

    /// Whether this inertia carries no mass and no rotational inertia.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.mass == 0.0 && self.inertia == Matrix3::zeros()
    }

    /// Apply to a motion: spatial momentum `h = I·v`.
    ///
    /// Linear part `m·(v + ω × c)`, angular part `I_c·ω + c × m·(v + ω × c)`.
    #[must_use]
    pub fn mul_motion(&self, m: &Motion) -> Force {
        let v_com = m.linear + m.angular.cross(&self.com);
        let p = self.mass * v_com;
        Force {
            linear: p,
            angular: self.inertia * m.angular + self.com.cross(&p),
        }
    }

    /// Expand to the 6×6 spatial inertia matrix in \[linear; angular\]
    /// block order.
    #[must_use]
    pub fn to_matrix6(&self) -> Matrix6<f64> {
        let c = skew(&self.com);
        let mut y = Matrix6::zeros();
        y.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&(Matrix3::identity() * self.mass));
        y.fixed_view_mut::<3, 3>(0, 3).copy_from(&(-self.mass * c));
        y.fixed_view_mut::<3, 3>(3, 0).copy_from(&(self.mass * c));
        y.fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&(self.inertia - self.mass * c * c));
        y
    }

    /// Express this inertia in another frame: `aMb` acting on an inertia
    /// given in frame `b` yields the same body seen from frame `a`.
    #[must_use]
    pub fn transform(&self, m: &SE3) -> Self {
        Self {
            mass: self.mass,
            com: m.act_point(&self.com.into()).coords,
            inertia: m.rotation * self.inertia * m.rotation.transpose(),
        }
    }

    /// Check that all fields are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.mass.is_finite()
            && self.com.iter().all(|x| x.is_finite())
            && self.inertia.iter().all(|x| x.is_finite())
    }

    /// Whether the mass is non-negative and the rotational tensor is
    /// symmetric positive semidefinite.
    ///
    /// The eigenvalue test allows a small negative tolerance relative to
    /// the tensor's norm so that round-off on a genuinely PSD tensor does
    /// not reject it.
    #[must_use]
    pub fn is_physical(&self) -> bool {
        let i = &self.inertia;
        let scale = 1.0 + i.norm();
        if self.mass < 0.0 || (i - i.transpose()).norm() >= 1e-9 * scale {
            return false;
        }
        i.symmetric_eigenvalues().iter().all(|&l| l >= -1e-9 * scale)
    }
}

impl std::ops::Add for SpatialInertia {
    type Output = Self;

    /// Combine two inertias expressed in the same frame.
    ///
    /// The result's tensor is taken about the combined center of mass,
    /// shifting each operand by the parallel-axis theorem.
    fn add(self, rhs: Self) -> Self {
        let mass = self.mass + rhs.mass;
        if mass == 0.0 {
            return Self {
                mass: 0.0,
                com: Vector3::zeros(),
                inertia: self.inertia + rhs.inertia,
            };
        }
        let com = (self.com * self.mass + rhs.com * rhs.mass) / mass;
        let shift = |i: &Matrix3<f64>, m: f64, c: Vector3<f64>| {
            let d = c - com;
            i + m * (Matrix3::identity() * d.norm_squared() - d * d.transpose())
        };
        Self {
            mass,
            com,
            inertia: shift(&self.inertia, self.mass, self.com)
                + shift(&rhs.inertia, rhs.mass, rhs.com),
        }
    }
}
