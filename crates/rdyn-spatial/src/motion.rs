//! Spatial motion (twist) and force (wrench) vectors.

use nalgebra::{Vector3, Vector6};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A spatial motion vector: linear velocity ⊕ angular velocity.
///
/// Both parts are expressed in the same frame; the linear part is the
/// velocity of the point currently coincident with that frame's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Motion {
    /// Linear part (m/s).
    pub linear: Vector3<f64>,
    /// Angular part (rad/s).
    pub angular: Vector3<f64>,
}

impl Default for Motion {
    fn default() -> Self {
        Self::zero()
    }
}

impl Motion {
    /// Create a motion from linear and angular parts.
    #[must_use]
    pub const fn new(linear: Vector3<f64>, angular: Vector3<f64>) -> Self {
        Self { linear, angular }
    }

    /// The zero motion.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            linear: Vector3::zeros(),
            angular: Vector3::zeros(),
        }
    }

    /// A pure translation velocity.
    #[must_use]
    pub fn linear(v: Vector3<f64>) -> Self {
        Self {
            linear: v,
            angular: Vector3::zeros(),
        }
    }

    /// A pure rotation velocity.
    #[must_use]
    pub fn angular(omega: Vector3<f64>) -> Self {
        Self {
            linear: Vector3::zeros(),
            angular: omega,
        }
    }

    /// Motion-motion cross product (Lie bracket `v₁ × v₂`).
    #[must_use]
    pub fn cross_motion(&self, other: &Self) -> Self {
        Self {
            linear: self.angular.cross(&other.linear) + self.linear.cross(&other.angular),
            angular: self.angular.cross(&other.angular),
        }
    }

    /// Motion-force cross product (`v ×* f`), the dual of
    /// [`cross_motion`](Self::cross_motion).
    #[must_use]
    pub fn cross_force(&self, f: &Force) -> Force {
        Force {
            linear: self.angular.cross(&f.linear),
            angular: self.angular.cross(&f.angular) + self.linear.cross(&f.linear),
        }
    }

    /// Pairing with a force: the power `⟨v, f⟩`.
    #[must_use]
    pub fn dot(&self, f: &Force) -> f64 {
        self.linear.dot(&f.linear) + self.angular.dot(&f.angular)
    }

    /// Pack into a 6-vector in \[linear; angular\] order.
    #[must_use]
    pub fn to_vector6(&self) -> Vector6<f64> {
        Vector6::new(
            self.linear.x,
            self.linear.y,
            self.linear.z,
            self.angular.x,
            self.angular.y,
            self.angular.z,
        )
    }

    /// Unpack from a 6-vector in \[linear; angular\] order.
    #[must_use]
    pub fn from_vector6(v: &Vector6<f64>) -> Self {
        Self {
            linear: Vector3::new(v[0], v[1], v[2]),
            angular: Vector3::new(v[3], v[4], v[5]),
        }
    }

    /// Check for `NaN`/`Inf`.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.linear.iter().all(|x| x.is_finite()) && self.angular.iter().all(|x| x.is_finite())
    }
}

impl std::ops::Add for Motion {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            linear: self.linear + rhs.linear,
            angular: self.angular + rhs.angular,
        }
    }
}

impl std::ops::Sub for Motion {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            linear: self.linear - rhs.linear,
            angular: self.angular - rhs.angular,
        }
    }
}

impl std::ops::Mul<f64> for Motion {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self {
            linear: self.linear * s,
            angular: self.angular * s,
        }
    }
}

impl std::ops::Neg for Motion {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            linear: -self.linear,
            angular: -self.angular,
        }
    }
}

/// A spatial force vector: linear force ⊕ torque.
///
/// The torque is taken about the origin of the frame the vector is
/// expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Force {
    /// Linear force (N).
    pub linear: Vector3<f64>,
    /// Torque about the frame origin (N·m).
    pub angular: Vector3<f64>,
}

impl Default for Force {
    fn default() -> Self {
        Self::zero()
    }
}

impl Force {
    /// Create a force from linear and angular parts.
    #[must_use]
    pub const fn new(linear: Vector3<f64>, angular: Vector3<f64>) -> Self {
        Self { linear, angular }
    }

    /// The zero force.
    #[must_use]
    pub fn zero() -> Self {
        Self {
            linear: Vector3::zeros(),
            angular: Vector3::zeros(),
        }
    }

    /// Pack into a 6-vector in \[linear; angular\] order.
    #[must_use]
    pub fn to_vector6(&self) -> Vector6<f64> {
        Vector6::new(
            self.linear.x,
            self.linear.y,
            self.linear.z,
            self.angular.x,
            self.angular.y,
            self.angular.z,
        )
    }

    /// Unpack from a 6-vector in \[linear; angular\] order.
    #[must_use]
    pub fn from_vector6(v: &Vector6<f64>) -> Self {
        Self {
            linear: Vector3::new(v[0], v[1], v[2]),
            angular: Vector3::new(v[3], v[4], v[5]),
        }
    }

    /// Check for `NaN`/`Inf`.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.linear.iter().all(|x| x.is_finite()) && self.angular.iter().all(|x| x.is_finite())
    }
}

impl std::ops::Add for Force {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            linear: self.linear + rhs.linear,
            angular: self.angular + rhs.angular,
        }
    }
}

impl std::ops::Sub for Force {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            linear: self.linear - rhs.linear,
            angular: self.angular - rhs.angular,
        }
    }
}

impl std::ops::Mul<f64> for Force {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self {
            linear: self.linear * s,
            angular: self.angular * s,
        }
    }
}

impl std::ops::Neg for Force {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            linear: -self.linear,
            angular: -self.angular,
        }
    }
}
