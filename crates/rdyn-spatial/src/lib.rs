//! Spatial algebra for rigid-body kinematics and dynamics.
//!
//! This crate provides the 6-D algebra the dynamics kernel is written in:
//!
//! - [`SE3`] - rigid transforms (rotation + translation)
//! - [`Motion`] - spatial motion vectors (twists: linear ⊕ angular)
//! - [`Force`] - spatial force vectors (wrenches: force ⊕ torque)
//! - [`SpatialInertia`] - mass, center of mass, rotational inertia
//!
//! # Conventions
//!
//! Spatial vectors are stored as two `Vector3` blocks and serialize to
//! 6-vectors in **\[linear; angular\]** order. An [`SE3`] written `aMb`
//! maps coordinates expressed in frame `b` into frame `a`:
//! `x_a = R · x_b + t`.
//!
//! # Example
//!
//! ```
//! use rdyn_spatial::{Motion, SE3};
//! use nalgebra::Vector3;
//!
//! let lift = SE3::from_translation(Vector3::new(0.0, 0.0, 1.0));
//! let spin = Motion::angular(Vector3::z());
//!
//! // A pure rotation about z, seen from 1 m above, gains a linear term.
//! let seen = lift.act_motion(&spin);
//! assert!((seen.angular - Vector3::z()).norm() < 1e-12);
//! ```

#![doc(html_root_url = "https://docs.rs/rdyn-spatial/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,  // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,      // mul_add style changes aren't always clearer
)]

mod inertia;
mod motion;
mod se3;

pub use inertia::SpatialInertia;
pub use motion::{Force, Motion};
pub use se3::SE3;

// Re-export math types for convenience
pub use nalgebra::{Matrix3, Matrix6, Point3, Vector3, Vector6};

/// Skew-symmetric cross-product matrix of a 3-vector: `skew(v) * w == v × w`.
#[must_use]
pub fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn skew_matches_cross_product() {
        let v = Vector3::new(1.0, -2.0, 0.5);
        let w = Vector3::new(0.3, 0.7, -1.1);
        assert_relative_eq!(skew(&v) * w, v.cross(&w), epsilon = 1e-12);
    }

    #[test]
    fn skew_is_antisymmetric() {
        let v = Vector3::new(2.0, 3.0, 4.0);
        let s = skew(&v);
        assert_relative_eq!(s.transpose(), -s, epsilon = 1e-12);
    }
}
