//! Position-only inverse kinematics.
//!
//! A damped-least-squares solver over the translational Jacobian: given a
//! Cartesian target for an end-effector joint, iterate
//! `Δq = J_tᵀ·(J_t·J_tᵀ + λ²·I₃)⁻¹·(p − target)` until the position error
//! falls under tolerance. Orientation is not constrained.
//!
//! Failures inside the loop (singular damped system, non-finite step)
//! never surface as errors: the result simply reports `converged = false`
//! with the last finite state reached.
//!
//! # Example
//!
//! ```
//! use rdyn_ik::{solve_ik, IkOptions};
//! use rdyn_types::{Data, JointKind, JointLimits, ModelBuilder};
//! use rdyn_spatial::{SE3, SpatialInertia};
//! use nalgebra::{Point3, Vector3};
//!
//! // 2-link planar arm, 0.5 m links
//! let mut b = ModelBuilder::new("arm");
//! let j1 = b.add_joint(0, JointKind::revolute(Vector3::z()), SE3::identity(),
//!                      JointLimits::unlimited(), "shoulder").unwrap();
//! let j2 = b.add_joint(j1, JointKind::revolute(Vector3::z()),
//!                      SE3::from_translation(Vector3::new(0.5, 0.0, 0.0)),
//!                      JointLimits::unlimited(), "elbow").unwrap();
//! b.add_joint(j2, JointKind::Fixed, SE3::from_translation(Vector3::new(0.5, 0.0, 0.0)),
//!             JointLimits::unlimited(), "tool").unwrap();
//! let model = b.finalize().unwrap();
//! let mut data = Data::new(&model);
//!
//! let result = solve_ik(&model, &mut data, &Point3::new(0.7, 0.3, 0.0),
//!                       &[0.1, -0.1], &IkOptions::default()).unwrap();
//! assert!(result.converged);
//! ```

#![doc(html_root_url = "https://docs.rs/rdyn-ik/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod solver;

pub use solver::{solve_ik, IkOptions, IkResult};
