//! Rigid-body kinematics and dynamics kernel.
//!
//! All queries are pure functions of `(&Model, &mut Data, inputs)`:
//!
//! | Query | Inputs | Output |
//! |-------|--------|--------|
//! | [`forward_kinematics`] | `q` | updates `Data` placements |
//! | [`joint_placement`] | joint index | world pose of a joint frame |
//! | [`rnea`] | `q, v, a` | joint torques `τ` (inverse dynamics) |
//! | [`aba`] | `q, v, τ` | joint accelerations (forward dynamics) |
//! | [`crba`] | `q` | joint-space mass matrix `M(q)` |
//! | [`kinetic_energy`] | `q, v` | `½·vᵀM(q)v` |
//! | [`potential_energy`] | `q` | `−m·g·c_world` |
//! | [`center_of_mass`] | `q` | world CoM and total mass |
//! | [`joint_jacobian`] | `q`, joint, [`ReferenceFrame`] | 6×nv Jacobian |
//!
//! RNEA and ABA run in O(nv); CRBA in O(nv²). Nothing here allocates in
//! steady state beyond the returned output values — scratch lives in the
//! caller-owned [`Data`].
//!
//! # Determinism
//!
//! Every routine is deterministic in its inputs plus the model's immutable
//! fields; there is no randomness and no retained state between calls.
//!
//! # Example
//!
//! ```
//! use rdyn_types::{Data, JointKind, JointLimits, ModelBuilder};
//! use rdyn_spatial::{SE3, SpatialInertia};
//! use nalgebra::Vector3;
//!
//! let mut b = ModelBuilder::new("pendulum");
//! let j = b.add_joint(0, JointKind::revolute(Vector3::y()), SE3::identity(),
//!                     JointLimits::unlimited(), "swing").unwrap();
//! b.append_body(j, SpatialInertia::point_mass(1.0, Vector3::x()), SE3::identity()).unwrap();
//! let model = b.finalize().unwrap();
//! let mut data = Data::new(&model);
//!
//! // Holding torque against gravity at the horizontal
//! let tau = rdyn_core::rnea(&model, &mut data, &[0.0], &[0.0], &[0.0]).unwrap();
//! assert!((tau[0] - (-9.81)).abs() < 1e-9);
//! ```

#![doc(html_root_url = "https://docs.rs/rdyn-core/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_errors_doc,
    clippy::suboptimal_flops,
    clippy::many_single_char_names,  // math follows the textbook notation
)]

mod aba;
mod check;
mod crba;
mod energy;
mod kinematics;
pub mod linalg;
mod rnea;

pub use aba::aba;
pub use crba::crba;
pub use energy::{center_of_mass, kinetic_energy, potential_energy};
pub use kinematics::{forward_kinematics, joint_placement, joint_jacobian, ReferenceFrame};
pub use rnea::rnea;
