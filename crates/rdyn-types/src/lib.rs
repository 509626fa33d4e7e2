//! Core model and scratch-data types for robot analysis.
//!
//! This crate provides the static description of an articulated robot and
//! the per-query scratch state the dynamics kernel writes into:
//!
//! - [`Model`] - immutable kinematic/inertial description (joints, links,
//!   limits, gravity), built once through [`ModelBuilder`]
//! - [`Data`] - mutable per-worker scratch buffers, preallocated from a
//!   [`Model`] and overwritten by every kernel call
//! - [`Joint`] / [`JointKind`] - the joint taxonomy (fixed, revolute,
//!   continuous, prismatic) as a tagged sum
//! - [`ModelError`] / [`KernelError`] - build-time and query-time failures
//!
//! # Configuration layout
//!
//! A configuration vector `q` has length [`Model::nq`]: one scalar per
//! revolute/prismatic joint, a `(cos θ, sin θ)` pair per continuous joint,
//! nothing for fixed joints. Velocity and acceleration vectors have length
//! [`Model::nv`]: one scalar per movable joint. `nq ≥ nv` whenever the
//! model contains continuous joints.
//!
//! # Threading
//!
//! A finalized [`Model`] is immutable and freely shareable across threads
//! by reference. A [`Data`] belongs to exactly one worker; parallel hosts
//! create one `Data` per thread.
//!
//! # Example
//!
//! ```
//! use rdyn_types::{JointKind, JointLimits, ModelBuilder};
//! use rdyn_spatial::{SE3, SpatialInertia};
//! use nalgebra::Vector3;
//!
//! let mut builder = ModelBuilder::new("pendulum");
//! let j = builder
//!     .add_joint(
//!         0,
//!         JointKind::revolute(Vector3::z()),
//!         SE3::identity(),
//!         JointLimits::new(-1.0, 1.0),
//!         "swing",
//!     )
//!     .unwrap();
//! builder.append_body(j, SpatialInertia::point_mass(1.0, Vector3::x()), SE3::identity()).unwrap();
//! let model = builder.finalize().unwrap();
//!
//! assert_eq!(model.nq(), 1);
//! assert_eq!(model.nv(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/rdyn-types/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::cast_precision_loss,  // usize to f64 is fine for counts
    clippy::missing_errors_doc,   // Error docs added where non-obvious
)]

mod data;
mod error;
mod joint;
mod model;

pub use data::Data;
pub use error::{KernelError, ModelError};
pub use joint::{Joint, JointKind, JointLimits};
pub use model::{Link, Model, ModelBuilder, STANDARD_GRAVITY};

/// Result type for model-construction operations.
pub type BuildResult<T> = std::result::Result<T, ModelError>;

/// Result type for numerical queries.
pub type QueryResult<T> = std::result::Result<T, KernelError>;
