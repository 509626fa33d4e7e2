//! Workspace reachability sampling.
//!
//! Casts near-uniform rays from the arm's mid-limits end-effector
//! position and binary-searches each ray for the farthest point the IK
//! solver can still reach. The boundary cloud, its bounding box, and the
//! per-ray success rate come back in a [`ReachResult`]; feed the points
//! to `rdyn_hull::convex_hull` for a boundary mesh.
//!
//! Sampling can run for seconds on large models, so
//! [`sample_workspace`] takes an optional per-ray progress callback and
//! an optional cancellation flag; a cancelled run returns the partial
//! cloud collected so far.

#![doc(html_root_url = "https://docs.rs/rdyn-reach/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc, clippy::cast_precision_loss)]

mod rays;
mod sampler;

pub use rays::fibonacci_directions;
pub use sampler::{sample_workspace, Aabb, ReachOptions, ReachResult};
