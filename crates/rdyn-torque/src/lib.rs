//! Worst-case joint-torque estimation.
//!
//! Sweeps the joint-limit box with three deterministic-plus-seeded
//! sampling phases, evaluating inverse dynamics at each candidate
//! configuration with the caller's velocity and acceleration:
//!
//! 1. **Corners** - every sign pattern over the first six joints
//! 2. **Stratified grid** - seeded jittered strata across each range
//! 3. **Fixed patterns** - twelve hand-picked limit/fraction patterns
//!
//! The only randomness is the grid jitter, drawn from a `ChaCha8` stream
//! seeded by [`TorqueOptions::seed`] (default 0), so identical inputs
//! give identical reports.

#![doc(html_root_url = "https://docs.rs/rdyn-torque/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc, clippy::cast_precision_loss)]

mod sampler;

pub use sampler::{max_torques, TorqueOptions, TorqueReport};
