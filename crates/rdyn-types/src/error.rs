//! Error types for model construction and numerical queries.

use thiserror::Error;

/// Errors raised while building or finalizing a [`Model`](crate::Model).
///
/// These are fatal to the model under construction; the builder cannot be
/// recovered into a valid model after one is returned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ModelError {
    /// Joint axis too short to normalize.
    #[error("joint '{joint}' has a degenerate axis (norm {norm:.3e})")]
    InvalidAxis {
        /// The offending joint name.
        joint: String,
        /// The axis norm that fell below the tolerance.
        norm: f64,
    },

    /// Parent joint index does not exist yet.
    ///
    /// Joints must be added parent-first, which also guarantees the
    /// topological order `parents[j] < j`.
    #[error("parent joint index {parent} out of range ({njoints} joints present)")]
    InvalidParent {
        /// The requested parent index.
        parent: usize,
        /// Number of joints currently in the builder.
        njoints: usize,
    },

    /// Joint index passed to `append_body` does not exist.
    #[error("joint index {index} out of range ({njoints} joints present)")]
    UnknownJoint {
        /// The requested joint index.
        index: usize,
        /// Number of joints currently in the builder.
        njoints: usize,
    },

    /// Two joints share a name.
    #[error("duplicate joint name: {0}")]
    DuplicateJointName(String),

    /// A link inertia failed the physicality checks.
    #[error("inertia of link '{link}' is not physical: {reason}")]
    UnphysicalInertia {
        /// The offending link name.
        link: String,
        /// What failed (non-finite, asymmetric, negative diagonal).
        reason: String,
    },

    /// Joint limits are inverted or non-finite where finiteness is required.
    #[error("joint '{joint}' has invalid limits [{lower}, {upper}]")]
    InvalidLimits {
        /// The offending joint name.
        joint: String,
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },
}

/// Errors raised by the numerical API (kinematics, dynamics, solvers).
///
/// A failed query leaves the associated [`Data`](crate::Data) in an
/// unspecified but valid-to-overwrite state; the next call that runs its
/// own forward pass restores all invariants.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    /// An input slice had the wrong length.
    #[error("dimension mismatch for '{arg}': expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length.
        expected: usize,
        /// Actual length received.
        got: usize,
        /// Which argument was wrong (`"q"`, `"v"`, `"a"`, `"tau"`, …).
        arg: &'static str,
    },

    /// A joint index was out of range for the model.
    #[error("invalid joint index: {index}")]
    InvalidJoint {
        /// The offending index.
        index: usize,
    },

    /// An input contained `NaN` or `Inf`.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was non-finite.
        reason: String,
    },

    /// The articulated-body inertia projected onto a joint axis vanished.
    ///
    /// The caller may retry at a different configuration.
    #[error("singular articulated inertia at joint {joint}")]
    SingularArticulatedInertia {
        /// The joint whose `D = Sᵀ·Yᴬ·S` collapsed.
        joint: usize,
    },

    /// The damped least-squares system could not be inverted.
    #[error("singular jacobian: damped normal matrix not invertible")]
    SingularJacobian,
}

impl KernelError {
    /// Create a dimension-mismatch error.
    #[must_use]
    pub fn dimension(arg: &'static str, expected: usize, got: usize) -> Self {
        Self::DimensionMismatch { expected, got, arg }
    }

    /// Create an invalid-input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}
