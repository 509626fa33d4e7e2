//! Error types for URDF parsing and loading.

use thiserror::Error;

/// Errors that can occur while turning URDF bytes into a model.
#[derive(Debug, Error)]
pub enum UrdfError {
    /// Malformed XML or malformed attribute content.
    #[error("parse error at line {line}: {msg}")]
    ParseError {
        /// 1-based line of the failure in the source document.
        line: usize,
        /// What went wrong.
        msg: String,
    },

    /// A joint declared a type this engine does not support.
    #[error("unsupported joint type '{kind}' on joint '{name}'")]
    UnsupportedJointType {
        /// The offending joint name.
        name: String,
        /// The declared type string.
        kind: String,
    },

    /// The link/joint graph contains a cycle.
    #[error("cyclic model: {0}")]
    CyclicModel(String),

    /// More than one link has no parent joint.
    #[error("multiple root links: {0:?}")]
    MultipleRoots(Vec<String>),

    /// A joint references a link that is not declared.
    #[error("dangling link '{link}' referenced by joint '{joint}'")]
    DanglingLink {
        /// The undeclared link name.
        link: String,
        /// The joint that referenced it.
        joint: String,
    },

    /// No root link exists (every link is some joint's child).
    #[error("no root link (every link is a child)")]
    NoRoot,

    /// Two links or two joints share a name.
    #[error("duplicate {kind} name: {name}")]
    DuplicateName {
        /// `"link"` or `"joint"`.
        kind: &'static str,
        /// The repeated name.
        name: String,
    },

    /// A link declared a negative or non-finite mass.
    #[error("invalid mass {mass} on link '{link}'")]
    InvalidMass {
        /// The offending link.
        link: String,
        /// The declared mass.
        mass: f64,
    },

    /// A link declared a non-physical inertia tensor.
    #[error("invalid inertia on link '{link}': {reason}")]
    InvalidInertia {
        /// The offending link.
        link: String,
        /// What failed.
        reason: String,
    },

    /// Model construction rejected the converted tree.
    #[error("model build failed: {0}")]
    Build(#[from] rdyn_types::ModelError),
}

impl UrdfError {
    /// Create a parse error at a document line.
    #[must_use]
    pub fn parse(line: usize, msg: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            msg: msg.into(),
        }
    }
}

/// Result type for URDF operations.
pub type Result<T> = std::result::Result<T, UrdfError>;
