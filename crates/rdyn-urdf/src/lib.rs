//! URDF ingestion for the rdyn analysis engine.
//!
//! Turns a URDF byte buffer into a finalized [`rdyn_types::Model`]:
//!
//! 1. [`parser`] - event-driven XML parsing into an intermediate
//!    representation ([`UrdfRobot`])
//! 2. [`validation`] - structural checks: unique names, defined links,
//!    a single root, no kinematic loops
//! 3. [`loader`] - conversion of the validated tree into a `Model`
//!
//! # Supported subset
//!
//! `<robot>`, `<link>` with `<inertial>` (origin, mass, inertia), and
//! `<joint>` of type `fixed`, `revolute`, `continuous`, or `prismatic`
//! with parent/child/origin/axis/limit/dynamics. Visual and collision
//! elements are skipped: rendering and contact are not this engine's
//! concern. Anything else (`mimic`, transmissions, unknown joint types)
//! is either skipped or rejected per [`UrdfError`].
//!
//! # Example
//!
//! ```
//! use rdyn_urdf::UrdfLoader;
//!
//! let xml = r#"
//!     <robot name="pendulum">
//!         <link name="base"/>
//!         <link name="arm">
//!             <inertial>
//!                 <origin xyz="0.5 0 0"/>
//!                 <mass value="1.0"/>
//!                 <inertia ixx="0.01" iyy="0.01" izz="0.01" ixy="0" ixz="0" iyz="0"/>
//!             </inertial>
//!         </link>
//!         <joint name="swing" type="revolute">
//!             <parent link="base"/>
//!             <child link="arm"/>
//!             <axis xyz="0 0 1"/>
//!             <limit lower="-1.57" upper="1.57"/>
//!         </joint>
//!     </robot>
//! "#;
//!
//! let model = UrdfLoader::new().load_str(xml).unwrap();
//! assert_eq!(model.name(), "pendulum");
//! assert_eq!(model.nv(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/rdyn-urdf/0.1.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]

mod error;
mod loader;
mod parser;
mod types;
mod validation;

pub use error::{Result, UrdfError};
pub use loader::UrdfLoader;
pub use parser::parse_urdf_str;
pub use types::{
    UrdfDynamics, UrdfInertia, UrdfInertial, UrdfJoint, UrdfJointKind, UrdfLimit, UrdfLink,
    UrdfOrigin, UrdfRobot,
};
pub use validation::{validate, ValidationResult};
