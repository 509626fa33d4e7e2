//! Intermediate representation for parsed URDF documents.
//!
//! These types mirror the XML structure before validation and model
//! conversion; defaults follow the URDF specification.

use nalgebra::{Matrix3, Vector3};
use rdyn_spatial::SE3;

/// A parsed `<robot>` document.
#[derive(Debug, Clone, Default)]
pub struct UrdfRobot {
    /// Robot name from the `<robot name>` attribute.
    pub name: String,
    /// Declared links, in document order.
    pub links: Vec<UrdfLink>,
    /// Declared joints, in document order.
    pub joints: Vec<UrdfJoint>,
}

impl UrdfRobot {
    /// Create an empty robot with a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            links: Vec::new(),
            joints: Vec::new(),
        }
    }

    /// Find a link by name.
    #[must_use]
    pub fn link(&self, name: &str) -> Option<&UrdfLink> {
        self.links.iter().find(|l| l.name == name)
    }

    /// Find a joint by name.
    #[must_use]
    pub fn joint(&self, name: &str) -> Option<&UrdfJoint> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Add a link (builder style, used by tests).
    #[must_use]
    pub fn with_link(mut self, link: UrdfLink) -> Self {
        self.links.push(link);
        self
    }

    /// Add a joint (builder style, used by tests).
    #[must_use]
    pub fn with_joint(mut self, joint: UrdfJoint) -> Self {
        self.joints.push(joint);
        self
    }
}

/// A parsed `<link>`.
#[derive(Debug, Clone)]
pub struct UrdfLink {
    /// Link name.
    pub name: String,
    /// Inertial properties, if declared. Absent means a massless link.
    pub inertial: Option<UrdfInertial>,
}

impl UrdfLink {
    /// Create a link with no inertial data.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inertial: None,
        }
    }

    /// Attach inertial data (builder style).
    #[must_use]
    pub fn with_inertial(mut self, inertial: UrdfInertial) -> Self {
        self.inertial = Some(inertial);
        self
    }
}

/// A parsed `<inertial>` block.
#[derive(Debug, Clone, Default)]
pub struct UrdfInertial {
    /// Pose of the inertial (center-of-mass) frame in the link frame.
    pub origin: UrdfOrigin,
    /// Mass in kg.
    pub mass: f64,
    /// Inertia tensor about the center of mass, in the inertial frame.
    pub inertia: UrdfInertia,
}

/// A parsed `<origin xyz rpy>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrdfOrigin {
    /// Translation (m).
    pub xyz: Vector3<f64>,
    /// Extrinsic roll-pitch-yaw rotation (rad).
    pub rpy: Vector3<f64>,
}

impl UrdfOrigin {
    /// Create an origin from translation and rpy.
    #[must_use]
    pub fn new(xyz: Vector3<f64>, rpy: Vector3<f64>) -> Self {
        Self { xyz, rpy }
    }

    /// Convert to a rigid transform.
    #[must_use]
    pub fn to_se3(&self) -> SE3 {
        SE3::from_rpy(self.rpy.x, self.rpy.y, self.rpy.z).with_translation(self.xyz)
    }
}

/// The six scalars of a parsed `<inertia>`.
#[derive(Debug, Clone, Copy, Default)]
#[allow(missing_docs)]
pub struct UrdfInertia {
    pub ixx: f64,
    pub ixy: f64,
    pub ixz: f64,
    pub iyy: f64,
    pub iyz: f64,
    pub izz: f64,
}

impl UrdfInertia {
    /// Expand to the symmetric 3×3 tensor.
    #[must_use]
    pub fn to_matrix3(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.ixx, self.ixy, self.ixz, self.ixy, self.iyy, self.iyz, self.ixz, self.iyz,
            self.izz,
        )
    }
}

/// Joint types accepted by the ingestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrdfJointKind {
    /// No relative motion.
    Fixed,
    /// Limited rotation about an axis.
    Revolute,
    /// Unbounded rotation about an axis.
    Continuous,
    /// Translation along an axis.
    Prismatic,
}

impl UrdfJointKind {
    /// Parse a `type` attribute value; `None` for unknown types.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fixed" => Some(Self::Fixed),
            "revolute" => Some(Self::Revolute),
            "continuous" => Some(Self::Continuous),
            "prismatic" => Some(Self::Prismatic),
            _ => None,
        }
    }
}

/// A parsed `<joint>`.
#[derive(Debug, Clone)]
pub struct UrdfJoint {
    /// Joint name.
    pub name: String,
    /// Declared joint type.
    pub kind: UrdfJointKind,
    /// Parent link name.
    pub parent: String,
    /// Child link name.
    pub child: String,
    /// Joint frame relative to the parent link frame.
    pub origin: UrdfOrigin,
    /// Joint axis in the joint frame (URDF default `(1, 0, 0)`).
    pub axis: Vector3<f64>,
    /// Position/effort/velocity limits, if declared.
    pub limit: Option<UrdfLimit>,
    /// Damping/friction coefficients, if declared. Retained for hosts;
    /// the analysis kernel itself ignores them.
    pub dynamics: Option<UrdfDynamics>,
}

impl UrdfJoint {
    /// Create a joint with URDF defaults (identity origin, x axis).
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: UrdfJointKind,
        parent: impl Into<String>,
        child: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            parent: parent.into(),
            child: child.into(),
            origin: UrdfOrigin::default(),
            axis: Vector3::x(),
            limit: None,
            dynamics: None,
        }
    }

    /// Set the origin (builder style).
    #[must_use]
    pub fn with_origin(mut self, origin: UrdfOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Set the axis (builder style).
    #[must_use]
    pub fn with_axis(mut self, axis: Vector3<f64>) -> Self {
        self.axis = axis;
        self
    }

    /// Set the limit (builder style).
    #[must_use]
    pub fn with_limit(mut self, limit: UrdfLimit) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A parsed `<limit>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrdfLimit {
    /// Lower position bound (rad or m).
    pub lower: f64,
    /// Upper position bound (rad or m).
    pub upper: f64,
    /// Maximum effort (N·m or N); informational.
    pub effort: f64,
    /// Maximum velocity; informational.
    pub velocity: f64,
}

/// A parsed `<dynamics>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrdfDynamics {
    /// Viscous damping coefficient.
    pub damping: f64,
    /// Static friction.
    pub friction: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn origin_to_se3() {
        let origin = UrdfOrigin::new(
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2),
        );
        let m = origin.to_se3();
        assert_relative_eq!(m.translation, Vector3::new(1.0, 2.0, 3.0), epsilon = 1e-12);
        assert_relative_eq!(m.act_vector(&Vector3::x()), Vector3::y(), epsilon = 1e-12);
    }

    #[test]
    fn inertia_matrix_is_symmetric() {
        let i = UrdfInertia {
            ixx: 1.0,
            ixy: 0.1,
            ixz: 0.2,
            iyy: 2.0,
            iyz: 0.3,
            izz: 3.0,
        };
        let m = i.to_matrix3();
        assert_relative_eq!(m, m.transpose(), epsilon = 1e-15);
        assert_relative_eq!(m[(0, 1)], 0.1);
    }

    #[test]
    fn joint_kind_parsing() {
        assert_eq!(UrdfJointKind::parse("revolute"), Some(UrdfJointKind::Revolute));
        assert_eq!(UrdfJointKind::parse("floating"), None);
        assert_eq!(UrdfJointKind::parse("planar"), None);
    }
}
