//! Conversion of validated URDF into a finalized [`Model`].

use std::collections::HashMap;

use nalgebra::Vector3;
use rdyn_spatial::SpatialInertia;
use rdyn_types::{JointKind, JointLimits, Model, ModelBuilder};

use crate::error::Result;
use crate::parser::{parse_urdf_bytes, parse_urdf_str};
use crate::types::{UrdfJointKind, UrdfRobot};
use crate::validation::validate;

/// URDF loader with configuration options.
///
/// # Example
///
/// ```
/// use rdyn_urdf::UrdfLoader;
/// use nalgebra::Vector3;
///
/// let loader = UrdfLoader::new().with_gravity(Vector3::new(0.0, -9.81, 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct UrdfLoader {
    /// World gravity for the built model (default `(0, 0, −9.81)`).
    pub gravity: Vector3<f64>,
}

impl Default for UrdfLoader {
    fn default() -> Self {
        Self {
            gravity: Vector3::new(0.0, 0.0, -rdyn_types::STANDARD_GRAVITY),
        }
    }
}

impl UrdfLoader {
    /// Create a loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the gravity vector of the built model.
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Load a model from a URDF byte buffer.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Model> {
        self.build_model(&parse_urdf_bytes(bytes)?)
    }

    /// Load a model from a URDF string.
    pub fn load_str(&self, xml: &str) -> Result<Model> {
        self.build_model(&parse_urdf_str(xml)?)
    }

    /// Convert an already-parsed robot into a model.
    pub fn build_model(&self, robot: &UrdfRobot) -> Result<Model> {
        let checked = validate(robot)?;

        let mut builder = ModelBuilder::new(robot.name.clone()).with_gravity(self.gravity);

        // Link name -> index of the model joint carrying it; the root link
        // rides on the universe joint.
        let mut carrier: HashMap<&str, usize> = HashMap::new();
        carrier.insert(checked.root_link.as_str(), 0);
        builder.name_body(0, checked.root_link.clone())?;
        self.attach_inertia(&mut builder, robot, &checked.root_link, 0)?;

        for &idx in &checked.joint_order {
            let joint = &robot.joints[idx];
            let parent = carrier[joint.parent.as_str()];

            let (kind, limits) = match joint.kind {
                UrdfJointKind::Fixed => (JointKind::Fixed, JointLimits::unlimited()),
                UrdfJointKind::Revolute => (
                    JointKind::revolute(joint.axis),
                    joint
                        .limit
                        .map_or_else(JointLimits::unlimited, |l| JointLimits::new(l.lower, l.upper)),
                ),
                UrdfJointKind::Continuous => (
                    JointKind::continuous(joint.axis),
                    joint
                        .limit
                        .map_or_else(JointLimits::full_turn, |l| JointLimits::new(l.lower, l.upper)),
                ),
                UrdfJointKind::Prismatic => (
                    JointKind::prismatic(joint.axis),
                    joint
                        .limit
                        .map_or_else(JointLimits::unlimited, |l| JointLimits::new(l.lower, l.upper)),
                ),
            };

            let j = builder.add_joint(
                parent,
                kind,
                joint.origin.to_se3(),
                limits,
                joint.name.clone(),
            )?;
            builder.name_body(j, joint.child.clone())?;
            self.attach_inertia(&mut builder, robot, &joint.child, j)?;
            carrier.insert(joint.child.as_str(), j);
        }

        let model = builder.finalize()?;
        tracing::debug!(
            njoints = model.njoints(),
            nq = model.nq(),
            nv = model.nv(),
            "loaded model '{}'",
            model.name()
        );
        Ok(model)
    }

    fn attach_inertia(
        &self,
        builder: &mut ModelBuilder,
        robot: &UrdfRobot,
        link_name: &str,
        joint: usize,
    ) -> Result<()> {
        let Some(link) = robot.link(link_name) else {
            return Ok(());
        };
        // Missing inertial means a massless link; nothing to attach.
        let Some(ref inertial) = link.inertial else {
            return Ok(());
        };
        let body = SpatialInertia::new(
            inertial.mass,
            Vector3::zeros(),
            inertial.inertia.to_matrix3(),
        );
        builder.append_body(joint, body, inertial.origin.to_se3())?;
        Ok(())
    }
}
