//! Structural validation of parsed URDF.
//!
//! Checks the link/joint graph is a tree with a single root and physical
//! mass properties before any model is built.

use std::collections::{HashMap, HashSet};

use nalgebra::Vector3;
use rdyn_spatial::SpatialInertia;

use crate::error::{Result, UrdfError};
use crate::types::UrdfRobot;

/// Outcome of validation: the root link and a tree-ordered joint sequence.
#[derive(Debug)]
pub struct ValidationResult {
    /// The unique link with no parent joint.
    pub root_link: String,
    /// Indices into `robot.joints`, ordered parent-before-child.
    pub joint_order: Vec<usize>,
}

/// Validate a parsed robot.
///
/// Checks:
/// - no duplicate link or joint names
/// - every joint references declared links
/// - exactly one root link
/// - no kinematic loops (each link has one parent; the graph is a tree)
/// - declared masses and inertias are physical
pub fn validate(robot: &UrdfRobot) -> Result<ValidationResult> {
    check_duplicates(robot)?;

    let link_names: HashSet<&str> = robot.links.iter().map(|l| l.name.as_str()).collect();

    // child link -> joint index, and parent link -> child joint indices
    let mut parent_joint: HashMap<&str, usize> = HashMap::new();
    let mut child_joints: HashMap<&str, Vec<usize>> = HashMap::new();

    for (idx, joint) in robot.joints.iter().enumerate() {
        if !link_names.contains(joint.parent.as_str()) {
            return Err(UrdfError::DanglingLink {
                link: joint.parent.clone(),
                joint: joint.name.clone(),
            });
        }
        if !link_names.contains(joint.child.as_str()) {
            return Err(UrdfError::DanglingLink {
                link: joint.child.clone(),
                joint: joint.name.clone(),
            });
        }
        if parent_joint.insert(joint.child.as_str(), idx).is_some() {
            return Err(UrdfError::CyclicModel(format!(
                "link '{}' has multiple parent joints",
                joint.child
            )));
        }
        child_joints.entry(joint.parent.as_str()).or_default().push(idx);
    }

    let roots: Vec<&str> = robot
        .links
        .iter()
        .map(|l| l.name.as_str())
        .filter(|name| !parent_joint.contains_key(name))
        .collect();

    let root_link = match roots.as_slice() {
        [] => return Err(UrdfError::NoRoot),
        [single] => (*single).to_string(),
        many => {
            return Err(UrdfError::MultipleRoots(
                many.iter().map(|s| (*s).to_string()).collect(),
            ))
        }
    };

    let joint_order = tree_order(robot, &root_link, &child_joints)?;

    // A connected tree rooted at root_link reaches every joint exactly once;
    // anything unreached sits on a cycle detached from the root.
    if joint_order.len() != robot.joints.len() {
        return Err(UrdfError::CyclicModel(
            "some joints are unreachable from the root link".into(),
        ));
    }

    check_mass_properties(robot)?;

    Ok(ValidationResult {
        root_link,
        joint_order,
    })
}

fn check_duplicates(robot: &UrdfRobot) -> Result<()> {
    let mut seen = HashSet::new();
    for link in &robot.links {
        if !seen.insert(link.name.as_str()) {
            return Err(UrdfError::DuplicateName {
                kind: "link",
                name: link.name.clone(),
            });
        }
    }

    let mut seen = HashSet::new();
    for joint in &robot.joints {
        if !seen.insert(joint.name.as_str()) {
            return Err(UrdfError::DuplicateName {
                kind: "joint",
                name: joint.name.clone(),
            });
        }
    }

    Ok(())
}

/// Depth-first traversal from the root, emitting joints parent-first.
fn tree_order(
    robot: &UrdfRobot,
    root: &str,
    child_joints: &HashMap<&str, Vec<usize>>,
) -> Result<Vec<usize>> {
    let mut order = Vec::with_capacity(robot.joints.len());
    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack = vec![root];

    while let Some(link) = stack.pop() {
        if !visited.insert(link) {
            return Err(UrdfError::CyclicModel(format!(
                "cycle detected at link '{link}'"
            )));
        }
        if let Some(joints) = child_joints.get(link) {
            // A joint is emitted when its parent link pops, and that link was
            // pushed only after the joint above it was emitted, so the order
            // is parent-first.
            for &idx in joints {
                order.push(idx);
                stack.push(robot.joints[idx].child.as_str());
            }
        }
    }

    Ok(order)
}

fn check_mass_properties(robot: &UrdfRobot) -> Result<()> {
    for link in &robot.links {
        let Some(ref inertial) = link.inertial else {
            continue;
        };
        if inertial.mass < 0.0 || !inertial.mass.is_finite() {
            return Err(UrdfError::InvalidMass {
                link: link.name.clone(),
                mass: inertial.mass,
            });
        }
        let i = &inertial.inertia;
        let all = [i.ixx, i.ixy, i.ixz, i.iyy, i.iyz, i.izz];
        if all.iter().any(|x| !x.is_finite()) {
            return Err(UrdfError::InvalidInertia {
                link: link.name.clone(),
                reason: "tensor entries must be finite".into(),
            });
        }
        // One PSD test shared with model finalization
        let body = SpatialInertia::new(inertial.mass, Vector3::zeros(), i.to_matrix3());
        if !body.is_physical() {
            return Err(UrdfError::InvalidInertia {
                link: link.name.clone(),
                reason: "tensor must be positive semidefinite".into(),
            });
        }
    }
    Ok(())
}
