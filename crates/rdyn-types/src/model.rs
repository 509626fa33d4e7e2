//! The immutable robot model and its builder.

use nalgebra::{DVector, Vector3};
use rdyn_spatial::{SpatialInertia, SE3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::joint::{Joint, JointKind, JointLimits};
use crate::BuildResult;

/// Standard gravity magnitude (m/s²).
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Minimum acceptable joint-axis norm; shorter axes are rejected at build.
const MIN_AXIS_NORM: f64 = 1e-10;

/// A link: the rigid body carried by a joint.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    /// Link name.
    pub name: String,
    /// Spatial inertia in the link frame (coincident with the joint frame).
    pub inertia: SpatialInertia,
}

/// Immutable kinematic and inertial description of a robot.
///
/// Built once through [`ModelBuilder`], validated by
/// [`finalize`](ModelBuilder::finalize), then read-only. Joint 0 is the
/// fixed universe root; joints are stored parent-before-child.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Model {
    name: String,
    joints: Vec<Joint>,
    links: Vec<Link>,
    parents: Vec<usize>,
    limits: Vec<JointLimits>,
    lower: DVector<f64>,
    upper: DVector<f64>,
    nq: usize,
    nv: usize,
    gravity: Vector3<f64>,
}

impl Model {
    /// Model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All joints in topological order (index 0 is the universe).
    #[must_use]
    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    /// All links, parallel to [`joints`](Self::joints).
    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Parent joint index per joint (`parents[0] == 0`).
    #[must_use]
    pub fn parents(&self) -> &[usize] {
        &self.parents
    }

    /// Number of joints, universe included.
    #[must_use]
    pub fn njoints(&self) -> usize {
        self.joints.len()
    }

    /// Configuration-vector length.
    #[must_use]
    pub fn nq(&self) -> usize {
        self.nq
    }

    /// Velocity-vector length.
    #[must_use]
    pub fn nv(&self) -> usize {
        self.nv
    }

    /// Per-velocity-index lower position limits (`−∞` where unbounded).
    #[must_use]
    pub fn lower(&self) -> &DVector<f64> {
        &self.lower
    }

    /// Per-velocity-index upper position limits (`+∞` where unbounded).
    #[must_use]
    pub fn upper(&self) -> &DVector<f64> {
        &self.upper
    }

    /// Position limits of one joint.
    #[must_use]
    pub fn joint_limits(&self, j: usize) -> Option<JointLimits> {
        self.limits.get(j).copied()
    }

    /// World-frame gravity vector.
    #[must_use]
    pub fn gravity(&self) -> &Vector3<f64> {
        &self.gravity
    }

    /// A joint by index.
    #[must_use]
    pub fn joint(&self, j: usize) -> Option<&Joint> {
        self.joints.get(j)
    }

    /// Find a joint index by name.
    #[must_use]
    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joints.iter().position(|j| j.name == name)
    }

    /// Index of the last joint; the default end-effector for IK and
    /// reachability queries.
    #[must_use]
    pub fn last_joint(&self) -> usize {
        self.joints.len() - 1
    }

    /// The canonical neutral configuration: zero for scalar joints,
    /// `(1, 0)` for continuous joints.
    #[must_use]
    pub fn neutral(&self) -> DVector<f64> {
        let mut q = DVector::zeros(self.nq);
        for joint in &self.joints {
            joint
                .kind
                .write_neutral(&mut q.as_mut_slice()[joint.idx_q..joint.idx_q + joint.nq()]);
        }
        q
    }

    /// A configuration with every movable joint at the midpoint of its
    /// limits, falling back to `[−π, π]` for unbounded joints.
    #[must_use]
    pub fn midpoint_configuration(&self) -> DVector<f64> {
        let mut q = self.neutral();
        for (j, joint) in self.joints.iter().enumerate() {
            if joint.is_movable() {
                let mid = self.limits[j].midpoint_or(JointLimits::full_turn());
                joint
                    .kind
                    .position_into_slice(mid, &mut q.as_mut_slice()[joint.idx_q..joint.idx_q + joint.nq()]);
            }
        }
        q
    }

    /// Names of movable joints, ordered by velocity index.
    #[must_use]
    pub fn movable_joint_names(&self) -> Vec<String> {
        self.joints
            .iter()
            .filter(|j| j.is_movable())
            .map(|j| j.name.clone())
            .collect()
    }
}

/// Builder for a [`Model`]: the model while still unfrozen.
///
/// Joints are added parent-first; `finalize` assigns configuration and
/// velocity offsets and runs the structural validation.
#[derive(Debug, Clone)]
pub struct ModelBuilder {
    name: String,
    joints: Vec<BuilderJoint>,
    gravity: Vector3<f64>,
}

#[derive(Debug, Clone)]
struct BuilderJoint {
    name: String,
    parent: usize,
    kind: JointKind,
    placement: SE3,
    limits: JointLimits,
    link_name: String,
    inertia: SpatialInertia,
}

impl ModelBuilder {
    /// Start an empty model containing only the universe root joint.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            joints: vec![BuilderJoint {
                name: "universe".into(),
                parent: 0,
                kind: JointKind::Fixed,
                placement: SE3::identity(),
                limits: JointLimits::unlimited(),
                link_name: "universe".into(),
                inertia: SpatialInertia::zero(),
            }],
            gravity: Vector3::new(0.0, 0.0, -STANDARD_GRAVITY),
        }
    }

    /// Override the gravity vector (default `(0, 0, −9.81)`).
    #[must_use]
    pub fn with_gravity(mut self, gravity: Vector3<f64>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Add a joint under `parent`, returning the new joint's index.
    ///
    /// The axis (for non-fixed kinds) is unit-normalized; axes shorter
    /// than `1e-10` are rejected. `parent` must already exist, which keeps
    /// joints in topological order by construction.
    pub fn add_joint(
        &mut self,
        parent: usize,
        kind: JointKind,
        placement: SE3,
        limits: JointLimits,
        name: impl Into<String>,
    ) -> BuildResult<usize> {
        let name = name.into();
        if parent >= self.joints.len() {
            return Err(ModelError::InvalidParent {
                parent,
                njoints: self.joints.len(),
            });
        }
        if self.joints.iter().any(|j| j.name == name) {
            return Err(ModelError::DuplicateJointName(name));
        }
        if limits.lower > limits.upper || limits.lower.is_nan() || limits.upper.is_nan() {
            return Err(ModelError::InvalidLimits {
                joint: name,
                lower: limits.lower,
                upper: limits.upper,
            });
        }

        let kind = match kind {
            JointKind::Fixed => JointKind::Fixed,
            JointKind::Revolute { axis } => JointKind::revolute(unit_axis(&name, axis)?),
            JointKind::Continuous { axis } => JointKind::continuous(unit_axis(&name, axis)?),
            JointKind::Prismatic { axis } => JointKind::prismatic(unit_axis(&name, axis)?),
        };

        let j = self.joints.len();
        let link_name = format!("{name}_link");
        self.joints.push(BuilderJoint {
            name,
            parent,
            kind,
            placement,
            limits,
            link_name,
            inertia: SpatialInertia::zero(),
        });
        Ok(j)
    }

    /// Attach body inertia to joint `j`, expressed at `placement` relative
    /// to the joint frame. Repeated calls accumulate.
    pub fn append_body(
        &mut self,
        j: usize,
        inertia: SpatialInertia,
        placement: SE3,
    ) -> BuildResult<()> {
        let njoints = self.joints.len();
        let slot = self
            .joints
            .get_mut(j)
            .ok_or(ModelError::UnknownJoint { index: j, njoints })?;
        slot.inertia = slot.inertia + inertia.transform(&placement);
        Ok(())
    }

    /// Name the link carried by joint `j` (defaults to `<joint>_link`).
    pub fn name_body(&mut self, j: usize, name: impl Into<String>) -> BuildResult<()> {
        let njoints = self.joints.len();
        let slot = self
            .joints
            .get_mut(j)
            .ok_or(ModelError::UnknownJoint { index: j, njoints })?;
        slot.link_name = name.into();
        Ok(())
    }

    /// Validate, assign offsets, and freeze into an immutable [`Model`].
    pub fn finalize(self) -> BuildResult<Model> {
        let mut joints = Vec::with_capacity(self.joints.len());
        let mut links = Vec::with_capacity(self.joints.len());
        let mut parents = Vec::with_capacity(self.joints.len());
        let mut limits = Vec::with_capacity(self.joints.len());
        let mut nq = 0;
        let mut nv = 0;

        for bj in &self.joints {
            if !bj.inertia.is_finite() || !bj.inertia.is_physical() {
                return Err(ModelError::UnphysicalInertia {
                    link: bj.link_name.clone(),
                    reason: "mass must be finite and non-negative, tensor symmetric positive semidefinite"
                        .into(),
                });
            }

            joints.push(Joint {
                name: bj.name.clone(),
                parent: bj.parent,
                kind: bj.kind.clone(),
                placement: bj.placement,
                idx_q: nq,
                idx_v: nv,
            });
            links.push(Link {
                name: bj.link_name.clone(),
                inertia: bj.inertia,
            });
            parents.push(bj.parent);
            limits.push(bj.limits);
            nq += bj.kind.nq();
            nv += bj.kind.nv();
        }

        let mut lower = DVector::from_element(nv, f64::NEG_INFINITY);
        let mut upper = DVector::from_element(nv, f64::INFINITY);
        for (joint, lim) in joints.iter().zip(&limits) {
            if joint.is_movable() {
                lower[joint.idx_v] = lim.lower;
                upper[joint.idx_v] = lim.upper;
            }
        }

        Ok(Model {
            name: self.name,
            joints,
            links,
            parents,
            limits,
            lower,
            upper,
            nq,
            nv,
            gravity: self.gravity,
        })
    }
}

fn unit_axis(joint: &str, axis: Vector3<f64>) -> BuildResult<Vector3<f64>> {
    let norm = axis.norm();
    if norm < MIN_AXIS_NORM {
        return Err(ModelError::InvalidAxis {
            joint: joint.into(),
            norm,
        });
    }
    Ok(axis / norm)
}
