//! Forward kinematics and joint Jacobians.

use nalgebra::DMatrix;
use rdyn_spatial::{Motion, SE3};
use rdyn_types::{Data, Model, QueryResult};

use crate::check::{check_joint, check_q};

/// Reference frame for a joint Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceFrame {
    /// Twist referenced at the world origin, world axes.
    World,
    /// Twist at the joint origin, joint axes.
    Local,
    /// Twist at the joint origin, world axes.
    LocalWorldAligned,
}

/// Update every joint's relative placement `liMi` from `q`.
///
/// Shared forward pass: `liMi_j = placement_j · jMi_j(q_j)`.
pub(crate) fn update_relative_placements(model: &Model, data: &mut Data, q: &[f64]) {
    data.limi[0] = SE3::identity();
    for (j, joint) in model.joints().iter().enumerate().skip(1) {
        let jmi = joint.kind.joint_transform(&q[joint.idx_q..joint.idx_q + joint.nq()]);
        data.limi[j] = joint.placement.compose(&jmi);
    }
}

/// Run forward kinematics: fill `Data` with every joint's world placement.
///
/// Walks the tree root→leaf: `oMi_j = oMi_parent · placement_j · jMi_j(q)`.
/// Continuous-joint `(cos, sin)` slots are renormalized on entry.
pub fn forward_kinematics(model: &Model, data: &mut Data, q: &[f64]) -> QueryResult<()> {
    check_q(model, q)?;

    update_relative_placements(model, data, q);
    data.omi[0] = SE3::identity();
    for j in 1..model.njoints() {
        let parent = model.parents()[j];
        data.omi[j] = data.omi[parent].compose(&data.limi[j]);
    }
    Ok(())
}

/// Read a joint's world placement from `Data`.
///
/// Valid only after [`forward_kinematics`] ran on the configuration of
/// interest; this function does not recompute anything.
pub fn joint_placement(model: &Model, data: &Data, j: usize) -> QueryResult<SE3> {
    check_joint(model, j)?;
    Ok(data.omi[j])
}

/// Compute the 6×nv Jacobian of joint `j` in the requested frame.
///
/// Rows 0–2 are the linear part, rows 3–5 the angular part. Columns for
/// joints not on the root→`j` path are zero. `LocalWorldAligned` keeps
/// world axes but references the twist at the joint origin.
pub fn joint_jacobian(
    model: &Model,
    data: &mut Data,
    q: &[f64],
    j: usize,
    frame: ReferenceFrame,
) -> QueryResult<DMatrix<f64>> {
    check_joint(model, j)?;
    forward_kinematics(model, data, q)?;

    data.jacobian.fill(0.0);
    let p_j = data.omi[j].translation;

    let mut i = j;
    while i != 0 {
        let joint = &model.joints()[i];
        if let Some(s) = joint.kind.motion_subspace() {
            // Twist of this joint's unit velocity, referenced at the world origin
            let world = data.omi[i].act_motion(&s);
            let col = match frame {
                ReferenceFrame::World => world,
                ReferenceFrame::Local => data.omi[j].act_inv_motion(&world),
                ReferenceFrame::LocalWorldAligned => Motion {
                    linear: world.linear + world.angular.cross(&p_j),
                    angular: world.angular,
                },
            };
            data.jacobian
                .column_mut(joint.idx_v)
                .copy_from(&col.to_vector6());
        }
        i = model.parents()[i];
    }

    Ok(data.jacobian.clone())
}
