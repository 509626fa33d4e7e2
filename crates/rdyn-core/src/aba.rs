//! Articulated-Body Algorithm: forward dynamics in O(nv).

use nalgebra::DVector;
use rdyn_spatial::{Force, Motion};
use rdyn_types::{Data, KernelError, Model, QueryResult};

use crate::check::{check_nv, check_q};
use crate::kinematics::update_relative_placements;

/// Compute joint accelerations from state `(q, v)` and applied torques.
///
/// Three sweeps over the tree:
///
/// 1. forward — joint velocities and bias terms
/// 2. backward — articulated inertias `Yᴬ`, bias forces `pᴬ`, and the
///    per-joint scalars `U = Yᴬ·S`, `D = Sᵀ·U`, `u = τ − Sᵀ·pᴬ`
/// 3. forward — accelerations `q̈ = (u − Uᵀ·a_parent) / D`
///
/// Fails with [`KernelError::SingularArticulatedInertia`] when any `D`
/// falls to machine epsilon; retrying at a different configuration may
/// succeed.
pub fn aba(
    model: &Model,
    data: &mut Data,
    q: &[f64],
    v: &[f64],
    tau: &[f64],
) -> QueryResult<DVector<f64>> {
    check_q(model, q)?;
    check_nv("v", model, v)?;
    check_nv("tau", model, tau)?;

    update_relative_placements(model, data, q);

    data.v[0] = Motion::zero();

    // Pass 1: velocities, bias motions, rigid-body inertias, bias forces
    for j in 1..model.njoints() {
        let joint = &model.joints()[j];
        let parent = model.parents()[j];

        let vj = match joint.kind.motion_subspace() {
            Some(s) => s * v[joint.idx_v],
            None => Motion::zero(),
        };
        data.v[j] = data.limi[j].act_inv_motion(&data.v[parent]) + vj;
        data.bias[j] = data.v[j].cross_motion(&vj);

        let inertia = &model.links()[j].inertia;
        data.ya[j] = inertia.to_matrix6();
        data.pa[j] = data.v[j].cross_force(&inertia.mul_motion(&data.v[j]));
    }

    // Pass 2: fold articulated inertias toward the root
    for j in (1..model.njoints()).rev() {
        let joint = &model.joints()[j];
        let parent = model.parents()[j];

        match joint.kind.motion_subspace() {
            Some(s) => {
                let s6 = s.to_vector6();
                let u6 = data.ya[j] * s6;
                let d = s6.dot(&u6);
                if d <= f64::EPSILON {
                    return Err(KernelError::SingularArticulatedInertia { joint: j });
                }
                let u_bias = tau[joint.idx_v] - s.dot(&data.pa[j]);

                data.u_aba[j] = Force::from_vector6(&u6);
                data.d_aba[joint.idx_v] = d;
                data.tau_bias[joint.idx_v] = u_bias;

                // Reduced quantities seen by the parent
                let ya_r = data.ya[j] - (u6 * u6.transpose()) / d;
                let pa_r = data.pa[j]
                    + Force::from_vector6(&(ya_r * data.bias[j].to_vector6()))
                    + data.u_aba[j] * (u_bias / d);

                data.ya[parent] += data.limi[j].act_spatial_matrix(&ya_r);
                data.pa[parent] = data.pa[parent] + data.limi[j].act_force(&pa_r);
            }
            None => {
                // Fixed joint: the child's articulated body rigidly joins
                // the parent (its bias motion is zero).
                let ya = data.ya[j];
                let pa = data.pa[j];
                data.ya[parent] += data.limi[j].act_spatial_matrix(&ya);
                data.pa[parent] = data.pa[parent] + data.limi[j].act_force(&pa);
            }
        }
    }

    // Pass 3: accelerations, root seeded with -gravity
    data.a[0] = Motion::linear(-model.gravity());
    for j in 1..model.njoints() {
        let joint = &model.joints()[j];
        let parent = model.parents()[j];
        let a_free = data.limi[j].act_inv_motion(&data.a[parent]) + data.bias[j];

        match joint.kind.motion_subspace() {
            Some(s) => {
                let idx = joint.idx_v;
                let qdd =
                    (data.tau_bias[idx] - a_free.dot(&data.u_aba[j])) / data.d_aba[idx];
                data.qdd[idx] = qdd;
                data.a[j] = a_free + s * qdd;
            }
            None => data.a[j] = a_free,
        }
    }

    Ok(data.qdd.clone())
}
