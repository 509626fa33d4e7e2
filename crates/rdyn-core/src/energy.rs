//! Kinetic and potential energy, and the center of mass.

use nalgebra::{Point3, Vector3};
use rdyn_spatial::Motion;
use rdyn_types::{Data, Model, QueryResult};

use crate::check::{check_nv, check_q};
use crate::kinematics::{forward_kinematics, update_relative_placements};

/// Compute the kinetic energy `½·vᵀ·M(q)·v`.
///
/// Evaluated by the O(nv) velocity recursion rather than by forming the
/// mass matrix: `KE = ½·Σ vⱼ·(Iⱼ·vⱼ)` over per-joint spatial velocities.
pub fn kinetic_energy(model: &Model, data: &mut Data, q: &[f64], v: &[f64]) -> QueryResult<f64> {
    check_q(model, q)?;
    check_nv("v", model, v)?;

    update_relative_placements(model, data, q);

    data.v[0] = Motion::zero();
    let mut energy = 0.0;
    for j in 1..model.njoints() {
        let joint = &model.joints()[j];
        let parent = model.parents()[j];
        let vj = match joint.kind.motion_subspace() {
            Some(s) => s * v[joint.idx_v],
            None => Motion::zero(),
        };
        data.v[j] = data.limi[j].act_inv_motion(&data.v[parent]) + vj;

        let inertia = &model.links()[j].inertia;
        energy += 0.5 * data.v[j].dot(&inertia.mul_motion(&data.v[j]));
    }
    Ok(energy)
}

/// Compute the gravitational potential energy.
///
/// Convention: `PE(q) = −m_total · g · c_world(q)`, summed per link as
/// `−Σ mᵢ · g·cᵢ`. With the default gravity `(0, 0, −9.81)` this grows
/// as mass rises above the world origin; the zero level is the origin.
pub fn potential_energy(model: &Model, data: &mut Data, q: &[f64]) -> QueryResult<f64> {
    check_q(model, q)?;
    forward_kinematics(model, data, q)?;

    let g = model.gravity();
    let mut pe = 0.0;
    for j in 0..model.njoints() {
        let inertia = &model.links()[j].inertia;
        if inertia.mass == 0.0 {
            continue;
        }
        let com_world = data.omi[j].act_point(&Point3::from(inertia.com));
        pe -= inertia.mass * g.dot(&com_world.coords);
    }
    Ok(pe)
}

/// Compute the world center of mass and the total mass.
///
/// A model with zero total mass reports the origin.
pub fn center_of_mass(
    model: &Model,
    data: &mut Data,
    q: &[f64],
) -> QueryResult<(Point3<f64>, f64)> {
    check_q(model, q)?;
    forward_kinematics(model, data, q)?;

    let mut weighted = Vector3::zeros();
    let mut total = 0.0;
    for j in 0..model.njoints() {
        let inertia = &model.links()[j].inertia;
        if inertia.mass == 0.0 {
            continue;
        }
        let com_world = data.omi[j].act_point(&Point3::from(inertia.com));
        weighted += inertia.mass * com_world.coords;
        total += inertia.mass;
    }

    data.total_mass = total;
    data.com = if total > 0.0 {
        weighted / total
    } else {
        Vector3::zeros()
    };
    Ok((Point3::from(data.com), total))
}
