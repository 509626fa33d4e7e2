//! Recursive Newton-Euler Algorithm: inverse dynamics in O(nv).

use nalgebra::DVector;
use rdyn_spatial::Motion;
use rdyn_types::{Data, Model, QueryResult};

use crate::check::{check_nv, check_q};
use crate::kinematics::update_relative_placements;

/// Compute the joint torques required to realize accelerations `a` at
/// state `(q, v)` under the model's gravity.
///
/// Gravity enters through the root acceleration trick: the universe is
/// given the spatial acceleration `−g`, which every descendant inherits.
/// The forward pass accumulates per-joint spatial velocity and
/// acceleration in local frames; the backward pass folds body forces
/// toward the root and projects them onto each joint axis.
pub fn rnea(
    model: &Model,
    data: &mut Data,
    q: &[f64],
    v: &[f64],
    a: &[f64],
) -> QueryResult<DVector<f64>> {
    check_q(model, q)?;
    check_nv("v", model, v)?;
    check_nv("a", model, a)?;

    update_relative_placements(model, data, q);

    data.v[0] = Motion::zero();
    data.a[0] = Motion::linear(-model.gravity());

    // Forward pass: velocities, accelerations, body forces
    for j in 1..model.njoints() {
        let joint = &model.joints()[j];
        let parent = model.parents()[j];
        let limi = data.limi[j];

        let (vj, aj) = match joint.kind.motion_subspace() {
            Some(s) => (s * v[joint.idx_v], s * a[joint.idx_v]),
            None => (Motion::zero(), Motion::zero()),
        };

        data.v[j] = limi.act_inv_motion(&data.v[parent]) + vj;
        data.a[j] =
            limi.act_inv_motion(&data.a[parent]) + aj + data.v[j].cross_motion(&vj);

        let inertia = &model.links()[j].inertia;
        let momentum = inertia.mul_motion(&data.v[j]);
        data.f[j] = inertia.mul_motion(&data.a[j]) + data.v[j].cross_force(&momentum);
    }

    // The root link may carry inertia (a base attached to the universe);
    // its force is never projected but must exist for the fold below.
    let root_inertia = &model.links()[0].inertia;
    let root_momentum = root_inertia.mul_motion(&data.v[0]);
    data.f[0] =
        root_inertia.mul_motion(&data.a[0]) + data.v[0].cross_force(&root_momentum);

    // Backward pass: project onto joint axes, fold forces into parents
    for j in (1..model.njoints()).rev() {
        let joint = &model.joints()[j];
        if let Some(s) = joint.kind.motion_subspace() {
            data.tau[joint.idx_v] = s.dot(&data.f[j]);
        }
        let parent = model.parents()[j];
        data.f[parent] = data.f[parent] + data.limi[j].act_force(&data.f[j]);
    }

    Ok(data.tau.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};
    use rdyn_spatial::{SpatialInertia, SE3};
    use rdyn_types::{JointKind, JointLimits, ModelBuilder};
    use std::f64::consts::FRAC_PI_2;

    const G: f64 = 9.81;

    fn single_revolute(axis: Vector3<f64>) -> Model {
        let mut b = ModelBuilder::new("one_r");
        let j = b
            .add_joint(
                0,
                JointKind::revolute(axis),
                SE3::identity(),
                JointLimits::unlimited(),
                "pivot",
            )
            .unwrap();
        b.append_body(
            j,
            SpatialInertia::point_mass(1.0, Vector3::new(1.0, 0.0, 0.0)),
            SE3::identity(),
        )
        .unwrap();
        b.finalize().unwrap()
    }

    #[test]
    fn gravity_orthogonal_to_z_axis_needs_no_torque() {
        let model = single_revolute(Vector3::z());
        let mut data = Data::new(&model);
        let tau = rnea(&model, &mut data, &[0.0], &[0.0], &[0.0]).unwrap();
        assert_relative_eq!(tau[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn gravity_about_y_axis_gives_minus_mgl() {
        let model = single_revolute(Vector3::y());
        let mut data = Data::new(&model);
        let tau = rnea(&model, &mut data, &[0.0], &[0.0], &[0.0]).unwrap();
        // Unit mass, 1 m lever, gravity down: τ = −m·g·l
        assert_relative_eq!(tau[0], -G, epsilon = 1e-9);
    }

    #[test]
    fn pure_acceleration_matches_point_mass_inertia() {
        let model = single_revolute(Vector3::z());
        let mut data = Data::new(&model);
        let tau = rnea(&model, &mut data, &[0.0], &[0.0], &[2.0]).unwrap();
        // I = m·l² = 1 about z; τ = I·a
        assert_relative_eq!(tau[0], 2.0, epsilon = 1e-9);
    }

    /// Planar double pendulum swinging in the x-z plane, both joints about y.
    fn double_pendulum(l: f64, m: f64) -> Model {
        let rod = SpatialInertia::new(
            m,
            Vector3::new(l / 2.0, 0.0, 0.0),
            Matrix3::from_diagonal(&Vector3::new(0.0, m * l * l / 12.0, m * l * l / 12.0)),
        );
        let mut b = ModelBuilder::new("double_pendulum");
        let j1 = b
            .add_joint(
                0,
                JointKind::revolute(Vector3::y()),
                SE3::identity(),
                JointLimits::unlimited(),
                "hip",
            )
            .unwrap();
        b.append_body(j1, rod, SE3::identity()).unwrap();
        let j2 = b
            .add_joint(
                j1,
                JointKind::revolute(Vector3::y()),
                SE3::from_translation(Vector3::new(l, 0.0, 0.0)),
                JointLimits::unlimited(),
                "knee",
            )
            .unwrap();
        b.append_body(j2, rod, SE3::identity()).unwrap();
        b.finalize().unwrap()
    }

    #[test]
    fn double_pendulum_gravity_torques_at_quarter_turn() {
        // Rotating about +y by π/2 maps +x to −z: both links hang straight
        // down, no lever arm, no gravity torque at either joint.
        let (l, m) = (1.0, 1.0);
        let model = double_pendulum(l, m);
        let mut data = Data::new(&model);
        let tau = rnea(&model, &mut data, &[FRAC_PI_2, 0.0], &[0.0, 0.0], &[0.0, 0.0]).unwrap();
        assert_relative_eq!(tau[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(tau[1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn double_pendulum_gravity_torques_horizontal() {
        // At q = (0, 0) both links lie along +x: maximal gravity moments.
        // Hip carries both links: m·g·(l/2) + m·g·(3l/2); knee carries the
        // far link: m·g·(l/2). Rotation about +y tips +x toward −z, and
        // gravity pulls that way, so the torques resisting it are negative.
        let (l, m) = (1.0, 1.0);
        let model = double_pendulum(l, m);
        let mut data = Data::new(&model);
        let tau = rnea(&model, &mut data, &[0.0, 0.0], &[0.0, 0.0], &[0.0, 0.0]).unwrap();
        assert_relative_eq!(tau[0], -m * G * (l / 2.0 + 3.0 * l / 2.0), epsilon = 1e-6);
        assert_relative_eq!(tau[1], -m * G * (l / 2.0), epsilon = 1e-6);
    }

    #[test]
    fn coriolis_terms_are_velocity_quadratic() {
        let model = double_pendulum(1.0, 1.0);
        let mut data = Data::new(&model);
        let q = [0.3, 0.7];
        let tau_g = rnea(&model, &mut data, &q, &[0.0, 0.0], &[0.0, 0.0]).unwrap();
        let tau_1 = rnea(&model, &mut data, &q, &[1.0, -1.0], &[0.0, 0.0]).unwrap();
        let tau_2 = rnea(&model, &mut data, &q, &[2.0, -2.0], &[0.0, 0.0]).unwrap();
        // τ(2v) − τ_g = 4·(τ(v) − τ_g) for bias terms quadratic in velocity
        for i in 0..2 {
            assert_relative_eq!(
                tau_2[i] - tau_g[i],
                4.0 * (tau_1[i] - tau_g[i]),
                epsilon = 1e-8
            );
        }
    }

    #[test]
    fn fixed_joints_transmit_forces() {
        // A mass hanging off a fixed joint still loads the revolute above it
        let mut b = ModelBuilder::new("fixed_chain");
        let j1 = b
            .add_joint(
                0,
                JointKind::revolute(Vector3::y()),
                SE3::identity(),
                JointLimits::unlimited(),
                "pivot",
            )
            .unwrap();
        let mount = b
            .add_joint(
                j1,
                JointKind::Fixed,
                SE3::from_translation(Vector3::new(1.0, 0.0, 0.0)),
                JointLimits::unlimited(),
                "mount",
            )
            .unwrap();
        b.append_body(mount, SpatialInertia::point_mass(1.0, Vector3::zeros()), SE3::identity())
            .unwrap();
        let model = b.finalize().unwrap();
        let mut data = Data::new(&model);
        let tau = rnea(&model, &mut data, &[0.0], &[0.0], &[0.0]).unwrap();
        assert_relative_eq!(tau[0], -G, epsilon = 1e-9);
    }
}
