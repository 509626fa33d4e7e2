//! End-to-end: IK, workspace sampling, hull extraction, and torque
//! sweeps on one URDF-loaded arm.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use approx::assert_relative_eq;
use nalgebra::Point3;
use rdyn_core::forward_kinematics;
use rdyn_hull::convex_hull;
use rdyn_ik::{solve_ik, IkOptions};
use rdyn_reach::{sample_workspace, ReachOptions};
use rdyn_torque::{max_torques, TorqueOptions};
use rdyn_types::Data;
use rdyn_urdf::UrdfLoader;

/// Planar 2R arm with 0.5 m links and a fixed flange at the tip.
const ARM_2R: &str = r#"
    <robot name="arm_2r">
        <link name="base"/>
        <link name="upper">
            <inertial>
                <origin xyz="0.25 0 0"/>
                <mass value="1.0"/>
                <inertia ixx="0.001" iyy="0.02" izz="0.02"/>
            </inertial>
        </link>
        <link name="fore">
            <inertial>
                <origin xyz="0.25 0 0"/>
                <mass value="1.0"/>
                <inertia ixx="0.001" iyy="0.02" izz="0.02"/>
            </inertial>
        </link>
        <link name="flange"/>
        <joint name="shoulder" type="revolute">
            <parent link="base"/>
            <child link="upper"/>
            <axis xyz="0 0 1"/>
            <limit lower="-3.0" upper="3.0"/>
        </joint>
        <joint name="elbow" type="revolute">
            <parent link="upper"/>
            <child link="fore"/>
            <origin xyz="0.5 0 0"/>
            <axis xyz="0 0 1"/>
            <limit lower="-3.0" upper="3.0"/>
        </joint>
        <joint name="wrist" type="fixed">
            <parent link="fore"/>
            <child link="flange"/>
            <origin xyz="0.5 0 0"/>
        </joint>
    </robot>
"#;

#[test]
fn ik_reaches_full_extension_from_urdf() {
    let model = UrdfLoader::new().load_str(ARM_2R).unwrap();
    let mut data = Data::new(&model);

    let result = solve_ik(
        &model,
        &mut data,
        &Point3::new(1.0, 0.0, 0.0),
        &[0.1, -0.1],
        &IkOptions::default(),
    )
    .unwrap();

    assert!(result.converged);
    assert!(result.error < 1e-4);
    assert!(result.iters <= 30);
}

#[test]
fn ik_fails_finite_beyond_reach() {
    let model = UrdfLoader::new().load_str(ARM_2R).unwrap();
    let mut data = Data::new(&model);

    let result = solve_ik(
        &model,
        &mut data,
        &Point3::new(10.0, 0.0, 0.0),
        &[0.0, 0.0],
        &IkOptions::default().with_max_iter(50),
    )
    .unwrap();

    assert!(!result.converged);
    assert!(result.q.iter().all(|x| x.is_finite()));
    assert!(result.error.is_finite());
}

#[test]
fn workspace_cloud_feeds_the_hull() {
    let model = UrdfLoader::new().load_str(ARM_2R).unwrap();
    let mut data = Data::new(&model);

    let reach = sample_workspace(
        &model,
        &mut data,
        &ReachOptions::default().with_num_rays(32),
        None,
        None,
    )
    .unwrap();
    assert!(reach.success_rate > 0.5, "rate {}", reach.success_rate);

    // Rest position must be inside the sampled box
    forward_kinematics(&model, &mut data, model.midpoint_configuration().as_slice()).unwrap();
    let rest = Point3::from(data.omi[model.last_joint()].translation);
    assert!(reach.bbox.contains(&rest));

    // Boundary cloud of a planar arm is flat: the hull falls back to its
    // bounding box rather than erroring
    let hull = convex_hull(&reach.points);
    assert!(!hull.triangles.is_empty());
    for tri in &hull.triangles {
        for &idx in tri {
            assert!((idx as usize) < hull.vertices.len());
        }
    }
}

#[test]
fn torque_report_is_dominated_and_named() {
    let model = UrdfLoader::new().load_str(ARM_2R).unwrap();
    let mut data = Data::new(&model);

    let q = [0.5, -0.5];
    let v = [0.1, 0.1];
    let a = [0.0, 0.0];
    let report = max_torques(&model, &mut data, &q, &v, &a, &TorqueOptions::default()).unwrap();

    assert_eq!(report.joint_names, vec!["shoulder", "elbow"]);
    for i in 0..model.nv() {
        assert!(report.max[i] >= report.current[i].abs());
    }
    assert_eq!(report.at.len(), model.nq());
}

#[test]
fn torque_reports_reproduce_across_identical_seeds() {
    let model = UrdfLoader::new().load_str(ARM_2R).unwrap();
    let mut data = Data::new(&model);

    let q = [0.2, 0.4];
    let zeros = [0.0, 0.0];
    let r1 = max_torques(
        &model,
        &mut data,
        &q,
        &zeros,
        &zeros,
        &TorqueOptions::default().with_seed(42),
    )
    .unwrap();
    let r2 = max_torques(
        &model,
        &mut data,
        &q,
        &zeros,
        &zeros,
        &TorqueOptions::default().with_seed(42),
    )
    .unwrap();

    assert_relative_eq!(r1.max, r2.max, epsilon = 0.0);
    assert_relative_eq!(r1.current, r2.current, epsilon = 0.0);
}
