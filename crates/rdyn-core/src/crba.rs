//! Composite Rigid-Body Algorithm: the joint-space mass matrix in O(nv²).

use nalgebra::DMatrix;
use rdyn_spatial::Force;
use rdyn_types::{Data, Model, QueryResult};

use crate::check::check_q;
use crate::kinematics::update_relative_placements;

/// Compute the joint-space mass matrix `M(q)`, returned as the full
/// symmetric nv×nv matrix.
///
/// Leaf-to-root pass: each joint's composite inertia (itself plus every
/// descendant) projects onto its own axis for the diagonal, then walks its
/// ancestor chain for the off-diagonal couplings. Symmetric positive
/// definite for any model whose every joint carries inertia.
pub fn crba(model: &Model, data: &mut Data, q: &[f64]) -> QueryResult<DMatrix<f64>> {
    check_q(model, q)?;

    update_relative_placements(model, data, q);

    for j in 0..model.njoints() {
        data.composite[j] = model.links()[j].inertia.to_matrix6();
    }
    data.mass_matrix.fill(0.0);

    for j in (1..model.njoints()).rev() {
        let joint = &model.joints()[j];

        // Composite inertia of j's subtree is complete once all children
        // (which have larger indices) have folded themselves in.
        if let Some(s) = joint.kind.motion_subspace() {
            let idx_j = joint.idx_v;
            let f = Force::from_vector6(&(data.composite[j] * s.to_vector6()));
            data.mass_matrix[(idx_j, idx_j)] = s.dot(&f);

            // Walk the ancestor chain, re-expressing the subtree force
            let mut fc = f;
            let mut i = j;
            while model.parents()[i] != 0 {
                fc = data.limi[i].act_force(&fc);
                i = model.parents()[i];
                let ancestor = &model.joints()[i];
                if let Some(si) = ancestor.kind.motion_subspace() {
                    let idx_i = ancestor.idx_v;
                    let coupling = si.dot(&fc);
                    data.mass_matrix[(idx_i, idx_j)] = coupling;
                    data.mass_matrix[(idx_j, idx_i)] = coupling;
                }
            }
        }

        let parent = model.parents()[j];
        let folded = data.limi[j].act_spatial_matrix(&data.composite[j]);
        data.composite[parent] += folded;
    }

    Ok(data.mass_matrix.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, Vector3};
    use rdyn_spatial::{SpatialInertia, SE3};
    use rdyn_types::{JointKind, JointLimits, ModelBuilder};

    #[test]
    fn point_mass_on_unit_lever() {
        let mut b = ModelBuilder::new("one_r");
        let j = b
            .add_joint(
                0,
                JointKind::revolute(Vector3::z()),
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
        let model = b.finalize().unwrap();
        let mut data = Data::new(&model);

        let m = crba(&model, &mut data, &[0.0]).unwrap();
        assert_eq!(m.nrows(), 1);
        // m·l² = 1
        assert_relative_eq!(m[(0, 0)], 1.0, epsilon = 1e-12);
    }

    fn double_pendulum() -> Model {
        let l = 1.0;
        let m = 1.0;
        let rod = SpatialInertia::new(
            m,
            Vector3::new(l / 2.0, 0.0, 0.0),
            Matrix3::from_diagonal(&Vector3::new(0.0, m * l * l / 12.0, m * l * l / 12.0)),
        );
        let mut b = ModelBuilder::new("double");
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
    fn mass_matrix_is_symmetric() {
        let model = double_pendulum();
        let mut data = Data::new(&model);
        let m = crba(&model, &mut data, &[0.4, -0.9]).unwrap();
        assert_relative_eq!(m[(0, 1)], m[(1, 0)], epsilon = 1e-12);
    }

    #[test]
    fn matches_textbook_double_pendulum() {
        // Standard result for two uniform rods of length l, mass m, at
        // relative angle q2:
        //   M11 = 2ml²/3 + ml²(3 + 2·cos q2)/... — expand directly:
        //   M11 = I1 + I2 + m(l/2)² + m(l² + (l/2)² + 2·l·(l/2)·cos q2)
        //   M12 = I2 + m((l/2)² + l·(l/2)·cos q2)
        //   M22 = I2 + m(l/2)²
        // with I = ml²/12 about each CoM.
        let model = double_pendulum();
        let mut data = Data::new(&model);
        let q2: f64 = 0.6;
        let m_mat = crba(&model, &mut data, &[0.3, q2]).unwrap();

        let (l, m, i) = (1.0, 1.0, 1.0 / 12.0);
        let m22 = i + m * (l / 2.0) * (l / 2.0);
        let m12 = i + m * ((l / 2.0) * (l / 2.0) + l * (l / 2.0) * q2.cos());
        let m11 = i + m * (l / 2.0) * (l / 2.0)
            + i
            + m * (l * l + (l / 2.0) * (l / 2.0) + 2.0 * l * (l / 2.0) * q2.cos());

        assert_relative_eq!(m_mat[(1, 1)], m22, epsilon = 1e-10);
        assert_relative_eq!(m_mat[(0, 1)], m12, epsilon = 1e-10);
        assert_relative_eq!(m_mat[(0, 0)], m11, epsilon = 1e-10);
    }

    #[test]
    fn mass_matrix_depends_only_on_shape() {
        // M(q) for a 1-DoF model is configuration independent
        let mut b = ModelBuilder::new("one");
        let j = b
            .add_joint(
                0,
                JointKind::continuous(Vector3::z()),
                SE3::identity(),
                JointLimits::unlimited(),
                "spin",
            )
            .unwrap();
        b.append_body(j, SpatialInertia::sphere(2.0, 0.3), SE3::identity())
            .unwrap();
        let model = b.finalize().unwrap();
        let mut data = Data::new(&model);

        let m0 = crba(&model, &mut data, &[1.0, 0.0]).unwrap();
        let angle = 2.2_f64;
        let m1 = crba(&model, &mut data, &[angle.cos(), angle.sin()]).unwrap();
        assert_relative_eq!(m0[(0, 0)], m1[(0, 0)], epsilon = 1e-12);
    }

    #[test]
    fn branch_joints_do_not_couple() {
        let mut b = ModelBuilder::new("branch");
        let l = b
            .add_joint(
                0,
                JointKind::revolute(Vector3::z()),
                SE3::identity(),
                JointLimits::unlimited(),
                "left",
            )
            .unwrap();
        b.append_body(l, SpatialInertia::point_mass(1.0, Vector3::x()), SE3::identity())
            .unwrap();
        let r = b
            .add_joint(
                0,
                JointKind::revolute(Vector3::z()),
                SE3::from_translation(Vector3::new(0.0, 2.0, 0.0)),
                JointLimits::unlimited(),
                "right",
            )
            .unwrap();
        b.append_body(r, SpatialInertia::point_mass(1.0, Vector3::x()), SE3::identity())
            .unwrap();
        let model = b.finalize().unwrap();
        let mut data = Data::new(&model);

        let m = crba(&model, &mut data, &[0.5, -0.5]).unwrap();
        assert_relative_eq!(m[(0, 1)], 0.0, epsilon = 1e-15);
        assert_relative_eq!(m[(1, 0)], 0.0, epsilon = 1e-15);
    }
}
