//! Per-query scratch state for the dynamics kernel.

use nalgebra::{DMatrix, DVector, Matrix6, Vector3};
use rdyn_spatial::{Force, Motion, SE3};

use crate::model::Model;

/// Mutable scratch buffers for kernel queries against one [`Model`].
///
/// Every buffer is preallocated here so steady-state kernel calls do not
/// touch the heap. All contents are overwritten by each call; nothing in
/// a `Data` is meaningful across calls except as the output of the most
/// recent one. Create one `Data` per worker thread — it is never shared
/// mutably.
#[derive(Debug, Clone)]
pub struct Data {
    /// World placement of each joint frame (filled by forward kinematics).
    pub omi: Vec<SE3>,
    /// Placement of each joint frame relative to its parent joint frame.
    pub limi: Vec<SE3>,
    /// Spatial velocity of each joint, in the local joint frame.
    pub v: Vec<Motion>,
    /// Spatial acceleration of each joint, in the local joint frame.
    pub a: Vec<Motion>,
    /// Spatial force at each joint (RNEA backward pass).
    pub f: Vec<Force>,
    /// Velocity-bias term per joint (ABA).
    pub bias: Vec<Motion>,
    /// Articulated-body inertia per joint (ABA).
    pub ya: Vec<Matrix6<f64>>,
    /// Articulated bias force per joint (ABA).
    pub pa: Vec<Force>,
    /// `U = Yᴬ·S` per joint (ABA).
    pub u_aba: Vec<Force>,
    /// `D = Sᵀ·Yᴬ·S` per velocity index (ABA).
    pub d_aba: DVector<f64>,
    /// `u = τ − Sᵀ·pᴬ` per velocity index (ABA).
    pub tau_bias: DVector<f64>,
    /// Joint torques (RNEA output).
    pub tau: DVector<f64>,
    /// Joint accelerations (ABA output).
    pub qdd: DVector<f64>,
    /// Joint-space mass matrix (CRBA output).
    pub mass_matrix: DMatrix<f64>,
    /// Composite rigid-body inertia per joint (CRBA).
    pub composite: Vec<Matrix6<f64>>,
    /// Jacobian scratch, 6×nv, rows \[linear; angular\].
    pub jacobian: DMatrix<f64>,
    /// World center of mass (energy/CoM queries).
    pub com: Vector3<f64>,
    /// Total model mass.
    pub total_mass: f64,
}

impl Data {
    /// Preallocate all scratch for `model`.
    #[must_use]
    pub fn new(model: &Model) -> Self {
        let nj = model.njoints();
        let nv = model.nv();
        Self {
            omi: vec![SE3::identity(); nj],
            limi: vec![SE3::identity(); nj],
            v: vec![Motion::zero(); nj],
            a: vec![Motion::zero(); nj],
            f: vec![Force::zero(); nj],
            bias: vec![Motion::zero(); nj],
            ya: vec![Matrix6::zeros(); nj],
            pa: vec![Force::zero(); nj],
            u_aba: vec![Force::zero(); nj],
            d_aba: DVector::zeros(nv),
            tau_bias: DVector::zeros(nv),
            tau: DVector::zeros(nv),
            qdd: DVector::zeros(nv),
            mass_matrix: DMatrix::zeros(nv, nv),
            composite: vec![Matrix6::zeros(); nj],
            jacobian: DMatrix::zeros(6, nv),
            com: Vector3::zeros(),
            total_mass: 0.0,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::joint::{JointKind, JointLimits};
    use crate::model::ModelBuilder;
    use rdyn_spatial::SpatialInertia;

    #[test]
    fn buffers_sized_from_model() {
        let mut b = ModelBuilder::new("sizes");
        let j = b
            .add_joint(
                0,
                JointKind::continuous(Vector3::z()),
                SE3::identity(),
                JointLimits::unlimited(),
                "spin",
            )
            .unwrap();
        b.append_body(j, SpatialInertia::sphere(1.0, 0.1), SE3::identity())
            .unwrap();
        let model = b.finalize().unwrap();
        let data = Data::new(&model);

        assert_eq!(data.omi.len(), model.njoints());
        assert_eq!(data.tau.len(), model.nv());
        assert_eq!(data.mass_matrix.nrows(), model.nv());
        assert_eq!(data.jacobian.ncols(), model.nv());
    }
}
