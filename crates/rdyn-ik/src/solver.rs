//! The damped-least-squares position IK loop.

use nalgebra::{DVector, Point3, Vector3};
use rdyn_core::linalg::damped_solve;
use rdyn_core::{forward_kinematics, joint_jacobian, ReferenceFrame};
use rdyn_types::{Data, JointLimits, KernelError, Model, QueryResult};

/// Options for [`solve_ik`].
#[derive(Debug, Clone)]
pub struct IkOptions {
    /// Convergence threshold on the Cartesian error norm (m).
    pub tol: f64,
    /// Maximum number of DLS iterations.
    pub max_iter: usize,
    /// Damping factor λ of the normal matrix.
    pub damping: f64,
    /// Step scale applied to each `Δq`.
    pub step: f64,
    /// End-effector joint; `None` selects the model's last joint.
    pub ee_joint: Option<usize>,
    /// Clamp each movable joint to its position limits after every step.
    /// Off by default: the unclamped behavior matches the damped update
    /// exactly, and callers that need feasible configurations opt in.
    pub clamp_to_limits: bool,
}

impl Default for IkOptions {
    fn default() -> Self {
        Self {
            tol: 1e-4,
            max_iter: 200,
            damping: 1e-6,
            step: 0.5,
            ee_joint: None,
            clamp_to_limits: false,
        }
    }
}

impl IkOptions {
    /// Set the iteration cap (builder style).
    #[must_use]
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the end-effector joint (builder style).
    #[must_use]
    pub fn with_ee_joint(mut self, j: usize) -> Self {
        self.ee_joint = Some(j);
        self
    }

    /// Enable joint-limit clamping (builder style).
    #[must_use]
    pub fn with_limit_clamping(mut self) -> Self {
        self.clamp_to_limits = true;
        self
    }
}

/// Outcome of an IK solve.
#[derive(Debug, Clone)]
pub struct IkResult {
    /// Final configuration (length nq, always finite).
    pub q: DVector<f64>,
    /// Whether the error norm fell under `tol`.
    pub converged: bool,
    /// Last measured Cartesian error norm; `+∞` only if the loop broke
    /// before any evaluation.
    pub error: f64,
    /// Iterations executed.
    pub iters: usize,
}

/// Solve position-only IK toward `target` starting from `q0`.
///
/// Each iteration runs forward kinematics, measures the end-effector
/// translation error, and applies a damped least-squares step on the
/// `LocalWorldAligned` translational Jacobian. The configuration update is
/// per-DoF: scalar joints move by `−step·Δq`, continuous joints update
/// their angle and re-store a unit `(cos, sin)` pair.
///
/// Joint limits are ignored unless [`IkOptions::clamp_to_limits`] is set.
pub fn solve_ik(
    model: &Model,
    data: &mut Data,
    target: &Point3<f64>,
    q0: &[f64],
    options: &IkOptions,
) -> QueryResult<IkResult> {
    let ee = options.ee_joint.unwrap_or_else(|| model.last_joint());
    check_inputs(model, target, q0, ee)?;

    let mut q = DVector::from_column_slice(q0);
    let mut error = f64::INFINITY;
    let mut converged = false;
    let mut iters = 0;

    for iter in 0..options.max_iter {
        iters = iter + 1;
        forward_kinematics(model, data, q.as_slice())?;
        let p = data.omi[ee].translation;
        let err: Vector3<f64> = p - target.coords;
        error = err.norm();

        if error < options.tol {
            converged = true;
            break;
        }

        let jac = joint_jacobian(
            model,
            data,
            q.as_slice(),
            ee,
            ReferenceFrame::LocalWorldAligned,
        )?;
        let j_t = jac.rows(0, 3).into_owned();

        // A = J_t·J_tᵀ + λ²·I, inverted in closed form (3×3 cofactors)
        let Some(dq) = damped_solve(&j_t, &err, options.damping) else {
            tracing::debug!(iter, "damped normal matrix singular; giving up");
            break;
        };
        if dq.iter().any(|x| !x.is_finite()) {
            tracing::debug!(iter, "non-finite step; giving up");
            break;
        }

        apply_step(model, &mut q, &dq, options);
    }

    Ok(IkResult {
        q,
        converged,
        error,
        iters,
    })
}

fn check_inputs(
    model: &Model,
    target: &Point3<f64>,
    q0: &[f64],
    ee: usize,
) -> QueryResult<()> {
    if q0.len() != model.nq() {
        return Err(KernelError::dimension("q0", model.nq(), q0.len()));
    }
    if let Some(i) = q0.iter().position(|x| !x.is_finite()) {
        return Err(KernelError::invalid_input(format!("q0[{i}] is not finite")));
    }
    if !target.coords.iter().all(|x| x.is_finite()) {
        return Err(KernelError::invalid_input("target is not finite"));
    }
    if ee >= model.njoints() {
        return Err(KernelError::InvalidJoint { index: ee });
    }
    Ok(())
}

/// Apply `q ← q − step·Δq` per movable joint, renormalizing continuous
/// slots and optionally clamping to limits.
fn apply_step(model: &Model, q: &mut DVector<f64>, dq: &DVector<f64>, options: &IkOptions) {
    for (j, joint) in model.joints().iter().enumerate() {
        if !joint.is_movable() {
            continue;
        }
        let slice = &mut q.as_mut_slice()[joint.idx_q..joint.idx_q + joint.nq()];
        let mut position = joint.kind.position_from_slice(slice) - options.step * dq[joint.idx_v];
        if options.clamp_to_limits {
            if let Some(limits) = model.joint_limits(j) {
                let effective = if limits.is_bounded() {
                    limits
                } else {
                    JointLimits::full_turn()
                };
                position = effective.clamp(position);
            }
        }
        joint.kind.position_into_slice(position, slice);
    }
}
