//! Per-ray boundary search over the reachable workspace.

use std::sync::atomic::{AtomicBool, Ordering};

use nalgebra::{Point3, Vector3};
use rdyn_core::forward_kinematics;
use rdyn_ik::{solve_ik, IkOptions};
use rdyn_types::{Data, JointLimits, Model, QueryResult};
use tracing::debug;

use crate::rays::fibonacci_directions;

/// Options for [`sample_workspace`].
#[derive(Debug, Clone)]
pub struct ReachOptions {
    /// Number of Fibonacci rays to cast.
    pub num_rays: usize,
    /// Bisection termination width (m).
    pub epsilon: f64,
    /// Iteration cap for each inner IK solve.
    pub max_ik_iter: usize,
}

impl Default for ReachOptions {
    fn default() -> Self {
        Self {
            num_rays: 500,
            epsilon: 1e-3,
            max_ik_iter: 100,
        }
    }
}

impl ReachOptions {
    /// Set the ray count (builder style).
    #[must_use]
    pub fn with_num_rays(mut self, n: usize) -> Self {
        self.num_rays = n;
        self
    }
}

/// Axis-aligned bounding box of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// The box around a set of points; a degenerate box at the origin
    /// when the set is empty.
    #[must_use]
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let Some(first) = points.first() else {
            return Self {
                min: Point3::origin(),
                max: Point3::origin(),
            };
        };
        let mut min = *first;
        let mut max = *first;
        for p in points {
            for k in 0..3 {
                min[k] = min[k].min(p[k]);
                max[k] = max[k].max(p[k]);
            }
        }
        Self { min, max }
    }

    /// Whether the point lies inside (or on) the box.
    #[must_use]
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|k| p[k] >= self.min[k] && p[k] <= self.max[k])
    }

    /// Grow to include a point.
    pub fn insert(&mut self, p: &Point3<f64>) {
        for k in 0..3 {
            self.min[k] = self.min[k].min(p[k]);
            self.max[k] = self.max[k].max(p[k]);
        }
    }
}

/// Result of a workspace sampling run.
#[derive(Debug, Clone)]
pub struct ReachResult {
    /// Reachable boundary points, one per successful ray.
    pub points: Vec<Point3<f64>>,
    /// Axis-aligned bounding box of the boundary cloud (around the ray
    /// origin when no ray succeeded).
    pub bbox: Aabb,
    /// Successful rays over rays attempted.
    pub success_rate: f64,
    /// Whether the run stopped early on the cancellation flag.
    pub cancelled: bool,
}

/// Sample the reachable workspace boundary of the model's last joint.
///
/// From the mid-limits configuration, casts [`ReachOptions::num_rays`]
/// Fibonacci directions out of the end-effector's rest position and
/// binary-searches each for the reachability boundary: a doubling phase
/// (at most 10 steps) brackets the edge, then bisection narrows it to
/// [`ReachOptions::epsilon`].
///
/// `progress`, when given, is invoked after each ray with
/// `(rays_done, rays_total)`. `cancel`, when given, is checked once per
/// ray; a cancelled run returns the partial result with
/// [`ReachResult::cancelled`] set. Rays whose inner IK cannot even reach
/// the origin are skipped, never an error.
pub fn sample_workspace(
    model: &Model,
    data: &mut Data,
    options: &ReachOptions,
    mut progress: Option<&mut dyn FnMut(usize, usize)>,
    cancel: Option<&AtomicBool>,
) -> QueryResult<ReachResult> {
    let q_mid = model.midpoint_configuration();
    forward_kinematics(model, data, q_mid.as_slice())?;
    let origin = Point3::from(data.omi[model.last_joint()].translation);

    let reach_estimate = max_reach_estimate(model);
    let directions = fibonacci_directions(options.num_rays);
    debug!(
        rays = directions.len(),
        reach = reach_estimate,
        "sampling workspace from {origin:?}"
    );

    let ik_options = IkOptions {
        max_iter: options.max_ik_iter,
        ..IkOptions::default()
    };

    let mut points = Vec::with_capacity(directions.len());
    let mut attempted = 0usize;
    let mut cancelled = false;

    for (i, dir) in directions.iter().enumerate() {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                cancelled = true;
                break;
            }
        }
        attempted += 1;

        if let Some(point) = boundary_along_ray(
            model,
            data,
            &origin,
            dir,
            reach_estimate,
            options.epsilon,
            q_mid.as_slice(),
            &ik_options,
        ) {
            points.push(point);
        }

        if let Some(cb) = progress.as_deref_mut() {
            cb(i + 1, directions.len());
        }
    }

    let bbox = if points.is_empty() {
        Aabb::from_points(&[origin])
    } else {
        Aabb::from_points(&points)
    };
    let success_rate = if attempted == 0 {
        0.0
    } else {
        points.len() as f64 / attempted as f64
    };

    debug!(
        accepted = points.len(),
        attempted, cancelled, "workspace sampling finished"
    );
    Ok(ReachResult {
        points,
        bbox,
        success_rate,
        cancelled,
    })
}

/// `max(2, ½·Σ|range_j|)` over effective joint ranges (unbounded joints
/// count a full turn).
fn max_reach_estimate(model: &Model) -> f64 {
    let mut span = 0.0;
    for j in 0..model.njoints() {
        let Some(joint) = model.joint(j) else { continue };
        if !joint.is_movable() {
            continue;
        }
        let limits = model.joint_limits(j).unwrap_or_else(JointLimits::unlimited);
        let effective = if limits.is_bounded() {
            limits
        } else {
            JointLimits::full_turn()
        };
        span += effective.range().abs();
    }
    (0.5 * span).max(2.0)
}

/// Binary-search the reachability boundary along one ray.
///
/// Returns `None` when even the ray origin is unreachable (a malformed
/// model or an over-tight IK budget).
#[allow(clippy::too_many_arguments)]
fn boundary_along_ray(
    model: &Model,
    data: &mut Data,
    origin: &Point3<f64>,
    dir: &Vector3<f64>,
    initial_reach: f64,
    epsilon: f64,
    q_mid: &[f64],
    ik_options: &IkOptions,
) -> Option<Point3<f64>> {
    let mut reachable = |data: &mut Data, radius: f64| -> bool {
        let target = origin + dir * radius;
        solve_ik(model, data, &target, q_mid, ik_options)
            .map(|r| r.converged)
            .unwrap_or(false)
    };

    if !reachable(data, 0.0) {
        return None;
    }

    // Doubling phase: bracket the boundary, at most 10 expansions
    let mut low = 0.0;
    let mut high = initial_reach;
    let mut expansions = 0;
    while reachable(data, high) {
        low = high;
        high *= 2.0;
        expansions += 1;
        if expansions >= 10 {
            // Accept the capped radius as the boundary
            return Some(origin + dir * low);
        }
    }

    // Bisection
    let mut iters = 0;
    while high - low > epsilon && iters < 50 {
        let mid = 0.5 * (low + high);
        if reachable(data, mid) {
            low = mid;
        } else {
            high = mid;
        }
        iters += 1;
    }

    Some(origin + dir * low)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rdyn_spatial::SE3;
    use rdyn_types::{JointKind, ModelBuilder};

    /// Planar 2R arm with 0.5 m links and a tool frame: reach radius 1 m.
    fn planar_2r() -> Model {
        let mut b = ModelBuilder::new("planar_2r");
        let j1 = b
            .add_joint(
                0,
                JointKind::revolute(Vector3::z()),
                SE3::identity(),
                JointLimits::new(-3.0, 3.0),
                "shoulder",
            )
            .unwrap();
        let j2 = b
            .add_joint(
                j1,
                JointKind::revolute(Vector3::z()),
                SE3::from_translation(Vector3::new(0.5, 0.0, 0.0)),
                JointLimits::new(-3.0, 3.0),
                "elbow",
            )
            .unwrap();
        b.add_joint(
            j2,
            JointKind::Fixed,
            SE3::from_translation(Vector3::new(0.5, 0.0, 0.0)),
            JointLimits::unlimited(),
            "tool",
        )
        .unwrap();
        b.finalize().unwrap()
    }

    #[test]
    fn bbox_contains_the_rest_position() {
        let model = planar_2r();
        let mut data = Data::new(&model);
        let options = ReachOptions::default().with_num_rays(16);

        let result = sample_workspace(&model, &mut data, &options, None, None).unwrap();
        assert!(!result.cancelled);
        assert!(result.success_rate > 0.0);

        forward_kinematics(&model, &mut data, model.midpoint_configuration().as_slice()).unwrap();
        let rest = Point3::from(data.omi[model.last_joint()].translation);
        assert!(result.bbox.contains(&rest), "bbox {:?} lost {rest:?}", result.bbox);
    }

    #[test]
    fn boundary_points_stay_within_arm_reach() {
        let model = planar_2r();
        let mut data = Data::new(&model);
        let options = ReachOptions::default().with_num_rays(24);

        let result = sample_workspace(&model, &mut data, &options, None, None).unwrap();
        for p in &result.points {
            // Total arm length is 1 m; allow the bisection width
            assert!(
                p.coords.norm() <= 1.0 + 1e-2,
                "boundary point {p:?} beyond reach"
            );
        }
    }

    #[test]
    fn progress_fires_once_per_ray() {
        let model = planar_2r();
        let mut data = Data::new(&model);
        let options = ReachOptions::default().with_num_rays(8);

        let mut calls = Vec::new();
        let mut cb = |done: usize, total: usize| calls.push((done, total));
        sample_workspace(&model, &mut data, &options, Some(&mut cb), None).unwrap();

        assert_eq!(calls.len(), 8);
        assert_eq!(calls[0], (1, 8));
        assert_eq!(calls[7], (8, 8));
    }

    #[test]
    fn cancellation_returns_partial_result() {
        let model = planar_2r();
        let mut data = Data::new(&model);
        let options = ReachOptions::default().with_num_rays(64);

        let flag = AtomicBool::new(false);
        let mut fired = 0;
        let mut cb = |done: usize, _total: usize| {
            fired = done;
            if done >= 5 {
                flag.store(true, Ordering::Relaxed);
            }
        };
        // Note: the callback and the flag are used from the same thread here;
        // hosts normally flip the flag from another thread.
        let result = sample_workspace(&model, &mut data, &options, Some(&mut cb), Some(&flag))
            .unwrap();

        assert!(result.cancelled);
        assert!(fired >= 5);
        assert!(result.points.len() <= 5);
        assert!(result.success_rate <= 1.0);
    }

    #[test]
    fn reach_estimate_from_joint_ranges() {
        let model = planar_2r();
        // Joint ranges: 6 + 6 radians → ½·12 = 6
        assert_relative_eq!(max_reach_estimate(&model), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn reach_estimate_floor_is_two_meters() {
        let mut b = ModelBuilder::new("stubby");
        b.add_joint(
            0,
            JointKind::revolute(Vector3::z()),
            SE3::identity(),
            JointLimits::new(-0.1, 0.1),
            "tiny",
        )
        .unwrap();
        let model = b.finalize().unwrap();
        assert_relative_eq!(max_reach_estimate(&model), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn aabb_basics() {
        let pts = vec![
            Point3::new(-1.0, 0.0, 2.0),
            Point3::new(3.0, -2.0, 0.5),
        ];
        let bb = Aabb::from_points(&pts);
        assert_relative_eq!(bb.min.x, -1.0);
        assert_relative_eq!(bb.max.x, 3.0);
        assert!(bb.contains(&Point3::new(0.0, -1.0, 1.0)));
        assert!(!bb.contains(&Point3::new(0.0, -3.0, 1.0)));

        let empty = Aabb::from_points(&[]);
        assert_relative_eq!(empty.min.x, 0.0);
    }
}
