//! The three-phase sweep over the joint-limit box.

use nalgebra::DVector;
use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rdyn_core::rnea;
use rdyn_types::{Data, JointLimits, Model, QueryResult};
use tracing::debug;

/// Options for [`max_torques`].
#[derive(Debug, Clone)]
pub struct TorqueOptions {
    /// Seed for the stratified-grid jitter.
    pub seed: u64,
    /// Number of stratified grid samples.
    pub grid_samples: usize,
}

impl Default for TorqueOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            grid_samples: 300,
        }
    }
}

impl TorqueOptions {
    /// Set the jitter seed (builder style).
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

/// Worst-case torque report.
#[derive(Debug, Clone)]
pub struct TorqueReport {
    /// Per-joint maximum `|τ|` over all sampled configurations.
    pub max: DVector<f64>,
    /// The sampled configuration that last improved any maximum.
    pub at: DVector<f64>,
    /// Torques at the caller's configuration.
    pub current: DVector<f64>,
    /// Movable-joint names, ordered by velocity index.
    pub joint_names: Vec<String>,
}

/// Number of strata in the grid phase.
const STRATA: usize = 10;

/// Sweep the joint-limit box for worst-case torques.
///
/// Every sample is evaluated as `τ(q_s) = rnea(q_s, v, a)` with the
/// caller-supplied `v` and `a` held fixed. Joints without finite limits
/// sweep `[−π, π]`. The per-joint maxima dominate the current torques by
/// construction: the report is seeded with `|τ(q)|` itself.
pub fn max_torques(
    model: &Model,
    data: &mut Data,
    q: &[f64],
    v: &[f64],
    a: &[f64],
    options: &TorqueOptions,
) -> QueryResult<TorqueReport> {
    let nv = model.nv();
    let current = rnea(model, data, q, v, a)?;

    let mut max = current.abs();
    let mut at = DVector::from_column_slice(q);

    let ranges = effective_ranges(model);
    let movable: Vec<usize> = (0..model.njoints())
        .filter(|&j| model.joint(j).is_some_and(|joint| joint.is_movable()))
        .collect();

    let mut sample = DVector::from_column_slice(q);
    let evaluate = |data: &mut Data,
                        positions: &dyn Fn(usize, (f64, f64)) -> f64,
                        sample: &mut DVector<f64>,
                        max: &mut DVector<f64>,
                        at: &mut DVector<f64>|
     -> QueryResult<()> {
        for (slot, &j) in movable.iter().enumerate() {
            let joint = &model.joints()[j];
            let position = positions(slot, ranges[joint.idx_v]);
            joint.kind.position_into_slice(
                position,
                &mut sample.as_mut_slice()[joint.idx_q..joint.idx_q + joint.nq()],
            );
        }
        let tau = rnea(model, data, sample.as_slice(), v, a)?;
        let mut improved = false;
        for i in 0..nv {
            if tau[i].abs() > max[i] {
                max[i] = tau[i].abs();
                improved = true;
            }
        }
        if improved {
            at.copy_from(sample);
        }
        Ok(())
    };

    // Phase 1: corners over the first up-to-6 joints, the rest pinned low
    let corner_bits = movable.len().min(6);
    for mask in 0u32..(1 << corner_bits) {
        evaluate(
            data,
            &|slot, (lo, hi)| {
                if slot < corner_bits && mask & (1 << slot) != 0 {
                    hi
                } else {
                    lo
                }
            },
            &mut sample,
            &mut max,
            &mut at,
        )?;
    }

    // Phase 2: stratified grid with seeded jitter
    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let per_stratum = (options.grid_samples / STRATA).max(1);
    for i in 0..options.grid_samples {
        let stratum = (i / per_stratum).min(STRATA - 1);
        // Draw one jitter per joint so strata stay decorrelated
        let jitters: Vec<f64> = movable.iter().map(|_| rng.gen_range(-0.5..0.5)).collect();
        evaluate(
            data,
            &|slot, (lo, hi)| {
                let fraction = (stratum as f64 + 0.5 + jitters[slot]) / STRATA as f64;
                lo + fraction * (hi - lo)
            },
            &mut sample,
            &mut max,
            &mut at,
        )?;
    }

    // Phase 3: twelve fixed patterns
    for pattern in 0..12usize {
        evaluate(
            data,
            &|slot, (lo, hi)| fixed_pattern(pattern, slot, lo, hi),
            &mut sample,
            &mut max,
            &mut at,
        )?;
    }

    let joint_names = model.movable_joint_names();
    debug!(
        nv,
        samples = (1usize << corner_bits) + options.grid_samples + 12,
        "torque sweep finished"
    );

    Ok(TorqueReport {
        max,
        at,
        current,
        joint_names,
    })
}

/// Effective `(lower, upper)` per velocity index; unbounded joints get a
/// full turn.
fn effective_ranges(model: &Model) -> Vec<(f64, f64)> {
    let mut ranges = vec![(0.0, 0.0); model.nv()];
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
        ranges[joint.idx_v] = (effective.lower, effective.upper);
    }
    ranges
}

/// The twelve deterministic limit/fraction patterns of phase 3.
fn fixed_pattern(pattern: usize, slot: usize, lo: f64, hi: f64) -> f64 {
    let at = |f: f64| lo + f * (hi - lo);
    match pattern {
        0 => lo,
        1 => hi,
        2 => {
            if slot % 2 == 0 {
                lo
            } else {
                hi
            }
        }
        3 => {
            if slot % 2 == 0 {
                hi
            } else {
                lo
            }
        }
        4 => at(0.25),
        5 => at(0.5),
        6 => at(0.75),
        7 => {
            if slot % 2 == 0 {
                at(0.25)
            } else {
                at(0.75)
            }
        }
        8 => {
            if slot % 2 == 0 {
                at(0.75)
            } else {
                at(0.25)
            }
        }
        // Thirds: joints congruent to k (mod 3) at the upper limit
        k @ (9 | 10 | 11) => {
            if slot % 3 == k - 9 {
                hi
            } else {
                lo
            }
        }
        _ => at(0.5),
    }
}
