//! Near-uniform ray directions on the unit sphere.

use nalgebra::Vector3;

/// Generate `n` unit directions by the Fibonacci spiral.
///
/// Golden angle `φ = π·(3 − √5)`; for `i ∈ [0, n)` the direction is
/// `(r·cos θ, y, r·sin θ)` with `y = 1 − 2i/(n−1)`, `r = √(1 − y²)`,
/// `θ = i·φ`. The first and last directions are exactly `(0, ±1, 0)`.
#[must_use]
pub fn fibonacci_directions(n: usize) -> Vec<Vector3<f64>> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![Vector3::new(0.0, 1.0, 0.0)];
    }

    let golden = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
    (0..n)
        .map(|i| {
            let y = 1.0 - 2.0 * i as f64 / (n - 1) as f64;
            let r = (1.0 - y * y).max(0.0).sqrt();
            let theta = i as f64 * golden;
            Vector3::new(r * theta.cos(), y, r * theta.sin())
        })
        .collect()
}
