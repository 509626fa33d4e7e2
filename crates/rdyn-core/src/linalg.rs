//! Dense helpers the kernel needs beyond nalgebra's built-ins:
//! a symmetric LDLᵀ factorization with explicit pivot failure, and the
//! damped right-pseudo-inverse used by least-squares solvers.

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// LDLᵀ factorization of a symmetric matrix.
///
/// `A = L·D·Lᵀ` with `L` unit lower-triangular and `D` diagonal. Unlike a
/// Cholesky factorization this tolerates indefinite matrices; it reports
/// failure (rather than producing `NaN`) only when a pivot collapses to
/// zero.
#[derive(Debug, Clone)]
pub struct Ldlt {
    l: DMatrix<f64>,
    d: DVector<f64>,
}

impl Ldlt {
    /// Pivot magnitude below which the factorization is declared singular.
    const PIVOT_TOL: f64 = 1e-300;

    /// Factorize a symmetric matrix; `None` on a zero pivot.
    #[must_use]
    pub fn factorize(a: &DMatrix<f64>) -> Option<Self> {
        let n = a.nrows();
        if a.ncols() != n {
            return None;
        }
        let mut l = DMatrix::identity(n, n);
        let mut d = DVector::zeros(n);

        for j in 0..n {
            let mut dj = a[(j, j)];
            for k in 0..j {
                dj -= l[(j, k)] * l[(j, k)] * d[k];
            }
            if dj.abs() < Self::PIVOT_TOL {
                return None;
            }
            d[j] = dj;

            for i in (j + 1)..n {
                let mut lij = a[(i, j)];
                for k in 0..j {
                    lij -= l[(i, k)] * l[(j, k)] * d[k];
                }
                l[(i, j)] = lij / dj;
            }
        }

        Some(Self { l, d })
    }

    /// The diagonal pivots `D`.
    #[must_use]
    pub fn pivots(&self) -> &DVector<f64> {
        &self.d
    }

    /// Whether every pivot is strictly positive (the factored matrix is
    /// positive definite).
    #[must_use]
    pub fn is_positive_definite(&self) -> bool {
        self.d.iter().all(|&p| p > 0.0)
    }

    /// Solve `A·x = b`.
    #[must_use]
    pub fn solve(&self, b: &DVector<f64>) -> DVector<f64> {
        let n = self.d.len();
        let mut x = b.clone();

        // Forward: L·y = b
        for i in 0..n {
            for k in 0..i {
                let delta = self.l[(i, k)] * x[k];
                x[i] -= delta;
            }
        }
        // Diagonal
        for i in 0..n {
            x[i] /= self.d[i];
        }
        // Backward: Lᵀ·z = y
        for i in (0..n).rev() {
            for k in (i + 1)..n {
                let delta = self.l[(k, i)] * x[k];
                x[i] -= delta;
            }
        }
        x
    }
}

/// Damped right-pseudo-inverse of a 3×n matrix:
/// `J⁺ = Jᵀ·(J·Jᵀ + λ²·I₃)⁻¹`.
///
/// `None` when the damped 3×3 normal matrix is still not invertible
/// (possible only with λ = 0 at a singular `J`).
#[must_use]
pub fn damped_pinv(j: &DMatrix<f64>, damping: f64) -> Option<DMatrix<f64>> {
    debug_assert_eq!(j.nrows(), 3);
    let jjt3: Matrix3<f64> = Matrix3::from_iterator((j * j.transpose()).iter().copied());
    let a = jjt3 + Matrix3::identity() * (damping * damping);
    let a_inv = a.try_inverse()?;
    Some(j.transpose() * DMatrix::from_iterator(3, 3, a_inv.iter().copied()))
}

/// Solve the damped least-squares step `Δ = Jᵀ·(J·Jᵀ + λ²·I₃)⁻¹·e`
/// without materializing the pseudo-inverse.
#[must_use]
pub fn damped_solve(j: &DMatrix<f64>, e: &Vector3<f64>, damping: f64) -> Option<DVector<f64>> {
    debug_assert_eq!(j.nrows(), 3);
    let jjt3: Matrix3<f64> = Matrix3::from_iterator((j * j.transpose()).iter().copied());
    let a = jjt3 + Matrix3::identity() * (damping * damping);
    let a_inv = a.try_inverse()?;
    let y = a_inv * e;
    Some(j.transpose() * DVector::from_column_slice(y.as_slice()))
}
