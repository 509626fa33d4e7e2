//! Input validation shared by the kernel entry points.

use rdyn_types::{KernelError, Model, QueryResult};

/// Check a slice's length and finiteness against an expected dimension.
pub(crate) fn check_vector(arg: &'static str, expected: usize, values: &[f64]) -> QueryResult<()> {
    if values.len() != expected {
        return Err(KernelError::dimension(arg, expected, values.len()));
    }
    if let Some(i) = values.iter().position(|x| !x.is_finite()) {
        return Err(KernelError::invalid_input(format!(
            "{arg}[{i}] is not finite"
        )));
    }
    Ok(())
}

/// Check a configuration vector against the model.
pub(crate) fn check_q(model: &Model, q: &[f64]) -> QueryResult<()> {
    check_vector("q", model.nq(), q)
}

/// Check a velocity-sized vector against the model.
pub(crate) fn check_nv(arg: &'static str, model: &Model, values: &[f64]) -> QueryResult<()> {
    check_vector(arg, model.nv(), values)
}

/// Check a joint index against the model.
pub(crate) fn check_joint(model: &Model, j: usize) -> QueryResult<()> {
    if j >= model.njoints() {
        return Err(KernelError::InvalidJoint { index: j });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        let err = check_vector("q", 3, &[0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            KernelError::DimensionMismatch {
                expected: 3,
                got: 2,
                arg: "q"
            }
        ));
    }

    #[test]
    fn rejects_nan() {
        let err = check_vector("v", 2, &[0.0, f64::NAN]).unwrap_err();
        assert!(matches!(err, KernelError::InvalidInput { .. }));
    }

    #[test]
    fn accepts_exact_finite() {
        assert!(check_vector("a", 2, &[1.0, -2.0]).is_ok());
    }
}
