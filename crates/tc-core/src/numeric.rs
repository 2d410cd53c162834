use crate::TcError;

/// Floating point type used for every transmissibility.
pub type Real = f64;

/// How far two condensed transmissibilities may drift apart and still be
/// treated as the same value.
///
/// `abs` covers values near zero, where a relative bound is meaningless;
/// `rel` scales with the larger magnitude of the pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// True if `a` and `b` agree within either bound of `tol`.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let scale = a.abs().max(b.abs());
    (a - b).abs() <= tol.abs.max(tol.rel * scale)
}

/// Pass `value` through, or name it in a [`TcError::NonFinite`].
pub fn ensure_finite(value: Real, what: &'static str) -> Result<Real, TcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(TcError::NonFinite { what, value })
    }
}

/// Series combination of two conductances: `a * b / (a + b)`.
///
/// Returns 0.0 when both are zero, since nothing flows through either. The
/// quotient is taken before the product, so any pair of finite inputs gives a
/// finite result.
pub fn series(a: Real, b: Real) -> Real {
    let sum = a + b;
    if sum == 0.0 {
        0.0
    } else if sum.is_finite() {
        a * (b / sum)
    } else {
        // Both halves fit when the full sum does not
        let (a, b) = (0.5 * a, 0.5 * b);
        2.0 * (a * (b / (a + b)))
    }
}
