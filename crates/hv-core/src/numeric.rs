use crate::CoreError;

/// Floating point type used throughout the system
pub type Real = f64;

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// Finite and strictly greater than zero.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CoreError> {
    let v = ensure_finite(v, what)?;
    if v > 0.0 {
        Ok(v)
    } else {
        Err(CoreError::InvalidArg { what })
    }
}

/// Saturate `v` to `[lo, hi]`. Returns `lo` if `lo > hi` (no panic, unlike
/// `f64::clamp`).
#[inline]
pub fn saturate(v: Real, lo: Real, hi: Real) -> Real {
    lo.max(hi.min(v))
}

/// Affine map of `x` from `[x0, x1]` onto `[y0, y1]` (no clamping).
#[inline]
pub fn lerp(x: Real, x0: Real, x1: Real, y0: Real, y1: Real) -> Real {
    let m = (y1 - y0) / (x1 - x0);
    y1 - m * (x1 - x)
}
