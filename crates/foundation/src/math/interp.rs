//! Scalar interpolation helpers used for geographic -> scene normalization.

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MathError {
    /// `inverse_lerp` over an empty interval (`a == b`).
    DivisionByZero,
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::DivisionByZero => write!(f, "division by zero: degenerate interval"),
        }
    }
}

impl std::error::Error for MathError {}

/// `a + (b - a) * t`. `t` is not clamped.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Position of `v` within `[a, b]` as a fraction; inverse of [`lerp`].
#[inline]
pub fn inverse_lerp(a: f64, b: f64, v: f64) -> Result<f64, MathError> {
    let span = b - a;
    if span == 0.0 {
        return Err(MathError::DivisionByZero);
    }
    Ok((v - a) / span)
}

/// Precondition: `lo <= hi`.
#[inline]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    debug_assert!(lo <= hi, "clamp called with lo > hi");
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
