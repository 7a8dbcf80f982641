// Copyright @yucwang 2026

use crate::math::constants::Float;

#[inline]
pub fn sqr(v: Float) -> Float {
    v * v
}

/// Plain IEEE reciprocal. Division by zero yields infinity, callers guard
/// upstream when that matters.
#[inline]
pub fn rcp(v: Float) -> Float {
    1.0 / v
}

#[inline]
pub fn lerp(a: Float, b: Float, t: Float) -> Float {
    a + (b - a) * t
}

#[inline]
pub fn clamp01(v: Float) -> Float {
    if v < 0.0 {
        0.0
    } else if v > 1.0 {
        1.0
    } else {
        v
    }
}
