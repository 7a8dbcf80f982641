// Copyright @yucwang 2026

pub mod importance;
pub mod linear;
pub mod opacity_range;

use crate::math::constants::Float;
use crate::math::scalar::clamp01;

/// Locates normalized position `t` on a curve of `count` evenly spaced
/// control points. Returns the left control point and the fraction towards
/// the next one.
pub(crate) fn segment(t: Float, count: usize) -> (usize, Float) {
    if count <= 1 {
        return (0, 0.0);
    }
    let pos = clamp01(t) * (count - 1) as Float;
    let idx = (pos.floor() as usize).min(count - 2);
    (idx, pos - idx as Float)
}

/// Piecewise-linear evaluation of evenly spaced control points over `[0, 1]`.
pub(crate) fn eval_curve(values: &[Float], t: Float) -> Float {
    match values.len() {
        0 => 0.0,
        1 => values[0],
        n => {
            let (idx, frac) = segment(t, n);
            let a = values[idx];
            let b = values[idx + 1];
            a + (b - a) * frac
        }
    }
}
