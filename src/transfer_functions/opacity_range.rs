// Copyright @yucwang 2026

//! Precomputed opacity bounds over sub-ranges of a transfer function domain,
//! used by ray marchers to skip empty space.
//!
//! The normalized domain `[0, 1]` is cut into `OPACITY_SUBRANGE_COUNT` bins,
//! bin `b` covering `[b / K, (b + 1) / K]`. Cell `(i, j)` with `i <= j` holds
//! the opacity range over bins `i..=j`. Bounds are exact for the piecewise
//! linear curve, so the max never under-reports and the min never
//! over-reports.

use crate::math::constants::Float;
use crate::transfer_functions::{eval_curve, segment};

pub const OPACITY_SUBRANGE_COUNT: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpacityRange {
    pub min: Float,
    pub max: Float,
}

impl OpacityRange {
    fn point(v: Float) -> Self {
        Self { min: v, max: v }
    }

    fn include(&mut self, v: Float) {
        self.min = self.min.min(v);
        self.max = self.max.max(v);
    }

    fn union(&self, other: &OpacityRange) -> OpacityRange {
        OpacityRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl Default for OpacityRange {
    fn default() -> Self {
        Self::point(0.0)
    }
}

/// Immutable once built. Editing a curve means building a new table.
#[derive(Clone, Debug)]
pub struct OpacityRangeTable {
    cells: Vec<OpacityRange>,
}

impl OpacityRangeTable {
    pub fn build(opacity_values: &[Float]) -> Self {
        const K: usize = OPACITY_SUBRANGE_COUNT;
        let mut cells = vec![OpacityRange::default(); K * K];

        for b in 0..K {
            cells[b * K + b] = bin_range(opacity_values, b);
        }
        for i in 0..K {
            for j in (i + 1)..K {
                cells[i * K + j] = cells[i * K + j - 1].union(&cells[j * K + j]);
            }
        }

        log::debug!(
            "Built opacity range table over {} control points, full range [{}, {}].",
            opacity_values.len(),
            cells[K - 1].min,
            cells[K - 1].max
        );

        Self { cells }
    }

    #[inline]
    pub fn range(&self, bin_lo: usize, bin_hi: usize) -> OpacityRange {
        self.cells[bin_lo * OPACITY_SUBRANGE_COUNT + bin_hi]
    }

    #[inline]
    pub fn full_range(&self) -> OpacityRange {
        self.range(0, OPACITY_SUBRANGE_COUNT - 1)
    }

    /// Bins covering normalized `[t_lo, t_hi]`: low edge floored, high edge
    /// ceiled, both clamped into the table.
    #[inline]
    pub fn bins(t_lo: Float, t_hi: Float) -> (usize, usize) {
        let k = OPACITY_SUBRANGE_COUNT as Float;
        let last = OPACITY_SUBRANGE_COUNT as isize - 1;
        let lo = ((t_lo * k).floor() as isize).clamp(0, last) as usize;
        let hi = ((t_hi * k).ceil() as isize).clamp(0, last) as usize;
        (lo, hi)
    }

    /// Opacity range over normalized `[t_lo, t_hi]`. Reversed input falls
    /// back to the whole domain.
    #[inline]
    pub fn query(&self, t_lo: Float, t_hi: Float) -> OpacityRange {
        let (lo, hi) = Self::bins(t_lo, t_hi);
        if lo > hi {
            return self.full_range();
        }
        self.range(lo, hi)
    }

    #[inline]
    pub fn max_opacity(&self, t_lo: Float, t_hi: Float) -> Float {
        self.query(t_lo, t_hi).max
    }

    #[inline]
    pub fn min_opacity(&self, t_lo: Float, t_hi: Float) -> Float {
        self.query(t_lo, t_hi).min
    }
}

// Exact range of the curve over one bin: the interpolated bin edges plus
// every control point strictly inside.
fn bin_range(values: &[Float], bin: usize) -> OpacityRange {
    let k = OPACITY_SUBRANGE_COUNT as Float;
    let t0 = bin as Float / k;
    let t1 = (bin + 1) as Float / k;

    let mut range = OpacityRange::point(eval_curve(values, t0));
    range.include(eval_curve(values, t1));

    if values.len() > 1 {
        let (first, _) = segment(t0, values.len());
        let (last, frac) = segment(t1, values.len());
        let last = if frac > 0.0 { last + 1 } else { last };
        for v in &values[(first + 1).min(last)..last.min(values.len() - 1)] {
            range.include(*v);
        }
    }

    range
}
