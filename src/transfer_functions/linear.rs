// Copyright @yucwang 2026

use crate::core::computation_node::{generate_node_id, ComputationNode};
use crate::core::transfer_function::TransferFunction;
use crate::math::constants::{Float, EPSILON_RANGE};
use crate::math::spectrum::RGBSpectrum;
use crate::transfer_functions::importance::ImportanceTable;
use crate::transfer_functions::opacity_range::OpacityRangeTable;
use crate::transfer_functions::{eval_curve, segment};
use std::sync::Arc;

/// Transfer function with piecewise-linear color and opacity curves, each
/// sampled at its own resolution over the normalized value range.
///
/// Every setter rebuilds the tables derived from the curve it touches, so
/// queries never see a stale opacity range table.
pub struct LinearTransferFunction {
    id: String,
    value_lo: Float,
    value_hi: Float,
    color_values: Vec<RGBSpectrum>,
    opacity_values: Vec<Float>,
    color_importance: ImportanceTable,
    opacity_importance: ImportanceTable,
    opacity_ranges: Arc<OpacityRangeTable>,
}

impl LinearTransferFunction {
    pub fn new(color_values: Vec<RGBSpectrum>, opacity_values: Vec<Float>) -> Self {
        Self::new_with_id(color_values, opacity_values, generate_node_id("linear"))
    }

    pub fn new_with_id(color_values: Vec<RGBSpectrum>, opacity_values: Vec<Float>, id: String) -> Self {
        let color_importance = build_color_importance(&color_values);
        let opacity_importance = ImportanceTable::build(&opacity_values);
        let opacity_ranges = Arc::new(OpacityRangeTable::build(&opacity_values));
        Self {
            id,
            value_lo: 0.0,
            value_hi: 1.0,
            color_values,
            opacity_values,
            color_importance,
            opacity_importance,
            opacity_ranges,
        }
    }

    pub fn with_value_range(mut self, lo: Float, hi: Float) -> Self {
        self.set_value_range(lo, hi);
        self
    }

    pub fn color_values(&self) -> &[RGBSpectrum] {
        &self.color_values
    }

    pub fn opacity_values(&self) -> &[Float] {
        &self.opacity_values
    }

    pub fn set_color_values(&mut self, color_values: Vec<RGBSpectrum>) {
        self.color_importance = build_color_importance(&color_values);
        self.color_values = color_values;
    }

    /// Replaces the opacity curve. Snapshots taken before keep describing the
    /// old curve.
    pub fn set_opacity_values(&mut self, opacity_values: Vec<Float>) {
        self.opacity_importance = ImportanceTable::build(&opacity_values);
        self.opacity_ranges = Arc::new(OpacityRangeTable::build(&opacity_values));
        self.opacity_values = opacity_values;
        log::debug!("{}: opacity curve replaced, {} control points.", self.id, self.opacity_values.len());
    }

    /// Shared handle on the current opacity range table, for marchers that
    /// must keep a consistent table while the curve is edited.
    pub fn snapshot(&self) -> Arc<OpacityRangeTable> {
        self.opacity_ranges.clone()
    }

    pub fn color_importance(&self) -> &ImportanceTable {
        &self.color_importance
    }

    pub fn opacity_importance(&self) -> &ImportanceTable {
        &self.opacity_importance
    }

    /// Field value to normalized `[0, 1]`, unclamped. Only degenerate spans
    /// are widened to `EPSILON_RANGE`, so a valid `value_hi` maps to exactly 1.
    #[inline]
    pub fn normalize(&self, value: Float) -> Float {
        (value - self.value_lo) / (self.value_hi - self.value_lo).max(EPSILON_RANGE)
    }

    // `None` for values outside the domain or NaN; those are handled by the
    // callers with the end control points.
    fn remap(&self, value: Float) -> Option<Float> {
        if value <= self.value_lo || value >= self.value_hi || value.is_nan() {
            None
        } else {
            Some((value - self.value_lo) / (self.value_hi - self.value_lo))
        }
    }
}

impl ComputationNode for LinearTransferFunction {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!(
            "LinearTransferFunction[id={}, range=[{}, {}], colors={}, opacities={}]",
            self.id,
            self.value_lo,
            self.value_hi,
            self.color_values.len(),
            self.opacity_values.len()
        )
    }
}

impl TransferFunction for LinearTransferFunction {
    fn value_range(&self) -> (Float, Float) {
        (self.value_lo, self.value_hi)
    }

    fn set_value_range(&mut self, lo: Float, hi: Float) {
        if !(lo < hi) {
            log::warn!("{}: degenerate value range [{}, {}].", self.id, lo, hi);
        }
        self.value_lo = lo;
        self.value_hi = hi;
    }

    fn color(&self, value: Float) -> RGBSpectrum {
        let (first, last) = match (self.color_values.first(), self.color_values.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return RGBSpectrum::default(),
        };
        if value.is_nan() {
            return RGBSpectrum::default();
        }
        match self.remap(value) {
            Some(t) if self.color_values.len() > 1 => {
                let (idx, frac) = segment(t, self.color_values.len());
                self.color_values[idx].lerp(&self.color_values[idx + 1], frac)
            }
            Some(_) => first,
            None if value <= self.value_lo => first,
            None => last,
        }
    }

    fn opacity(&self, value: Float) -> Float {
        let (first, last) = match (self.opacity_values.first(), self.opacity_values.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.0,
        };
        if value.is_nan() {
            return 0.0;
        }
        match self.remap(value) {
            Some(t) => eval_curve(&self.opacity_values, t),
            None if value <= self.value_lo => first,
            None => last,
        }
    }

    fn max_opacity_in_range(&self, lo: Float, hi: Float) -> Float {
        self.opacity_ranges.max_opacity(self.normalize(lo), self.normalize(hi))
    }

    fn min_opacity_in_range(&self, lo: Float, hi: Float) -> Float {
        self.opacity_ranges.min_opacity(self.normalize(lo), self.normalize(hi))
    }
}

fn build_color_importance(color_values: &[RGBSpectrum]) -> ImportanceTable {
    let weights: Vec<Float> = color_values.iter().map(|c| c.luminance()).collect();
    ImportanceTable::build(&weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::LcgRng;

    fn ramp() -> LinearTransferFunction {
        LinearTransferFunction::new(
            vec![RGBSpectrum::new(0.0, 0.0, 1.0), RGBSpectrum::new(1.0, 0.0, 0.0)],
            vec![0.0, 1.0],
        )
    }

    #[test]
    fn test_constant_opacity_scenario() {
        let tf = LinearTransferFunction::new(vec![RGBSpectrum::new(1.0, 1.0, 1.0)], vec![0.5; 8]);
        assert_eq!(tf.value_range(), (0.0, 1.0));
        assert_eq!(tf.max_opacity_in_range(0.2, 0.3), 0.5);
    }

    #[test]
    fn test_ramp_scenario() {
        let tf = ramp();
        assert!(tf.max_opacity_in_range(0.9, 1.0) >= 1.0);
    }

    #[test]
    fn test_color_and_opacity_lookup() {
        let tf = ramp().with_value_range(100.0, 200.0);
        assert_eq!(tf.opacity(50.0), 0.0);
        assert_eq!(tf.opacity(250.0), 1.0);
        assert!((tf.opacity(125.0) - 0.25).abs() < 1e-6);
        assert_eq!(tf.opacity(Float::NAN), 0.0);

        assert_eq!(tf.color(0.0), RGBSpectrum::new(0.0, 0.0, 1.0));
        assert_eq!(tf.color(1000.0), RGBSpectrum::new(1.0, 0.0, 0.0));
        let mid = tf.color(150.0);
        assert!((mid[0] - 0.5).abs() < 1e-6 && (mid[2] - 0.5).abs() < 1e-6);
        assert_eq!(tf.color(Float::NAN), RGBSpectrum::default());
    }

    #[test]
    fn test_empty_curves_are_black_and_transparent() {
        let tf = LinearTransferFunction::new(Vec::new(), Vec::new());
        assert_eq!(tf.color(0.5), RGBSpectrum::default());
        assert_eq!(tf.opacity(0.5), 0.0);
        assert_eq!(tf.max_opacity_in_range(0.0, 1.0), 0.0);
    }

    fn assert_field_space_conservative(tf: &LinearTransferFunction, rng: &mut LcgRng, queries: usize) {
        let (v_lo, v_hi) = tf.value_range();
        let span = v_hi - v_lo;
        for _ in 0..queries {
            let a = v_lo + span * rng.next_f32();
            let b = v_lo + span * rng.next_f32();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let bound = tf.max_opacity_in_range(lo, hi);
            let floor = tf.min_opacity_in_range(lo, hi);
            for s in 0..=200 {
                let v = (lo + (hi - lo) * s as Float / 200.0).min(hi);
                let alpha = tf.opacity(v);
                assert!(bound + 1e-5 >= alpha, "[{}, {}] bound {} < {}", lo, hi, bound, alpha);
                assert!(floor - 1e-5 <= alpha);
            }
        }
    }

    #[test]
    fn test_field_space_bound_is_conservative() {
        let mut rng = LcgRng::new(2024);
        let opacities: Vec<Float> = (0..37).map(|_| rng.next_f32() * rng.next_f32()).collect();
        let tf = LinearTransferFunction::new(vec![RGBSpectrum::new(1.0, 1.0, 1.0)], opacities)
            .with_value_range(-40.0, 1000.0);
        assert_field_space_conservative(&tf, &mut rng, 256);
    }

    #[test]
    fn test_tiny_value_range_reaches_the_top_bin() {
        let tf = ramp().with_value_range(0.0, 1e-5);
        assert!(tf.max_opacity_in_range(0.9e-5, 1e-5) >= tf.opacity(1e-5));
        assert!(tf.max_opacity_in_range(0.9e-5, 0.999e-5) >= tf.opacity(0.999e-5));

        let mut rng = LcgRng::new(7);
        let opacities: Vec<Float> = (0..37).map(|_| rng.next_f32()).collect();
        let tf = LinearTransferFunction::new(vec![RGBSpectrum::new(1.0, 1.0, 1.0)], opacities)
            .with_value_range(0.0, 1e-5);
        assert_field_space_conservative(&tf, &mut rng, 128);
    }

    #[test]
    fn test_field_space_widening_never_lowers_the_bound() {
        let mut rng = LcgRng::new(314);
        let opacities: Vec<Float> = (0..23).map(|_| rng.next_f32()).collect();
        for &(v_lo, v_hi) in &[(-40.0, 1000.0), (0.0, 1e-5), (2.5, 3.0)] {
            let tf = LinearTransferFunction::new(vec![RGBSpectrum::new(1.0, 1.0, 1.0)], opacities.clone())
                .with_value_range(v_lo, v_hi);
            let span = v_hi - v_lo;
            for _ in 0..64 {
                let a = v_lo + span * rng.next_f32();
                let b = v_lo + span * rng.next_f32();
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                let wide_lo = lo - (lo - v_lo) * rng.next_f32();
                let wide_hi = hi + (v_hi - hi) * rng.next_f32();
                assert!(tf.max_opacity_in_range(wide_lo, wide_hi) >= tf.max_opacity_in_range(lo, hi));
                assert!(tf.min_opacity_in_range(wide_lo, wide_hi) <= tf.min_opacity_in_range(lo, hi));
            }
        }
    }

    #[test]
    fn test_default_ids_are_generated() {
        let a = ramp();
        let b = ramp();
        assert!(a.id().starts_with("linear_"));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_degenerate_range_does_not_panic() {
        let tf = ramp().with_value_range(3.0, 3.0);
        assert!(tf.max_opacity_in_range(3.0, 3.0).is_finite());
        assert!(tf.max_opacity_in_range(5.0, 1.0).is_finite());
        assert_eq!(tf.opacity(3.0), 0.0);
    }

    #[test]
    fn test_snapshot_survives_edit() {
        let mut tf = ramp();
        let before = tf.snapshot();
        tf.set_opacity_values(vec![0.0, 0.0]);
        assert_eq!(before.max_opacity(0.9, 1.0), 1.0);
        assert_eq!(tf.max_opacity_in_range(0.9, 1.0), 0.0);
        assert!(tf.opacity_importance().is_uniform());
    }

    #[test]
    fn test_color_edit_rebuilds_importance() {
        let mut tf = ramp();
        tf.set_color_values(vec![RGBSpectrum::default(), RGBSpectrum::default()]);
        assert!(tf.color_importance().is_uniform());
        assert_eq!(tf.color_values().len(), 2);
        assert!(tf.to_string().contains(tf.id()));
    }
}
