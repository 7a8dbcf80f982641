// Copyright @yucwang 2026

use crate::math::constants::Float;
use crate::transfer_functions::segment;

/// Inverse-CDF table over a piecewise curve of evenly spaced control points,
/// for drawing normalized positions proportional to the curve.
///
/// Cell `m` spans control points `m` and `m + 1` and is weighted by their
/// average. A curve with no mass falls back to uniform sampling.
#[derive(Clone, Debug)]
pub struct ImportanceTable {
    cdf: Vec<Float>,
    total_weight: Float,
}

impl ImportanceTable {
    pub fn build(weights: &[Float]) -> Self {
        let cells = weights.len().saturating_sub(1).max(1);
        let mut cdf = vec![0.0; cells + 1];

        let mut total = 0.0;
        for m in 0..cells {
            let weight = match weights.len() {
                0 => 0.0,
                1 => weights[0].max(0.0),
                _ => 0.5 * (weights[m].max(0.0) + weights[m + 1].max(0.0)),
            };
            total += weight;
            cdf[m + 1] = total;
        }

        if total <= 0.0 {
            for (m, c) in cdf.iter_mut().enumerate() {
                *c = m as Float / cells as Float;
            }
        } else {
            for c in cdf.iter_mut() {
                *c /= total;
            }
        }
        cdf[cells] = 1.0;

        Self { cdf, total_weight: total }
    }

    fn cells(&self) -> usize {
        self.cdf.len() - 1
    }

    pub fn is_uniform(&self) -> bool {
        self.total_weight <= 0.0
    }

    /// Integral of the piecewise-constant curve over `[0, 1]`.
    pub fn integral(&self) -> Float {
        self.total_weight / self.cells() as Float
    }

    /// Maps `u` in `[0, 1)` to a normalized position and its density.
    pub fn sample(&self, u: Float) -> (Float, Float) {
        let cells = self.cells();
        let u = u.max(0.0).min(1.0);
        let cell = (self.cdf.partition_point(|c| *c <= u).max(1) - 1).min(cells - 1);

        let mass = self.cdf[cell + 1] - self.cdf[cell];
        if mass <= 0.0 {
            return ((cell as Float + 0.5) / cells as Float, 0.0);
        }
        let du = ((u - self.cdf[cell]) / mass).max(0.0).min(1.0);
        let t = (cell as Float + du) / cells as Float;
        (t, mass * cells as Float)
    }

    pub fn pdf(&self, t: Float) -> Float {
        let cells = self.cells();
        let cell = if cells == 1 { 0 } else { segment(t, cells + 1).0 };
        (self.cdf[cell + 1] - self.cdf[cell]) * cells as Float
    }
}

#[cfg(test)]
mod tests {
    use super::ImportanceTable;
    use crate::core::rng::LcgRng;
    use crate::math::constants::Float;

    #[test]
    fn test_zero_curve_is_uniform() {
        let table = ImportanceTable::build(&[0.0, 0.0, 0.0]);
        assert!(table.is_uniform());
        let (t, pdf) = table.sample(0.3);
        assert!((t - 0.3).abs() < 1e-6);
        assert!((pdf - 1.0).abs() < 1e-6);
        assert!((table.pdf(0.9) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_weight() {
        let table = ImportanceTable::build(&[0.4]);
        assert!(!table.is_uniform());
        assert!((table.integral() - 0.4).abs() < 1e-6);
        let (t, pdf) = table.sample(0.25);
        assert!((t - 0.25).abs() < 1e-6);
        assert!((pdf - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_samples_avoid_empty_cells() {
        // Only the last cell carries weight.
        let table = ImportanceTable::build(&[0.0, 0.0, 1.0]);
        let mut rng = LcgRng::new(17);
        for _ in 0..512 {
            let (t, pdf) = table.sample(rng.next_f32());
            assert!(t >= 0.5 - 1e-6, "t = {}", t);
            assert!(pdf > 0.0);
            assert!((table.pdf(t) - pdf).abs() < 1e-4);
        }
        assert_eq!(table.pdf(0.25), 0.0);
    }

    #[test]
    fn test_pdf_integrates_to_one() {
        let table = ImportanceTable::build(&[0.1, 0.8, 0.3, 0.0, 0.5]);
        let steps = 4000;
        let sum: Float = (0..steps)
            .map(|s| table.pdf((s as Float + 0.5) / steps as Float))
            .sum::<Float>()
            / steps as Float;
        assert!((sum - 1.0).abs() < 1e-3);
    }
}
