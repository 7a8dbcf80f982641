// Copyright @yucwang 2026

use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

/// Maps scalar field values to color and opacity for volume rendering.
pub trait TransferFunction: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Field values the function is defined over, as `(lo, hi)`.
    fn value_range(&self) -> (Float, Float);
    fn set_value_range(&mut self, lo: Float, hi: Float);

    fn color(&self, value: Float) -> RGBSpectrum;
    fn opacity(&self, value: Float) -> Float;

    /// Upper bound on the opacity reachable for field values in `[lo, hi]`.
    /// May be loose, never lower than the true maximum.
    fn max_opacity_in_range(&self, lo: Float, hi: Float) -> Float;

    /// Lower bound on the opacity reachable for field values in `[lo, hi]`.
    fn min_opacity_in_range(&self, lo: Float, hi: Float) -> Float;
}
