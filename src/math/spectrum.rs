// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};
use std::ops::{Add, AddAssign, Index, Mul, Sub};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RGBSpectrum {
    rgb: Vector3f
}

impl Default for RGBSpectrum {
    fn default() -> Self {
        Self { rgb: Vector3f::new(0.0f32, 0.0f32, 0.0f32) }
    }
}

impl RGBSpectrum {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { rgb: Vector3f::new(r, g, b) }
    }

    pub fn from_vec(rgb: Vector3f) -> Self {
        Self { rgb }
    }

    pub fn to_vec(&self) -> Vector3f {
        self.rgb
    }

    pub fn is_black(&self) -> bool {
        self.rgb.iter().all(|c| *c == 0.0)
    }

    pub fn luminance(&self) -> Float {
        0.212671 * self.rgb.x + 0.715160 * self.rgb.y + 0.072169 * self.rgb.z
    }

    pub fn lerp(&self, other: &RGBSpectrum, t: Float) -> RGBSpectrum {
        RGBSpectrum::from_vec(self.rgb * (1.0 - t) + other.rgb * t)
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, idx: usize) -> &Float {
        &self.rgb[idx]
    }
}

impl Add for RGBSpectrum {
    type Output = RGBSpectrum;

    fn add(self, other: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::from_vec(self.rgb + other.rgb)
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, other: RGBSpectrum) {
        self.rgb += other.rgb;
    }
}

impl Sub for RGBSpectrum {
    type Output = RGBSpectrum;

    fn sub(self, other: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::from_vec(self.rgb - other.rgb)
    }
}

impl Mul for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, other: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum::from_vec(self.rgb.component_mul(&other.rgb))
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, s: Float) -> RGBSpectrum {
        RGBSpectrum::from_vec(self.rgb * s)
    }
}
