/* Copyright 2020 @Yuchen Wong */

use nalgebra as na;

pub type Float = f32;

pub type Vector3f = na::Vector3<Float>;

pub const PI: Float = 3.14159265359;

// Added to a transfer function's value span before normalizing.
pub const EPSILON_RANGE: Float = 1e-6;
