// Copyright @yucwang 2026

pub mod boundary;
pub mod optics;
