// Copyright 2020 @TwoCookingMice

pub mod constants;
pub mod scalar;
pub mod spectrum;
