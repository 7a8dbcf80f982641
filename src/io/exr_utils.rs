/* Copyright 2020 @TwoCookingMice */

use crate::core::transfer_function::TransferFunction;
use crate::math::constants::Float;
use crate::transfer_functions::opacity_range::{OpacityRangeTable, OPACITY_SUBRANGE_COUNT};

use exr::prelude::*;

/// Rasterizes a transfer function for inspection. The top half shows
/// color weighted by opacity across the value range, the bottom half the
/// max-opacity table with cell `(i, j)` at column `j`, row `i`.
pub fn transfer_function_preview(tf: &dyn TransferFunction,
                                 table: &OpacityRangeTable,
                                 width: usize,
                                 height: usize) -> Vec<(Float, Float, Float)> {
    let mut image = vec![(0.0, 0.0, 0.0); width * height];
    let (lo, hi) = tf.value_range();
    let band = height / 2;

    for x in 0..width {
        let t = (x as Float + 0.5) / width as Float;
        let value = lo + (hi - lo) * t;
        let c = tf.color(value) * tf.opacity(value);
        for y in 0..band {
            image[y * width + x] = (c[0], c[1], c[2]);
        }
    }

    let rows = height - band;
    for y in 0..rows {
        let i = y * OPACITY_SUBRANGE_COUNT / rows.max(1);
        for x in 0..width {
            let j = x * OPACITY_SUBRANGE_COUNT / width.max(1);
            if i <= j {
                let m = table.range(i, j).max;
                image[(band + y) * width + x] = (m, m, m);
            }
        }
    }

    image
}

// Write EXR Image to file
pub fn write_exr_to_file(image: &[(Float, Float, Float)],
                         width: usize,
                         height: usize,
                         file_path: &str) -> std::result::Result<(), String> {
    log::info!("Starting writing openexr images: {}.", file_path);

    if image.len() != width * height {
        return Err(format!("image has {} pixels, expected {}x{}", image.len(), width, height));
    }

    write_rgb_file(file_path, width, height, |x, y| image[y * width + x])
        .map_err(|e| format!("failed to write {}: {}", file_path, e))?;
    log::info!("EXR written to: {}.", file_path);
    Ok(())
}
