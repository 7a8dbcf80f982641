// Copyright 2020 TwoCookingMice

use translucent::core::computation_node::ComputationNode;
use translucent::core::config_loader::load_config;
use translucent::core::transfer_function::TransferFunction;
use translucent::io::exr_utils;
use translucent::math::constants::Float;
use translucent::transfer_functions::opacity_range::OPACITY_SUBRANGE_COUNT;

use std::env;

// Opacity below which a marcher treats a segment as empty.
const SKIP_THRESHOLD: Float = 1e-3;

fn main() {
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.xml> [--tf ID] [--query LO HI] [--preview out.exr] [--size W H]", args[0]);
        std::process::exit(1);
    }

    let input_path = &args[1];
    let mut tf_id: Option<String> = None;
    let mut query: Option<(Float, Float)> = None;
    let mut preview_path: Option<String> = None;
    let mut size: (usize, usize) = (256, 128);

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--tf" => {
                i += 1;
                tf_id = args.get(i).cloned();
            }
            "--query" => {
                let lo = args.get(i + 1).and_then(|v| v.parse::<Float>().ok());
                let hi = args.get(i + 2).and_then(|v| v.parse::<Float>().ok());
                query = lo.zip(hi);
                i += 2;
            }
            "--preview" => {
                i += 1;
                preview_path = args.get(i).cloned();
            }
            "--size" => {
                let w = args.get(i + 1).and_then(|v| v.parse::<usize>().ok()).unwrap_or(size.0);
                let h = args.get(i + 2).and_then(|v| v.parse::<usize>().ok()).unwrap_or(size.1);
                size = (w.max(1), h.max(2));
                i += 2;
            }
            other => log::warn!("Ignoring unknown argument: {}.", other),
        }
        i += 1;
    }

    let config = match load_config(input_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load {}: {}", input_path, e);
            std::process::exit(1);
        }
    };

    for node in &config.materials {
        let r = node.material().reflectance(1.0);
        log::info!("{}: normal incidence reflectance ({:.4}, {:.4}, {:.4}).", node.to_string(), r.x, r.y, r.z);
    }

    for tf in &config.transfer_functions {
        let table = tf.snapshot();
        let mut skippable = 0usize;
        let mut cells = 0usize;
        for lo in 0..OPACITY_SUBRANGE_COUNT {
            for hi in lo..OPACITY_SUBRANGE_COUNT {
                cells += 1;
                if table.range(lo, hi).max < SKIP_THRESHOLD {
                    skippable += 1;
                }
            }
        }
        let full = table.full_range();
        log::info!(
            "{}: opacity in [{}, {}], {}/{} sub-ranges skippable.",
            tf.to_string(), full.min, full.max, skippable, cells
        );
    }

    let tf = match tf_id.as_deref() {
        Some(id) => config.transfer_function(id),
        None => config.transfer_functions.first(),
    };
    let tf = match tf {
        Some(tf) => tf,
        None => {
            if query.is_some() || preview_path.is_some() {
                eprintln!("no matching transfer function in {}", input_path);
                std::process::exit(1);
            }
            return;
        }
    };

    if let Some((lo, hi)) = query {
        let max = tf.max_opacity_in_range(lo, hi);
        let min = tf.min_opacity_in_range(lo, hi);
        let verdict = if max < SKIP_THRESHOLD { "skip" } else { "march" };
        println!("{} [{}, {}]: opacity in [{}, {}] -> {}", tf.id(), lo, hi, min, max, verdict);
    }

    if let Some(path) = preview_path {
        let (width, height) = size;
        let table = tf.snapshot();
        let image = exr_utils::transfer_function_preview(tf, &table, width, height);
        if let Err(e) = exr_utils::write_exr_to_file(&image, width, height, &path) {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
