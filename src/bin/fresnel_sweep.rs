use translucent::core::config_loader::load_config;
use translucent::materials::boundary::{lookup_ior, BoundaryMaterial};
use translucent::materials::optics::fresnel_dielectric_ex;
use translucent::math::constants::{Float, PI};

fn parse_material(args: &[String]) -> Result<BoundaryMaterial, String> {
    match args[1].as_str() {
        "--ior" => {
            let name = args.get(2).ok_or("missing ior")?;
            let ior = name
                .parse::<Float>()
                .ok()
                .or_else(|| lookup_ior(name))
                .ok_or_else(|| format!("unknown ior: {}", name))?;
            Ok(BoundaryMaterial::dielectric(1.0, ior))
        }
        path => {
            let id = args.get(2).ok_or("missing material id")?;
            let config = load_config(path).map_err(|e| format!("failed to load {}: {}", path, e))?;
            config
                .material(id)
                .copied()
                .ok_or_else(|| format!("no material {} in {}", id, path))
        }
    }
}

fn print_sweep(label: &str, material: &BoundaryMaterial, steps: usize) {
    println!("# {}", label);
    println!("{:>8} {:>8} {:>10} {:>10} {:>10} {:>10}", "deg", "cos_i", "R.r", "R.g", "R.b", "cos_t");
    for s in 0..=steps {
        let theta = 0.5 * PI * s as Float / steps as Float;
        let cos_i = theta.cos().max(0.0);
        let r = material.reflectance(cos_i);
        let cos_t = match material.relative_eta() {
            Some(eta) => format!("{:10.6}", fresnel_dielectric_ex(cos_i, eta).1),
            None => format!("{:>10}", "-"),
        };
        println!("{:8.2} {:8.5} {:10.6} {:10.6} {:10.6} {}", theta * 180.0 / PI, cos_i, r.x, r.y, r.z, cos_t);
    }
}

// Config loading reports through `log`; default to info like the main binary.
fn init_logger() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    let _ = env_logger::try_init();
}

fn main() {
    init_logger();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} (--ior NAME|VALUE | <config.xml> <material-id>) [--steps N]", args[0]);
        std::process::exit(1);
    }

    let material = match parse_material(&args) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let steps = match args.iter().position(|a| a == "--steps") {
        Some(i) => args.get(i + 1).and_then(|v| v.parse::<usize>().ok()).unwrap_or(18),
        None => 18,
    }
    .max(1);

    print_sweep("entering", &material, steps);
    if !material.is_conductor() {
        print_sweep("leaving", &material.flipped(), steps);
    }
}
