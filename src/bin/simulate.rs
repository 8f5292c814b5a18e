//! Headless run of a scene: step it, report diagnostics, optionally
//! summarise the field raster.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gravfield_core::{FieldGrid, SimConfig};
use gravfield_physics::diagnostics;
use gravfield_physics::field::FieldRasterizer;
use gravfield_sim::Simulation;
use log::info;

#[derive(Parser, Debug)]
#[command(about = "Run a gravfield scene without a window")]
struct Args {
    /// YAML scene file; the built-in two-galaxy scene when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Number of integrator steps
    #[arg(short, long, default_value_t = 1000)]
    ticks: u64,

    /// Print diagnostics every this many steps (0 = only at the end)
    #[arg(short, long, default_value_t = 100)]
    report_every: u64,

    /// Rasterize the field of the final state and print its statistics
    #[arg(short, long)]
    field: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let file = File::open(path).with_context(|| format!("cannot open scene {}", path.display()))?;
    let config: SimConfig = serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("cannot parse scene {}", path.display()))?;
    info!("Loaded scene from {}", path.display());
    Ok(config)
}

fn report(simulation: &Simulation) {
    let system = simulation.system();
    let physics = &simulation.config().physics;
    let com = diagnostics::center_of_mass(system)
        .map(|c| format!("({:.2}, {:.2})", c.x, c.y))
        .unwrap_or_else(|| "-".to_string());

    println!(
        "tick {:>7} | velocity sum {:>12.4} | kinetic {:>14.4} | total {:>14.4} | max speed {:>9.4} | com {}",
        simulation.tick_count(),
        diagnostics::velocity_sum(system),
        diagnostics::kinetic_energy(system),
        diagnostics::total_energy(system, physics.gravity, physics.softening),
        diagnostics::max_speed(system),
        com,
    );
}

fn print_field_summary(grid: &FieldGrid) {
    let cells = grid.values.len().max(1) as f64;
    let min = grid.values.iter().copied().fold(f64::INFINITY, f64::min);
    let mean = grid.values.iter().sum::<f64>() / cells;
    println!(
        "field {}x{} | min {:.6} | mean {:.6} | max {:.6}",
        grid.width,
        grid.height,
        min,
        mean,
        grid.max()
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = load_config(args.scene.as_ref())?;
    // steps are driven one at a time below
    config.ticks_per_frame = 1;

    let mut simulation = Simulation::create(config).context("invalid scene")?;
    report(&simulation);

    for _ in 0..args.ticks {
        simulation.tick();
        if args.report_every > 0 && simulation.tick_count() % args.report_every == 0 {
            report(&simulation);
        }
    }
    if args.report_every == 0 || args.ticks % args.report_every != 0 {
        report(&simulation);
    }

    if args.field {
        let rasterizer = FieldRasterizer::new(simulation.config().field)?;
        print_field_summary(&rasterizer.intensity_grid(simulation.system()));
        let image = rasterizer.rasterize(simulation.system())?;
        println!("field image: {} bytes RGBA8", image.as_bytes().len());
    }

    let system = simulation.dispose();
    info!("Finished at generation {} with {} particles", system.generation(), system.len());
    Ok(())
}
