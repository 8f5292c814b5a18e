use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use bevy::prelude::*;
use bevy::window::WindowResolution;
use clap::Parser;
use gravfield_core::SimConfig;
use gravfield_render::GravfieldRenderPlugin;
use gravfield_sim::{Simulation, SimulationPlugin};

#[derive(Parser, Debug)]
#[command(about = "Watch a gravfield scene")]
struct Args {
    /// YAML scene file; the built-in two-galaxy scene when omitted
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Label every particle with its position and velocity
    #[arg(short, long)]
    labels: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = match &args.scene {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("cannot open scene {}", path.display()))?;
            serde_yaml::from_reader::<_, SimConfig>(BufReader::new(file))
                .with_context(|| format!("cannot parse scene {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    config.show_labels |= args.labels;

    let (width, height) = (config.field.width as f32, config.field.height as f32);
    let simulation = Simulation::create(config).context("failed to create simulation")?;

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "gravfield".into(),
                // one raster cell per physical pixel
                resolution: WindowResolution::new(width, height).with_scale_factor_override(1.0),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::WHITE))
        .insert_resource(simulation)
        .add_plugins(SimulationPlugin)
        .add_plugins(GravfieldRenderPlugin)
        .run();

    Ok(())
}
