use bevy::prelude::*;

use super::simulation::Simulation;

/// Bevy plugin for the simulation pipeline
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, simulation_tick.run_if(resource_exists::<Simulation>));
    }
}

/// One frame: `ticks_per_frame` integrator steps plus any due field refresh
fn simulation_tick(mut simulation: ResMut<Simulation>) {
    simulation.tick();
}
