pub mod pipeline;
pub mod simulation;

pub use pipeline::SimulationPlugin;
pub use simulation::Simulation;
