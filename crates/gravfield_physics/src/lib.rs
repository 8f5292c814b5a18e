pub mod diagnostics;
pub mod field;
pub mod forces;
pub mod integrator;
pub mod procgen;

pub use field::{FieldRasterizer, colormap, rasterize_field};
pub use forces::{ForceModel, ForceSummation, NetForce, force, guard_finite, summation_for};
pub use integrator::{Integrator, StepStats, step};
pub use procgen::initialize;
