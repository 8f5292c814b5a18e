use bevy::prelude::*;
use gravfield_core::{FieldImage, FieldSources, ParticleSystem, Result, SimConfig};
use gravfield_physics::diagnostics;
use gravfield_physics::field::FieldRasterizer;
use gravfield_physics::integrator::{Integrator, StepStats};
use gravfield_physics::procgen;

/// The running simulation, tracked as a Bevy Resource.
///
/// Owns the current generation of particles and the last good field image.
/// Every tick replaces the generation wholesale; nothing else writes to it.
#[derive(Resource)]
pub struct Simulation {
    config: SimConfig,
    system: ParticleSystem,
    integrator: Integrator,
    rasterizer: FieldRasterizer,
    field: FieldImage,
    /// Incremented each time `field` is replaced (render uses this)
    field_generation: u64,
    /// Tick at which `field` was computed
    field_tick: u64,
    tick_count: u64,
    paused: bool,
    /// Stats of the most recent step
    last_step: StepStats,
}

impl Simulation {
    /// Generate the scene and compute its initial field
    pub fn create(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let system = procgen::initialize(&config.scene)?;
        let integrator = Integrator::new(config.physics)?;
        let rasterizer = FieldRasterizer::new(config.field)?;
        let field = rasterizer.rasterize(&system)?;

        if config.field.sources == FieldSources::All && config.field.refresh_interval.is_none() {
            warn!("Field includes moving particles but is never refreshed; it will go stale");
        }
        info!(
            "Simulation created: {} particles, field {}x{}, {} ticks per frame",
            system.len(),
            field.width,
            field.height,
            config.ticks_per_frame
        );

        Ok(Self {
            config,
            system,
            integrator,
            rasterizer,
            field,
            field_generation: 0,
            field_tick: 0,
            tick_count: 0,
            paused: false,
            last_step: StepStats::default(),
        })
    }

    /// Advance one frame: `ticks_per_frame` steps, then a field refresh if
    /// one is due. Does nothing while paused.
    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        for _ in 0..self.config.ticks_per_frame {
            self.step_once();
        }
        if self.field_due() {
            self.refresh_field();
        }
    }

    /// Run a single integrator step regardless of pause state
    pub fn step_once(&mut self) -> StepStats {
        let (next, stats) = self.integrator.step_with_stats(&self.system);
        self.system = next;
        self.tick_count += 1;
        self.last_step = stats;
        stats
    }

    /// Whether the refresh schedule asks for a new field now
    pub fn field_due(&self) -> bool {
        match self.config.field.refresh_interval {
            Some(interval) => self.tick_count - self.field_tick >= interval,
            None => false,
        }
    }

    /// Recompute the field from the current generation.
    ///
    /// On failure the previous image is kept and `false` is returned.
    pub fn refresh_field(&mut self) -> bool {
        match self.rasterizer.rasterize(&self.system) {
            Ok(field) => {
                self.field = field;
                self.field_generation += 1;
                self.field_tick = self.tick_count;
                true
            }
            Err(e) => {
                warn!("Field refresh at tick {} failed, keeping previous image: {}", self.tick_count, e);
                // retry on the next interval rather than every frame
                self.field_tick = self.tick_count;
                false
            }
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn system(&self) -> &ParticleSystem {
        &self.system
    }

    pub fn field(&self) -> &FieldImage {
        &self.field
    }

    pub fn field_generation(&self) -> u64 {
        self.field_generation
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn last_step(&self) -> StepStats {
        self.last_step
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            info!("Simulation {} at tick {}", if paused { "paused" } else { "resumed" }, self.tick_count);
        }
        self.paused = paused;
    }

    /// Sum of particle speeds
    pub fn velocity_sum(&self) -> f64 {
        diagnostics::velocity_sum(&self.system)
    }

    /// Kinetic plus potential energy under the configured dynamics
    pub fn total_energy(&self) -> f64 {
        let physics = self.integrator.config();
        diagnostics::total_energy(&self.system, physics.gravity, physics.softening)
    }

    /// End the run, handing back the final generation
    pub fn dispose(self) -> ParticleSystem {
        info!("Simulation disposed after {} ticks", self.tick_count);
        self.system
    }
}
