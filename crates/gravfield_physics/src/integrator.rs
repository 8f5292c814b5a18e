use gravfield_core::{Particle, ParticleSystem, PhysicsConfig, ReflectBoundary, Result, Vector2};
use log::debug;

use crate::forces::{ForceModel, ForceSummation, guard_finite, summation_for};

/// What happened during one step, for logging and the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepStats {
    /// Non-finite pair forces or accelerations replaced by zero
    pub guarded: usize,
    /// Wall bounces applied
    pub reflections: usize,
}

/// Semi-implicit Euler stepper.
///
/// Every free particle reads the same (previous) generation; the next
/// generation is written to a fresh vector. Velocity is updated first and
/// the new velocity moves the position.
pub struct Integrator {
    config: PhysicsConfig,
    model: ForceModel,
    summation: &'static dyn ForceSummation,
}

impl Integrator {
    pub fn new(config: PhysicsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            model: ForceModel::from_config(&config),
            summation: summation_for(config.backend),
            config,
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn step(&self, system: &ParticleSystem) -> ParticleSystem {
        self.step_with_stats(system).0
    }

    pub fn step_with_stats(&self, system: &ParticleSystem) -> (ParticleSystem, StepStats) {
        let net = self.summation.net_forces(&self.model, system.particles());
        let mut stats = StepStats {
            guarded: net.iter().map(|n| n.guarded).sum(),
            reflections: 0,
        };

        let dt = self.config.dt;
        let mut forces = net.iter();
        let next = system.next_generation(|p| {
            let f = forces.next().map(|n| n.force).unwrap_or(Vector2::ZERO);
            if p.fixed {
                return *p;
            }

            let (acceleration, guarded) = guard_finite(f / p.mass, Vector2::ZERO);
            if guarded {
                stats.guarded += 1;
            }

            let mut velocity = p.velocity + acceleration * dt;
            let mut position = p.position + velocity * dt;
            if let Some(boundary) = &self.config.boundary {
                stats.reflections += reflect(boundary, &mut position, &mut velocity);
            }

            Particle {
                position,
                velocity,
                ..*p
            }
        });

        if stats.guarded > 0 {
            debug!(
                "generation {}: {} non-finite contributions replaced by zero",
                next.generation(),
                stats.guarded
            );
        }

        (next, stats)
    }
}

/// Bounce a particle that left `[0, width] x [0, height]`.
///
/// The offending velocity component is reversed and scaled by the
/// restitution; the position is placed `nudge` inside the crossed wall.
/// Returns the number of walls hit (0 to 2).
fn reflect(boundary: &ReflectBoundary, position: &mut Vector2, velocity: &mut Vector2) -> usize {
    let mut hits = 0;

    if position.x > boundary.width {
        velocity.x = -boundary.restitution * velocity.x;
        position.x = boundary.width - boundary.nudge;
        hits += 1;
    } else if position.x < 0.0 {
        velocity.x = -boundary.restitution * velocity.x;
        position.x = boundary.nudge;
        hits += 1;
    }

    if position.y > boundary.height {
        velocity.y = -boundary.restitution * velocity.y;
        position.y = boundary.height - boundary.nudge;
        hits += 1;
    } else if position.y < 0.0 {
        velocity.y = -boundary.restitution * velocity.y;
        position.y = boundary.nudge;
        hits += 1;
    }

    hits
}

/// Advance `system` by one step of `config.dt`
pub fn step(system: &ParticleSystem, config: &PhysicsConfig) -> Result<ParticleSystem> {
    Ok(Integrator::new(*config)?.step(system))
}
