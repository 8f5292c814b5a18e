use gravfield_core::{Backend, Particle, PhysicsConfig, Vector2};
use rayon::prelude::*;

/// Pairwise gravitational force law.
///
/// `magnitude = G * m_a * m_b / (r² + softening)`, optionally capped,
/// directed along `d / sqrt(r² + direction_epsilon)` where `d` points from
/// `a` to `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceModel {
    pub gravity: f64,
    pub softening: f64,
    pub direction_epsilon: f64,
    /// Upper bound on the magnitude; the dynamics model leaves this `None`
    pub cap: Option<f64>,
}

impl ForceModel {
    pub fn new(gravity: f64, softening: f64) -> Self {
        Self {
            gravity,
            softening,
            direction_epsilon: 0.0,
            cap: None,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self {
            gravity: config.gravity,
            softening: config.softening,
            direction_epsilon: config.direction_epsilon,
            cap: None,
        }
    }

    /// Same law with the magnitude clamped to `cap`
    pub fn capped(self, cap: f64) -> Self {
        Self {
            cap: Some(cap),
            ..self
        }
    }

    pub fn magnitude(&self, mass_a: f64, mass_b: f64, dist_sq: f64) -> f64 {
        // m_a * m_b first so swapping the pair gives bit-identical magnitudes
        let magnitude = self.gravity * (mass_a * mass_b) / (dist_sq + self.softening);
        match self.cap {
            Some(cap) => magnitude.min(cap),
            None => magnitude,
        }
    }

    /// Force on the particle at `pos_a` due to the particle at `pos_b`
    pub fn force(&self, mass_a: f64, mass_b: f64, pos_a: Vector2, pos_b: Vector2) -> Vector2 {
        let d = pos_a.distance_vector(pos_b);
        let dist_sq = d.length_squared();
        let direction = d / (dist_sq + self.direction_epsilon).sqrt();
        direction * self.magnitude(mass_a, mass_b, dist_sq)
    }

    /// Acceleration a unit test mass at `point` feels from `mass` at `source`
    pub fn acceleration_at(&self, point: Vector2, mass: f64, source: Vector2) -> Vector2 {
        self.force(1.0, mass, point, source)
    }
}

/// Force on a particle of `mass_a` at `pos_a` due to `mass_b` at `pos_b`
pub fn force(
    gravity: f64,
    mass_a: f64,
    mass_b: f64,
    pos_a: Vector2,
    pos_b: Vector2,
    softening: f64,
) -> Vector2 {
    ForceModel::new(gravity, softening).force(mass_a, mass_b, pos_a, pos_b)
}

/// Replace a non-finite vector with `fallback`.
///
/// Returns the vector to use and whether the fallback was taken.
pub fn guard_finite(v: Vector2, fallback: Vector2) -> (Vector2, bool) {
    if v.is_finite() { (v, false) } else { (fallback, true) }
}

/// Net force on one particle, plus how many pair contributions were
/// non-finite and dropped
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NetForce {
    pub force: Vector2,
    pub guarded: usize,
}

/// Sum the pairwise forces on particle `i` from every other particle.
///
/// Contributions are added in slice order; a non-finite pair force (e.g.
/// coincident positions with no direction epsilon) contributes zero.
pub fn net_force_on(model: &ForceModel, particles: &[Particle], i: usize) -> NetForce {
    let p = &particles[i];
    let mut net = NetForce::default();
    for q in particles {
        if q.id == p.id {
            continue;
        }
        let (f, guarded) = guard_finite(model.force(p.mass, q.mass, p.position, q.position), Vector2::ZERO);
        if guarded {
            net.guarded += 1;
        }
        net.force.accumulate(f);
    }
    net
}

/// Strategy for the O(n²) force reduction.
///
/// Fixed particles get a zero `NetForce`; nobody reads it.
pub trait ForceSummation: Send + Sync {
    fn net_forces(&self, model: &ForceModel, particles: &[Particle]) -> Vec<NetForce>;
}

/// Single-threaded summation
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialSummation;

impl ForceSummation for SerialSummation {
    fn net_forces(&self, model: &ForceModel, particles: &[Particle]) -> Vec<NetForce> {
        (0..particles.len())
            .map(|i| {
                if particles[i].fixed {
                    NetForce::default()
                } else {
                    net_force_on(model, particles, i)
                }
            })
            .collect()
    }
}

/// One rayon task per particle.
///
/// Each particle's contributions are still summed in slice order, so the
/// result is bit-identical to [`SerialSummation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParallelSummation;

impl ForceSummation for ParallelSummation {
    fn net_forces(&self, model: &ForceModel, particles: &[Particle]) -> Vec<NetForce> {
        (0..particles.len())
            .into_par_iter()
            .map(|i| {
                if particles[i].fixed {
                    NetForce::default()
                } else {
                    net_force_on(model, particles, i)
                }
            })
            .collect()
    }
}

pub fn summation_for(backend: Backend) -> &'static dyn ForceSummation {
    match backend {
        Backend::Serial => &SerialSummation,
        Backend::Parallel => &ParallelSummation,
    }
}
