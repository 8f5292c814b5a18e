use std::collections::HashMap;

use crate::error::{GravfieldError, Result};
use crate::types::{Particle, ParticleId};
use crate::vector::Vector2;

/// One generation of the simulated population.
///
/// Particles keep their insertion order; ids are unique and the population
/// is fixed for the lifetime of a run. Later generations are produced with
/// [`ParticleSystem::next_generation`] into a fresh vector, never by
/// mutating a generation that is still being read.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    index: HashMap<ParticleId, usize>,
    generation: u64,
}

impl ParticleSystem {
    /// Validate and wrap an initial population
    pub fn from_particles(particles: Vec<Particle>) -> Result<Self> {
        let mut index = HashMap::with_capacity(particles.len());
        for (i, p) in particles.iter().enumerate() {
            validate_particle(p)?;
            if index.insert(p.id, i).is_some() {
                return Err(GravfieldError::DuplicateId(p.id));
            }
        }
        Ok(Self {
            particles,
            index,
            generation: 0,
        })
    }

    pub fn empty() -> Self {
        Self {
            particles: Vec::new(),
            index: HashMap::new(),
            generation: 0,
        }
    }

    /// Build the next generation by mapping every particle of this one.
    ///
    /// `f` sees the untouched previous generation and must keep the id.
    pub fn next_generation(&self, f: impl FnMut(&Particle) -> Particle) -> Self {
        let particles: Vec<Particle> = self.particles.iter().map(f).collect();
        debug_assert!(
            self.particles.iter().zip(&particles).all(|(a, b)| a.id == b.id),
            "particle ids changed between generations"
        );
        Self {
            particles,
            index: self.index.clone(),
            generation: self.generation + 1,
        }
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.index.get(&id).map(|&i| &self.particles[i])
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    /// Anchors only
    pub fn fixed(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter().filter(|p| p.fixed)
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Number of steps applied since initialization
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn into_particles(self) -> Vec<Particle> {
        self.particles
    }
}

fn validate_particle(p: &Particle) -> Result<()> {
    if !(p.mass.is_finite() && p.mass > 0.0) {
        return Err(GravfieldError::NonPositiveMass {
            id: Some(p.id),
            mass: p.mass,
        });
    }
    if !p.position.is_finite() {
        return Err(GravfieldError::InvalidParameter {
            name: "position",
            value: if p.position.x.is_finite() { p.position.y } else { p.position.x },
        });
    }
    if !p.velocity.is_finite() {
        return Err(GravfieldError::InvalidParameter {
            name: "velocity",
            value: if p.velocity.x.is_finite() { p.velocity.y } else { p.velocity.x },
        });
    }
    Ok(())
}

/// Accumulates particles with a continuing id counter.
///
/// Several scenes (galaxies) can be composed by adding them to one builder;
/// ids keep counting across them.
#[derive(Debug, Default)]
pub struct SystemBuilder {
    particles: Vec<Particle>,
    next_id: ParticleId,
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
            next_id: 0,
        }
    }

    /// Add a free particle, returning its id
    pub fn add(&mut self, mass: f64, position: Vector2, velocity: Vector2) -> ParticleId {
        let id = self.take_id();
        self.particles.push(Particle::new(id, mass, position, velocity));
        id
    }

    /// Add a fixed particle at rest, returning its id
    pub fn add_fixed(&mut self, mass: f64, position: Vector2) -> ParticleId {
        let id = self.take_id();
        self.particles.push(Particle::anchor(id, mass, position));
        id
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn build(self) -> Result<ParticleSystem> {
        ParticleSystem::from_particles(self.particles)
    }

    fn take_id(&mut self) -> ParticleId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_ids_continue() {
        let mut builder = SystemBuilder::new();
        let a = builder.add(1.0, Vector2::new(1.0, 0.0), Vector2::ZERO);
        let b = builder.add_fixed(100.0, Vector2::ZERO);
        let c = builder.add(1.0, Vector2::new(0.0, 1.0), Vector2::ZERO);
        assert_eq!((a, b, c), (0, 1, 2));

        let system = builder.build().unwrap();
        assert_eq!(system.len(), 3);
        assert!(system.get(b).unwrap().fixed);
        assert_eq!(system.fixed().count(), 1);
        assert_eq!(system.generation(), 0);
    }

    #[test]
    fn test_rejects_non_positive_mass() {
        let mut builder = SystemBuilder::new();
        builder.add(0.0, Vector2::ZERO, Vector2::ZERO);
        assert_eq!(
            builder.build(),
            Err(GravfieldError::NonPositiveMass { id: Some(0), mass: 0.0 })
        );
    }

    #[test]
    fn test_rejects_nan_position() {
        let p = Particle::new(0, 1.0, Vector2::new(f64::NAN, 0.0), Vector2::ZERO);
        assert!(matches!(
            ParticleSystem::from_particles(vec![p]),
            Err(GravfieldError::InvalidParameter { name: "position", .. })
        ));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let p = Particle::new(3, 1.0, Vector2::ZERO, Vector2::ZERO);
        assert_eq!(
            ParticleSystem::from_particles(vec![p, p]),
            Err(GravfieldError::DuplicateId(3))
        );
    }

    #[test]
    fn test_next_generation_keeps_index_and_bumps_generation() {
        let mut builder = SystemBuilder::new();
        builder.add(1.0, Vector2::ZERO, Vector2::new(1.0, 0.0));
        builder.add_fixed(5.0, Vector2::new(10.0, 0.0));
        let system = builder.build().unwrap();

        let next = system.next_generation(|p| Particle {
            position: p.position + p.velocity,
            ..*p
        });

        assert_eq!(next.generation(), 1);
        assert_eq!(next.get(0).unwrap().position, Vector2::new(1.0, 0.0));
        assert_eq!(next.get(1).unwrap().position, Vector2::new(10.0, 0.0));
        // previous generation untouched
        assert_eq!(system.get(0).unwrap().position, Vector2::ZERO);
    }
}
