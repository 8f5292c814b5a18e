use gravfield_core::{ParticleSystem, Vector2};

/// Total kinetic energy `Σ ½ m v²`
pub fn kinetic_energy(system: &ParticleSystem) -> f64 {
    system.iter().map(|p| p.kinetic_energy()).sum()
}

/// Pairwise potential energy `Σ -G m_i m_j / sqrt(r² + softening)`.
///
/// Each unordered pair is counted once. This is the exact potential of the
/// force law only when softening is zero.
pub fn potential_energy(system: &ParticleSystem, gravity: f64, softening: f64) -> f64 {
    let particles = system.particles();
    let mut total = 0.0;
    for (i, a) in particles.iter().enumerate() {
        for b in &particles[i + 1..] {
            let dist_sq = a.position.distance_vector(b.position).length_squared();
            let r = (dist_sq + softening).sqrt();
            if r > 0.0 {
                total -= gravity * a.mass * b.mass / r;
            }
        }
    }
    total
}

pub fn total_energy(system: &ParticleSystem, gravity: f64, softening: f64) -> f64 {
    kinetic_energy(system) + potential_energy(system, gravity, softening)
}

/// Sum of particle speeds, the figure shown in the overlay
pub fn velocity_sum(system: &ParticleSystem) -> f64 {
    system.iter().map(|p| p.speed()).sum()
}

/// Mass-weighted mean position, `None` for an empty system
pub fn center_of_mass(system: &ParticleSystem) -> Option<Vector2> {
    let mass: f64 = system.iter().map(|p| p.mass).sum();
    if system.is_empty() || mass <= 0.0 {
        return None;
    }
    let weighted = system
        .iter()
        .fold(Vector2::ZERO, |acc, p| acc + p.position * p.mass);
    Some(weighted / mass)
}

pub fn max_speed(system: &ParticleSystem) -> f64 {
    system.iter().map(|p| p.speed()).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use gravfield_core::SystemBuilder;

    fn pair() -> ParticleSystem {
        let mut builder = SystemBuilder::new();
        builder.add(2.0, Vector2::new(0.0, 0.0), Vector2::new(3.0, 4.0));
        builder.add_fixed(6.0, Vector2::new(4.0, 0.0));
        builder.build().unwrap()
    }

    #[test]
    fn test_energies() {
        let system = pair();
        assert_eq!(kinetic_energy(&system), 25.0);
        // -1 * 2 * 6 / sqrt(16 + 9)
        assert_relative_eq!(potential_energy(&system, 1.0, 9.0), -12.0 / 5.0);
        assert_relative_eq!(total_energy(&system, 1.0, 9.0), 25.0 - 2.4);
    }

    #[test]
    fn test_velocity_sum_and_max_speed() {
        let system = pair();
        assert_eq!(velocity_sum(&system), 5.0);
        assert_eq!(max_speed(&system), 5.0);
    }

    #[test]
    fn test_center_of_mass() {
        assert_eq!(center_of_mass(&pair()), Some(Vector2::new(3.0, 0.0)));
        assert_eq!(center_of_mass(&ParticleSystem::empty()), None);
    }
}
