use std::f64::consts::TAU;

use gravfield_core::*;
use log::info;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Build the initial population for a scene.
///
/// Explicit bodies come first, then every galaxy in order. All galaxies share
/// one id counter and one RNG stream seeded from `scene.seed`, so the same
/// config always produces the same system.
pub fn initialize(scene: &SceneConfig) -> Result<ParticleSystem> {
    scene.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(scene.seed);
    let mut builder = SystemBuilder::with_capacity(scene.particle_count());

    for body in &scene.bodies {
        if body.fixed {
            builder.add_fixed(body.mass, body.position);
        } else {
            builder.add(body.mass, body.position, body.velocity);
        }
    }

    for galaxy in &scene.galaxies {
        add_galaxy(&mut builder, galaxy, scene.gravity, &mut rng);
    }

    let system = builder.build()?;
    info!(
        "Initialized scene: {} particles ({} fixed) from {} galaxies, seed {}",
        system.len(),
        system.fixed().count(),
        scene.galaxies.len(),
        scene.seed
    );
    Ok(system)
}

/// Sample a uniform disk of free particles around `galaxy.center`, then
/// append the fixed central mass
pub fn add_galaxy(builder: &mut SystemBuilder, galaxy: &GalaxyConfig, gravity: f64, rng: &mut impl Rng) {
    for _ in 0..galaxy.count {
        // sqrt keeps the areal density uniform
        let r = galaxy.radius * rng.gen_range(0.0..1.0f64).sqrt();
        let theta = rng.gen_range(0.0..TAU);
        let offset = Vector2::new(r * theta.sin(), r * theta.cos());
        let position = galaxy.center + offset;

        let speed = match galaxy.velocity {
            VelocityPolicy::RandomFactor => rng.gen_range(0.0..1.0f64) * galaxy.orbital_speed_factor,
            VelocityPolicy::CircularOrbit => circular_speed(gravity, enclosed_mass(galaxy, r), r),
        };
        let velocity = offset
            .perpendicular()
            .try_normalized()
            .map(|dir| dir * speed)
            .unwrap_or(Vector2::ZERO);

        builder.add(galaxy.particle_mass, position, velocity);
    }

    builder.add_fixed(galaxy.central_mass, galaxy.center);
}

/// Mass inside radius `r` of a galaxy: the centre plus a uniform disk share
pub fn enclosed_mass(galaxy: &GalaxyConfig, r: f64) -> f64 {
    let fraction = (r / galaxy.radius).powi(2).min(1.0);
    galaxy.central_mass + galaxy.count as f64 * galaxy.particle_mass * fraction
}

/// Speed of a circular orbit of radius `r` around `mass`
pub fn circular_speed(gravity: f64, mass: f64, r: f64) -> f64 {
    if r <= 0.0 {
        return 0.0;
    }
    (gravity * mass / r).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn galaxy(velocity: VelocityPolicy) -> GalaxyConfig {
        GalaxyConfig {
            count: 200,
            center: Vector2::new(100.0, -50.0),
            radius: 80.0,
            central_mass: 5000.0,
            velocity,
            ..GalaxyConfig::default()
        }
    }

    #[test]
    fn test_galaxy_layout() {
        let scene = SceneConfig {
            galaxies: vec![galaxy(VelocityPolicy::RandomFactor)],
            ..SceneConfig::default()
        };
        let system = initialize(&scene).unwrap();
        assert_eq!(system.len(), 201);

        let center = system.particles()[200];
        assert!(center.fixed);
        assert_eq!(center.mass, 5000.0);
        assert_eq!(center.position, Vector2::new(100.0, -50.0));

        for p in &system.particles()[..200] {
            assert!(!p.fixed);
            assert_eq!(p.mass, 1.0);
            let offset = p.position - center.position;
            assert!(offset.length() <= 80.0 + 1e-9);
            assert!(p.speed() <= 10.0 + 1e-9);
            // tangential
            assert!(offset.dot(p.velocity).abs() < 1e-6);
        }
    }

    #[test]
    fn test_ids_continue_across_galaxies() {
        let mut second = galaxy(VelocityPolicy::RandomFactor);
        second.count = 10;
        let scene = SceneConfig {
            bodies: vec![BodyConfig::default()],
            galaxies: vec![galaxy(VelocityPolicy::RandomFactor), second],
            ..SceneConfig::default()
        };
        let system = initialize(&scene).unwrap();
        assert_eq!(system.len(), scene.particle_count());
        for (i, p) in system.iter().enumerate() {
            assert_eq!(p.id, i as u64);
        }
        assert_eq!(system.fixed().count(), 2);
    }

    #[test]
    fn test_same_seed_same_system() {
        let scene = SceneConfig::default();
        assert_eq!(initialize(&scene).unwrap(), initialize(&scene).unwrap());

        let other = SceneConfig {
            seed: scene.seed + 1,
            ..scene.clone()
        };
        assert_ne!(initialize(&scene).unwrap(), initialize(&other).unwrap());
    }

    #[test]
    fn test_circular_orbit_policy() {
        // the random-speed factor must not leak into circular orbits
        let g = GalaxyConfig {
            orbital_speed_factor: 10.0,
            ..galaxy(VelocityPolicy::CircularOrbit)
        };
        let scene = SceneConfig {
            gravity: 2.0,
            galaxies: vec![g.clone()],
            ..SceneConfig::default()
        };
        let system = initialize(&scene).unwrap();
        for p in system.iter().filter(|p| !p.fixed) {
            let r = (p.position - g.center).length();
            assert_relative_eq!(
                p.speed(),
                circular_speed(2.0, enclosed_mass(&g, r), r),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_circular_speed() {
        assert_relative_eq!(circular_speed(1.0, 1000.0, 100.0), 10.0f64.sqrt());
        assert_eq!(circular_speed(1.0, 1000.0, 0.0), 0.0);
    }

    #[test]
    fn test_invalid_galaxy_rejected() {
        let scene = SceneConfig {
            galaxies: vec![GalaxyConfig {
                count: 0,
                ..GalaxyConfig::default()
            }],
            ..SceneConfig::default()
        };
        assert_eq!(initialize(&scene), Err(GravfieldError::EmptyGalaxy));

        let scene = SceneConfig {
            galaxies: vec![GalaxyConfig {
                radius: 0.0,
                ..GalaxyConfig::default()
            }],
            ..SceneConfig::default()
        };
        assert!(initialize(&scene).is_err());
    }

    #[test]
    fn test_invalid_body_rejected() {
        let scene = SceneConfig {
            bodies: vec![BodyConfig {
                mass: -1.0,
                ..BodyConfig::default()
            }],
            galaxies: Vec::new(),
            ..SceneConfig::default()
        };
        assert!(matches!(
            initialize(&scene),
            Err(GravfieldError::NonPositiveMass { .. })
        ));
    }
}
