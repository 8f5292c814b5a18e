//! Configuration types for scenes, dynamics and the field raster.
//!
//! Every type is `serde`-deserializable with defaults for missing fields, so
//! a scene file only needs to name what it changes:
//!
//! ```yaml
//! scene:
//!   seed: 7
//!   gravity: 1.0
//!   bodies:
//!     - { mass: 1000.0, position: { x: 250.0, y: 250.0 }, fixed: true }
//! physics:
//!   gravity: 1.0
//!   softening: 0.0
//!   boundary: { width: 500.0, height: 500.0 }
//! field:
//!   sources: all
//!   refresh_interval: 10
//! ```
//!
//! Softening and field-source selection are deliberately plain settings:
//! different scenes need different values and none is "the" physical one.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{GravfieldError, Result, ensure_finite, ensure_non_negative, ensure_positive};
use crate::vector::Vector2;

/// How the tangential speed of a sampled disk particle is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityPolicy {
    /// `speed = U[0, 1) * orbital_speed_factor`
    #[default]
    RandomFactor,
    /// `speed = sqrt(G * enclosed_mass / r)`; the speed factor is ignored
    CircularOrbit,
}

/// A disk of free particles around one fixed central mass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalaxyConfig {
    pub count: u32,
    pub center: Vector2,
    pub radius: f64,
    pub central_mass: f64,
    /// Mass of each disk particle
    pub particle_mass: f64,
    /// Upper bound of the random speed under `VelocityPolicy::RandomFactor`
    pub orbital_speed_factor: f64,
    pub velocity: VelocityPolicy,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            count: 100,
            center: Vector2::ZERO,
            radius: 512.0,
            central_mass: 20_000.0,
            particle_mass: 1.0,
            orbital_speed_factor: ORBITAL_SPEED_FACTOR,
            velocity: VelocityPolicy::RandomFactor,
        }
    }
}

impl GalaxyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(GravfieldError::EmptyGalaxy);
        }
        for (name, m) in [("central_mass", self.central_mass), ("particle_mass", self.particle_mass)] {
            if !(m.is_finite() && m > 0.0) {
                return Err(GravfieldError::InvalidParameter { name, value: m });
            }
        }
        ensure_finite("center.x", self.center.x)?;
        ensure_finite("center.y", self.center.y)?;
        ensure_positive("radius", self.radius)?;
        ensure_non_negative("orbital_speed_factor", self.orbital_speed_factor)
    }
}

/// A single explicitly placed particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub mass: f64,
    pub position: Vector2,
    pub velocity: Vector2,
    pub fixed: bool,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            mass: 1.0,
            position: Vector2::ZERO,
            velocity: Vector2::ZERO,
            fixed: false,
        }
    }
}

/// Initial scene: explicit bodies first, then each galaxy in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for deterministic disk sampling
    pub seed: u64,
    /// Used by `VelocityPolicy::CircularOrbit`
    pub gravity: f64,
    pub bodies: Vec<BodyConfig>,
    pub galaxies: Vec<GalaxyConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::two_galaxies(SURFACE_WIDTH, SURFACE_HEIGHT, SURFACE_SCALE)
    }
}

impl SceneConfig {
    /// Two colliding galaxies centred on a `width x height` pixel surface
    /// seen at `scale` pixels per world unit
    pub fn two_galaxies(width: u32, height: u32, scale: f64) -> Self {
        let cx = (width as f64 / scale).floor() / 2.0;
        let cy = (height as f64 / scale).floor() / 2.0;
        Self {
            seed: 42,
            gravity: G,
            bodies: Vec::new(),
            galaxies: vec![
                GalaxyConfig {
                    count: 100,
                    center: Vector2::new(cx + 1000.0, cy),
                    radius: 512.0,
                    central_mass: 20_000.0,
                    ..GalaxyConfig::default()
                },
                GalaxyConfig {
                    count: 100,
                    center: Vector2::new(cx - 500.0, cy),
                    radius: 700.0,
                    central_mass: 100_000.0,
                    ..GalaxyConfig::default()
                },
            ],
        }
    }

    /// Fixed mass 1000 at (250, 250) and a unit mass on a circular orbit of
    /// radius 100 around it
    pub fn single_orbit(gravity: f64) -> Self {
        let center = Vector2::new(250.0, 250.0);
        let radius = 100.0;
        let central_mass = 1000.0;
        let speed = (gravity * central_mass / radius).sqrt();
        Self {
            seed: 0,
            gravity,
            bodies: vec![
                BodyConfig {
                    mass: central_mass,
                    position: center,
                    fixed: true,
                    ..BodyConfig::default()
                },
                BodyConfig {
                    mass: 1.0,
                    position: Vector2::new(250.0, 250.0 - radius),
                    velocity: Vector2::new(-speed, 0.0),
                    fixed: false,
                },
            ],
            galaxies: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("scene.gravity", self.gravity)?;
        for galaxy in &self.galaxies {
            galaxy.validate()?;
        }
        Ok(())
    }

    /// Total particle count this scene produces
    pub fn particle_count(&self) -> usize {
        self.bodies.len()
            + self
                .galaxies
                .iter()
                .map(|g| g.count as usize + 1)
                .sum::<usize>()
    }
}

/// Execution strategy for the O(n²) force sum and the O(cells·n) raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Serial,
    /// Work-stealing thread pool, one task per particle / raster row
    #[default]
    Parallel,
}

/// Reflect particles off the walls of `[0, width] x [0, height]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectBoundary {
    pub width: f64,
    pub height: f64,
    pub restitution: f64,
    pub nudge: f64,
}

impl Default for ReflectBoundary {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH as f64,
            height: SURFACE_HEIGHT as f64,
            restitution: RESTITUTION,
            nudge: BOUNDARY_NUDGE,
        }
    }
}

impl ReflectBoundary {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("boundary.width", self.width)?;
        ensure_positive("boundary.height", self.height)?;
        ensure_non_negative("boundary.restitution", self.restitution)?;
        ensure_non_negative("boundary.nudge", self.nudge)?;
        if self.nudge * 2.0 > self.width.min(self.height) {
            return Err(GravfieldError::InvalidParameter {
                name: "boundary.nudge",
                value: self.nudge,
            });
        }
        Ok(())
    }
}

/// Dynamics parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f64,
    /// Added to the squared distance in the force magnitude
    pub softening: f64,
    /// Added to the squared distance when normalizing the direction.
    /// Zero keeps the direction exact; coincident particles then hit the
    /// non-finite guard instead.
    pub direction_epsilon: f64,
    pub dt: f64,
    /// Open domain when `None`
    pub boundary: Option<ReflectBoundary>,
    pub backend: Backend,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: G,
            softening: SOFTENING,
            direction_epsilon: 0.0,
            dt: DT,
            boundary: None,
            backend: Backend::Parallel,
        }
    }
}

impl PhysicsConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_finite("physics.gravity", self.gravity)?;
        ensure_non_negative("physics.softening", self.softening)?;
        ensure_non_negative("physics.direction_epsilon", self.direction_epsilon)?;
        ensure_positive("physics.dt", self.dt)?;
        if let Some(boundary) = &self.boundary {
            boundary.validate()?;
        }
        Ok(())
    }
}

/// Which particles contribute to the painted field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSources {
    /// Anchors only; they never move, so one raster stays valid
    #[default]
    FixedOnly,
    All,
}

/// Field raster parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Grid size in device pixels
    pub width: u32,
    pub height: u32,
    pub gravity: f64,
    /// World units to grid cells
    pub scale_factor: f64,
    /// Per-source intensity cap
    pub cap: f64,
    pub epsilon: f64,
    pub sources: FieldSources,
    /// Recompute every `n` ticks; `None` computes once at start-up.
    ///
    /// A dense raster costs `cells * sources` per refresh and dominates the
    /// frame budget when refreshed every tick.
    pub refresh_interval: Option<u64>,
    /// Intensity added for a NaN contribution
    pub nan_fallback: f64,
    pub backend: Backend,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            gravity: G,
            scale_factor: SURFACE_SCALE,
            cap: FIELD_CAP,
            epsilon: FIELD_EPSILON,
            sources: FieldSources::FixedOnly,
            refresh_interval: None,
            nan_fallback: FIELD_NAN_FALLBACK,
            backend: Backend::Parallel,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(GravfieldError::InvalidGrid {
                width: self.width,
                height: self.height,
            });
        }
        // a negative constant makes every cell negative and the max-normalized
        // image uniformly blue
        ensure_non_negative("field.gravity", self.gravity)?;
        ensure_positive("field.scale_factor", self.scale_factor)?;
        ensure_non_negative("field.cap", self.cap)?;
        ensure_non_negative("field.epsilon", self.epsilon)?;
        ensure_non_negative("field.nan_fallback", self.nan_fallback)?;
        if self.refresh_interval == Some(0) {
            return Err(GravfieldError::InvalidParameter {
                name: "field.refresh_interval",
                value: 0.0,
            });
        }
        Ok(())
    }
}

/// Everything needed to create a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub scene: SceneConfig,
    pub physics: PhysicsConfig,
    pub field: FieldConfig,
    /// Integrator steps per rendered frame
    pub ticks_per_frame: u32,
    /// Draw a `[x, y], <vx, vy> |v|` label next to every particle
    pub show_labels: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            physics: PhysicsConfig::default(),
            field: FieldConfig::default(),
            ticks_per_frame: 1,
            show_labels: false,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<()> {
        self.scene.validate()?;
        self.physics.validate()?;
        self.field.validate()?;
        if self.ticks_per_frame == 0 {
            return Err(GravfieldError::InvalidParameter {
                name: "ticks_per_frame",
                value: 0.0,
            });
        }
        Ok(())
    }
}
