use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::vector::Vector2;

/// Stable particle identifier, unique within a run and never reused
pub type ParticleId = u64;

/// A point mass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub id: ParticleId,
    /// Always positive and finite once inside a `ParticleSystem`
    pub mass: f64,
    pub position: Vector2,
    pub velocity: Vector2,
    /// Anchors exert force but are never moved by the integrator
    pub fixed: bool,
}

impl Particle {
    pub fn new(id: ParticleId, mass: f64, position: Vector2, velocity: Vector2) -> Self {
        Self {
            id,
            mass,
            position,
            velocity,
            fixed: false,
        }
    }

    /// A fixed particle at rest (galactic center)
    pub fn anchor(id: ParticleId, mass: f64, position: Vector2) -> Self {
        Self {
            id,
            mass,
            position,
            velocity: Vector2::ZERO,
            fixed: true,
        }
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}

/// One field raster sample, laid out for direct texture upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Dense row-major grid of field intensities (`y * width + x`)
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGrid {
    pub width: u32,
    pub height: u32,
    pub values: Vec<f64>,
}

impl FieldGrid {
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.values.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Largest intensity in the grid (0.0 for an all-zero grid)
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }
}

/// Color-mapped field raster, same layout as [`FieldGrid`]
#[derive(Debug, Clone, PartialEq)]
pub struct FieldImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgba>,
}

impl FieldImage {
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y as usize * self.width as usize + x as usize).copied()
    }

    /// Raw RGBA8 bytes, row-major
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
