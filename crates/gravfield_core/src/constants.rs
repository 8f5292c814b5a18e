// Simulation units:
// - Distance: world units, drawn at SURFACE_SCALE pixels per unit (8 units per pixel)
// - Time: 1 unit = 1 tick
// - Mass: arbitrary, anchors are 10^4..10^5 times a disk particle

/// Gravitational constant used by the default scenes
pub const G: f64 = 2.0;

/// Additive softening in the dynamics force denominator
pub const SOFTENING: f64 = 1.0;

/// Additive epsilon in the field-intensity denominator
pub const FIELD_EPSILON: f64 = 0.0001;

/// Per-source cap on field intensity (prevents saturation near anchors)
pub const FIELD_CAP: f64 = 10.0;

/// Intensity added when a field contribution is NaN (source on a cell center)
pub const FIELD_NAN_FALLBACK: f64 = 0.1;

/// World units to surface pixels
pub const SURFACE_SCALE: f64 = 0.125;

/// Velocity retained (and reversed) when reflecting off a domain wall
pub const RESTITUTION: f64 = 0.9;

/// Distance a reflected particle is moved back inside the domain
pub const BOUNDARY_NUDGE: f64 = 1.0;

/// Integration time step
pub const DT: f64 = 1.0;

/// Upper bound on the random tangential speed of disk particles
pub const ORBITAL_SPEED_FACTOR: f64 = 10.0;

/// Default surface size in device pixels
pub const SURFACE_WIDTH: u32 = 1280;
pub const SURFACE_HEIGHT: u32 = 720;
