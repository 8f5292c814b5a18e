use std::time::Instant;

use gravfield_core::*;
use log::debug;
use rayon::prelude::*;

/// Paints the gravitational field of a particle system onto a pixel grid.
///
/// Each cell sums a capped intensity contribution from every source. The
/// grid is then normalized by its maximum and color mapped from blue (weak)
/// to red (strong).
pub struct FieldRasterizer {
    config: FieldConfig,
}

impl FieldRasterizer {
    pub fn new(config: FieldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    /// Source positions in grid coordinates, with their masses
    fn sources(&self, system: &ParticleSystem) -> Vec<(Vector2, f64)> {
        let scale = self.config.scale_factor;
        system
            .iter()
            .filter(|p| match self.config.sources {
                FieldSources::FixedOnly => p.fixed,
                FieldSources::All => true,
            })
            .map(|p| (p.position * scale, p.mass))
            .collect()
    }

    /// Raw per-cell intensities, row-major
    pub fn intensity_grid(&self, system: &ParticleSystem) -> FieldGrid {
        let started = Instant::now();
        let FieldConfig { width, height, .. } = self.config;
        let sources = self.sources(system);

        let mut values = vec![0.0; width as usize * height as usize];
        let fill = |(y, row): (usize, &mut [f64])| {
            for (x, cell) in row.iter_mut().enumerate() {
                let point = Vector2::new(x as f64, y as f64);
                *cell = self.intensity_at(point, &sources);
            }
        };
        match self.config.backend {
            Backend::Serial => values.chunks_mut(width as usize).enumerate().for_each(fill),
            Backend::Parallel => values.par_chunks_mut(width as usize).enumerate().for_each(fill),
        }

        debug!(
            "Field {}x{} from {} sources in {:?}",
            width,
            height,
            sources.len(),
            started.elapsed()
        );
        FieldGrid { width, height, values }
    }

    fn intensity_at(&self, point: Vector2, sources: &[(Vector2, f64)]) -> f64 {
        let FieldConfig {
            gravity,
            cap,
            epsilon,
            nan_fallback,
            ..
        } = self.config;

        sources.iter().fold(0.0, |acc, &(source, mass)| {
            let d = point.distance_vector(source);
            let dist_sq = d.length_squared();
            let f = gravity * mass / (dist_sq + epsilon);
            // zero distance gives 0/0 here; f64::min would swallow the NaN
            let contribution = d.length() * f / dist_sq.sqrt();
            if contribution.is_nan() {
                acc + nan_fallback
            } else {
                acc + contribution.min(cap)
            }
        })
    }

    /// Intensity grid normalized by its maximum and color mapped.
    ///
    /// Fails with `NonFiniteField` if any cell overflowed.
    pub fn rasterize(&self, system: &ParticleSystem) -> Result<FieldImage> {
        let grid = self.intensity_grid(system);

        if let Some(i) = grid.values.iter().position(|v| !v.is_finite()) {
            let width = grid.width as usize;
            return Err(GravfieldError::NonFiniteField {
                x: (i % width) as u32,
                y: (i / width) as u32,
                value: grid.values[i],
            });
        }

        let max = grid.max();
        let pixels = grid
            .values
            .iter()
            .map(|&v| colormap(if max > 0.0 { v / max } else { 0.0 }))
            .collect();

        Ok(FieldImage {
            width: grid.width,
            height: grid.height,
            pixels,
        })
    }
}

/// Blue-to-red ramp for a normalized intensity in `[0, 1]`
pub fn colormap(normalized: f64) -> Rgba {
    let red = (normalized.clamp(0.0, 1.0) * 255.0).floor() as u8;
    Rgba::new(red, 0, 255 - red, 255)
}

/// One-shot rasterization of `system` with `config`
pub fn rasterize_field(system: &ParticleSystem, config: &FieldConfig) -> Result<FieldImage> {
    FieldRasterizer::new(*config)?.rasterize(system)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(width: u32, height: u32) -> FieldConfig {
        FieldConfig {
            width,
            height,
            gravity: 1.0,
            scale_factor: 1.0,
            backend: Backend::Serial,
            ..FieldConfig::default()
        }
    }

    fn anchors(points: &[(f64, f64, f64)]) -> ParticleSystem {
        let mut builder = SystemBuilder::new();
        for &(x, y, mass) in points {
            builder.add_fixed(mass, Vector2::new(x, y));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_colormap_endpoints() {
        assert_eq!(colormap(0.0), Rgba::new(0, 0, 255, 255));
        assert_eq!(colormap(1.0), Rgba::new(255, 0, 0, 255));
        assert_eq!(colormap(0.5), Rgba::new(127, 0, 128, 255));
    }

    #[test]
    fn test_empty_sources_give_uniform_zero() {
        let rasterizer = FieldRasterizer::new(config(4, 3)).unwrap();
        let grid = rasterizer.intensity_grid(&ParticleSystem::empty());
        assert!(grid.values.iter().all(|&v| v == 0.0));

        let image = rasterizer.rasterize(&ParticleSystem::empty()).unwrap();
        assert_eq!(image.pixels.len(), 12);
        assert!(image.pixels.iter().all(|&p| p == Rgba::new(0, 0, 255, 255)));
    }

    #[test]
    fn test_single_source_intensity() {
        let system = anchors(&[(0.0, 0.0, 100.0)]);
        let grid = FieldRasterizer::new(config(3, 1)).unwrap().intensity_grid(&system);

        // coincident cell takes the NaN fallback
        assert_eq!(grid.get(0, 0), Some(0.1));
        // 100 / 1.0001 exceeds the cap
        assert_eq!(grid.get(1, 0), Some(10.0));
        let cfg = FieldConfig {
            cap: 1000.0,
            ..config(3, 1)
        };
        let grid = FieldRasterizer::new(cfg).unwrap().intensity_grid(&system);
        assert_relative_eq!(grid.get(2, 0).unwrap(), 100.0 / 4.0001);
    }

    #[test]
    fn test_scale_factor_maps_world_to_cells() {
        let system = anchors(&[(8.0, 8.0, 1.0)]);
        let cfg = FieldConfig {
            scale_factor: 0.25,
            ..config(4, 4)
        };
        let grid = FieldRasterizer::new(cfg).unwrap().intensity_grid(&system);
        assert_eq!(grid.get(2, 2), Some(0.1));
    }

    #[test]
    fn test_field_sources_selection() {
        let mut builder = SystemBuilder::new();
        builder.add(1.0, Vector2::new(1.0, 1.0), Vector2::ZERO);
        let system = builder.build().unwrap();

        let fixed_only = FieldRasterizer::new(config(3, 3)).unwrap().intensity_grid(&system);
        assert_eq!(fixed_only.max(), 0.0);

        let all = FieldRasterizer::new(FieldConfig {
            sources: FieldSources::All,
            ..config(3, 3)
        })
        .unwrap()
        .intensity_grid(&system);
        assert!(all.max() > 0.0);
    }

    #[test]
    fn test_rasterize_normalizes_by_max() {
        let system = anchors(&[(0.0, 0.0, 1.0), (9.0, 0.0, 1.0)]);
        let image = FieldRasterizer::new(config(10, 2)).unwrap().rasterize(&system).unwrap();
        let reds: Vec<u8> = image.pixels.iter().map(|p| p.r).collect();
        assert_eq!(reds.iter().copied().max(), Some(255));
        assert!(image.pixels.iter().all(|p| p.g == 0 && p.a == 255));
        assert!(image.pixels.iter().all(|p| p.r as u16 + p.b as u16 == 255));
    }

    #[test]
    fn test_backends_agree() {
        let system = anchors(&[(3.0, 4.0, 50.0), (20.0, 7.0, 500.0), (11.5, 0.5, 5.0)]);
        let serial = FieldRasterizer::new(config(24, 9)).unwrap().intensity_grid(&system);
        let parallel = FieldRasterizer::new(FieldConfig {
            backend: Backend::Parallel,
            ..config(24, 9)
        })
        .unwrap()
        .intensity_grid(&system);
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_overflow_reported() {
        let system = anchors(&[(1.0, 0.0, 1e308), (0.0, 1.0, 1e308)]);
        let cfg = FieldConfig {
            gravity: 10.0,
            cap: f64::MAX,
            ..config(1, 1)
        };
        assert!(matches!(
            rasterize_field(&system, &cfg),
            Err(GravfieldError::NonFiniteField { x: 0, y: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_grid_rejected() {
        assert_eq!(
            rasterize_field(&ParticleSystem::empty(), &config(0, 5)).err(),
            Some(GravfieldError::InvalidGrid { width: 0, height: 5 })
        );
    }
}
