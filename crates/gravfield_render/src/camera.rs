use bevy::prelude::*;
use gravfield_core::{FieldConfig, Vector2};

/// Marker for the main 2D camera
#[derive(Component)]
pub struct FieldCamera;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, FieldCamera));
}

/// Surface size in pixels, as painted by the field raster
pub fn surface_size(field: &FieldConfig) -> Vec2 {
    Vec2::new(field.width as f32, field.height as f32)
}

/// Map a world position to camera space.
///
/// The raster puts world `(0, 0)` at the top-left pixel with y growing
/// downwards; the camera is centred on the surface with y growing upwards.
pub fn world_to_screen(position: Vector2, field: &FieldConfig) -> Vec2 {
    let size = surface_size(field);
    let scaled = position * field.scale_factor;
    Vec2::new(scaled.x as f32 - size.x / 2.0, size.y / 2.0 - scaled.y as f32)
}
