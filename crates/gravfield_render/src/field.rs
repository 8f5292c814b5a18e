use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use gravfield_core::FieldImage;
use gravfield_sim::Simulation;

/// Marker for the background sprite showing the field
#[derive(Component)]
pub struct FieldBackground {
    /// Field generation currently uploaded
    pub generation: u64,
}

/// Convert a field raster into an RGBA8 texture
pub fn field_texture(field: &FieldImage) -> Image {
    Image::new(
        Extent3d {
            width: field.width,
            height: field.height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        field.as_bytes().to_vec(),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

pub fn spawn_field_background(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    simulation: Res<Simulation>,
) {
    let field = simulation.field();
    let handle = images.add(field_texture(field));

    commands.spawn((
        Sprite {
            image: handle,
            custom_size: Some(Vec2::new(field.width as f32, field.height as f32)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 0.0),
        FieldBackground {
            generation: simulation.field_generation(),
        },
    ));
}

/// Re-upload the texture when the simulation produced a new field
pub fn update_field_background(
    simulation: Res<Simulation>,
    mut images: ResMut<Assets<Image>>,
    mut query: Query<(&Sprite, &mut FieldBackground)>,
) {
    for (sprite, mut background) in query.iter_mut() {
        if background.generation == simulation.field_generation() {
            continue;
        }
        if let Some(image) = images.get_mut(&sprite.image) {
            image.data = simulation.field().as_bytes().to_vec();
        }
        background.generation = simulation.field_generation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gravfield_core::Rgba;

    #[test]
    fn test_field_texture_layout() {
        let field = FieldImage {
            width: 2,
            height: 1,
            pixels: vec![Rgba::new(255, 0, 0, 255), Rgba::new(0, 0, 255, 255)],
        };
        let image = field_texture(&field);
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 1);
        assert_eq!(image.data, vec![255, 0, 0, 255, 0, 0, 255, 255]);
    }
}
