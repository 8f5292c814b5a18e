use bevy::prelude::*;
use bevy::sprite::Anchor;
use gravfield_core::{Particle, ParticleId};
use gravfield_sim::Simulation;

use super::camera::world_to_screen;

/// Marker for the square drawn at a particle's position
#[derive(Component)]
pub struct ParticleMarker {
    pub id: ParticleId,
}

/// Edge length of a free particle's marker in pixels
const MARKER_SIZE: f32 = 2.0;
/// Anchors are drawn this many times larger
const ANCHOR_MARKER_FACTOR: f32 = 4.0;
/// Markers sit above the field background
const MARKER_Z: f32 = 1.0;
const LABEL_FONT_SIZE: f32 = 10.0;

/// Text drawn beside a particle's marker when labels are enabled
#[derive(Component)]
pub struct ParticleLabel {
    pub id: ParticleId,
}

/// `[x, y], <vx, vy> |v|` with positions rounded and velocities in
/// hundredths
pub fn particle_label(p: &Particle) -> String {
    let hundredths = |v: f64| (v * 100.0).round() as i64;
    format!(
        "[{}, {}], <{}, {}> {}",
        p.position.x.round() as i64,
        p.position.y.round() as i64,
        hundredths(p.velocity.x),
        hundredths(p.velocity.y),
        hundredths(p.speed())
    )
}

/// Spawn one marker per particle with shared meshes and material
pub fn spawn_particle_markers(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    simulation: Res<Simulation>,
) {
    let field = &simulation.config().field;
    let free_mesh = meshes.add(Rectangle::new(MARKER_SIZE, MARKER_SIZE));
    let anchor_size = MARKER_SIZE * ANCHOR_MARKER_FACTOR;
    let anchor_mesh = meshes.add(Rectangle::new(anchor_size, anchor_size));
    let material = materials.add(ColorMaterial::from(Color::BLACK));
    let show_labels = simulation.config().show_labels;

    for p in simulation.system().iter() {
        let mesh = if p.fixed { anchor_mesh.clone() } else { free_mesh.clone() };
        let mut marker = commands.spawn((
            Mesh2d(mesh),
            MeshMaterial2d(material.clone()),
            Transform::from_translation(world_to_screen(p.position, field).extend(MARKER_Z)),
            ParticleMarker { id: p.id },
        ));
        if show_labels {
            marker.with_children(|parent| {
                parent.spawn((
                    Text2d::new(particle_label(p)),
                    TextFont {
                        font_size: LABEL_FONT_SIZE,
                        ..default()
                    },
                    TextColor(Color::BLACK),
                    Anchor::BottomLeft,
                    Transform::from_xyz(MARKER_SIZE, 0.0, 0.0),
                    ParticleLabel { id: p.id },
                ));
            });
        }
    }

    info!(
        "Spawned {} particle markers{}",
        simulation.system().len(),
        if show_labels { " with labels" } else { "" }
    );
}

/// Move markers to the current generation's positions
pub fn update_particle_markers(
    simulation: Res<Simulation>,
    mut query: Query<(&mut Transform, &ParticleMarker)>,
) {
    let field = &simulation.config().field;
    let system = simulation.system();

    for (mut transform, marker) in query.iter_mut() {
        let Some(p) = system.get(marker.id) else {
            continue;
        };
        let screen = world_to_screen(p.position, field);
        transform.translation.x = screen.x;
        transform.translation.y = screen.y;
    }
}

/// Rewrite label text from the current generation; labels follow their
/// marker as children
pub fn update_particle_labels(simulation: Res<Simulation>, mut query: Query<(&mut Text2d, &ParticleLabel)>) {
    let system = simulation.system();
    for (mut text, label) in query.iter_mut() {
        if let Some(p) = system.get(label.id) {
            **text = particle_label(p);
        }
    }
}
