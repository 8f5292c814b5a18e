use bevy::prelude::*;

use super::camera;
use super::field;
use super::particles;
use super::ui;

/// Render plugin: field background, particle markers (with optional
/// labels) and HUD.
///
/// Expects a `Simulation` resource to be inserted before startup.
pub struct GravfieldRenderPlugin;

impl Plugin for GravfieldRenderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ui::HudThrottle>()
            .add_systems(
                Startup,
                (
                    camera::spawn_camera,
                    field::spawn_field_background,
                    particles::spawn_particle_markers,
                    ui::spawn_hud,
                ),
            )
            .add_systems(
                Update,
                (
                    field::update_field_background,
                    particles::update_particle_markers,
                    particles::update_particle_labels,
                    ui::update_hud,
                ),
            );
    }
}
