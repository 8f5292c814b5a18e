use bevy::prelude::*;
use gravfield_sim::Simulation;

/// Marker for the HUD text
#[derive(Component)]
pub struct HudText;

/// Spawn the HUD overlay
pub fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Text::new("gravfield"),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(1.0, 1.0, 1.0, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        HudText,
    ));
}

/// HUD frame counter for throttling
#[derive(Resource, Default)]
pub struct HudThrottle {
    pub frame: u32,
}

/// Update HUD text every 10th frame; total energy is O(n²)
pub fn update_hud(
    simulation: Res<Simulation>,
    mut throttle: ResMut<HudThrottle>,
    mut query: Query<&mut Text, With<HudText>>,
) {
    throttle.frame = throttle.frame.wrapping_add(1);
    if throttle.frame % 10 != 0 {
        return;
    }
    let Ok(mut text) = query.get_single_mut() else {
        return;
    };

    let paused = if simulation.is_paused() { " [PAUSED]" } else { "" };
    let stats = simulation.last_step();
    **text = format!(
        "Tick: {}{}\n\
         Particles: {}\n\
         Velocity sum: {:.3}\n\
         Total energy: {:.3}\n\
         Guarded: {} | Bounces: {} | Field #{}",
        simulation.tick_count(),
        paused,
        simulation.system().len(),
        simulation.velocity_sum(),
        simulation.total_energy(),
        stats.guarded,
        stats.reflections,
        simulation.field_generation(),
    );
}
