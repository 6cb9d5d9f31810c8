//! Lighting plugin (Firefly) (render-only).
//!
//! A glow sits on the flashlight and dims with the session's battery. Detection does not
//! depend on it: the cone sensor in `light_detection` is the gameplay truth.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::light_detection::Flashlight;
use crate::plugins::score::{Session, MAX_BATTERY};

#[derive(Component)]
pub struct FlashlightGlow {
    full_range: f32,
}

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(
            Update,
            follow_flashlight.run_if(in_state(GameState::InGame)),
        );
}

fn setup(mut commands: Commands, tunables: Res<Tunables>) {
    let full_range = tunables.light.cone_distance * 1.5;
    commands.spawn((
        Name::new("FlashlightGlow"),
        FlashlightGlow { full_range },
        PointLight2d {
            color: Color::srgb(1.0, 0.9, 0.75),
            radius: full_range,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_flashlight(
    session: Option<Res<Session>>,
    q_flashlight: Query<&Transform, (With<Flashlight>, Without<FlashlightGlow>)>,
    mut q_glow: Query<(&mut Transform, &mut PointLight2d, &FlashlightGlow), Without<Flashlight>>,
) {
    let Ok(tf_light) = q_flashlight.single() else {
        return;
    };
    let Ok((mut tf_glow, mut glow, base)) = q_glow.single_mut() else {
        return;
    };

    tf_glow.translation.x = tf_light.translation.x;
    tf_glow.translation.y = tf_light.translation.y;

    let charge = session.map_or(1.0, |s| s.battery() / MAX_BATTERY);
    glow.radius = base.full_range * (0.5 + 0.5 * charge);
}
