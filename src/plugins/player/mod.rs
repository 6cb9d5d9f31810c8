//! Player plugin.
//!
//! Pipeline:
//! - Update: sample the keyboard into the `PlayerInput` resource (full app only)
//! - FixedUpdate / Prepare: turn the flashlight toward the aim direction
//! - FixedUpdate / Think: apply the move axis to the player's body
//!
//! `PlayerInput` is the only way in. Headless tests write it directly.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::anim::AnimationFlags;
use crate::common::layers::player_layers;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::SimSet;
use crate::plugins::health::{ActorKind, Dead, Invincibility};
use crate::plugins::light_detection::Flashlight;

#[derive(Component, Debug, Clone, Copy)]
pub struct Player;

/// Normalized control axes for the current tick.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct PlayerInput {
    move_axis: Vec2,
    aim_axis: Vec2,
}

impl Default for PlayerInput {
    fn default() -> Self {
        Self {
            move_axis: Vec2::ZERO,
            aim_axis: Vec2::X,
        }
    }
}

impl PlayerInput {
    pub fn move_axis(&self) -> Vec2 {
        self.move_axis
    }

    pub fn aim_axis(&self) -> Vec2 {
        self.aim_axis
    }

    /// Longer-than-unit input is clamped to unit length.
    pub fn set_move(&mut self, axis: Vec2) {
        self.move_axis = if axis.is_finite() {
            axis.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
    }

    /// A zero axis keeps the previous aim.
    pub fn set_aim(&mut self, axis: Vec2) {
        if let Some(dir) = axis.try_normalize() {
            self.aim_axis = dir;
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PlayerInput>()
        .add_systems(OnEnter(GameState::InGame), (reset_input, spawn))
        .add_systems(Update, gather_input)
        .add_systems(Update, restart_on_key.run_if(in_state(GameState::GameOver)))
        .add_systems(FixedUpdate, aim_flashlight.in_set(SimSet::Prepare))
        .add_systems(FixedUpdate, apply_movement.in_set(SimSet::Think));
}

fn reset_input(mut input: ResMut<PlayerInput>) {
    *input = PlayerInput::default();
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let t = &tunables.player;
    let radius = t.radius.max(1.0);

    commands.spawn((
        (
            Name::new("Player"),
            Player,
            ActorKind::Player,
            Invincibility::new(t.invincibility),
            AnimationFlags::default(),
        ),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(radius * 2.0)),
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 1.0),
        (
            RigidBody::Dynamic,
            Collider::circle(radius),
            LockedAxes::ROTATION_LOCKED,
            player_layers(),
            LinearVelocity::ZERO,
        ),
        DespawnOnExit(GameState::InGame),
    ));
}

/// WASD moves, arrow keys aim. Without arrow input the light follows the movement.
fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    let Some(keys) = keys else {
        return;
    };
    let axis = |pos: KeyCode, neg: KeyCode| {
        f32::from(u8::from(keys.pressed(pos))) - f32::from(u8::from(keys.pressed(neg)))
    };

    let movement = Vec2::new(axis(KeyCode::KeyD, KeyCode::KeyA), axis(KeyCode::KeyW, KeyCode::KeyS));
    let aim = Vec2::new(
        axis(KeyCode::ArrowRight, KeyCode::ArrowLeft),
        axis(KeyCode::ArrowUp, KeyCode::ArrowDown),
    );

    input.set_move(movement.normalize_or_zero());
    input.set_aim(if aim != Vec2::ZERO { aim } else { movement });
}

/// R starts a fresh session from the game-over screen.
fn restart_on_key(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut next: ResMut<NextState<GameState>>,
) {
    if keys.is_some_and(|k| k.just_pressed(KeyCode::KeyR)) {
        next.set(GameState::InGame);
    }
}

fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<(&mut LinearVelocity, &mut AnimationFlags), (With<Player>, Without<Dead>)>,
) {
    let Ok((mut vel, mut flags)) = q_player.single_mut() else {
        return;
    };
    vel.0 = input.move_axis() * tunables.player.move_speed;
    flags.is_moving = vel.0.length_squared() > 0.0;
}

/// Rotates `current` toward `target` by the fraction `t` of the angle between them.
pub fn turn_towards(current: Vec2, target: Vec2, t: f32) -> Vec2 {
    let (Some(from), Some(to)) = (current.try_normalize(), target.try_normalize()) else {
        return current;
    };
    let angle = from.angle_to(to) * t.clamp(0.0, 1.0);
    Vec2::from_angle(angle).rotate(from)
}

fn aim_flashlight(
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    q_player: Query<&Transform, (With<Player>, Without<Flashlight>)>,
    mut q_light: Query<(&mut Transform, &mut Flashlight), Without<Player>>,
) {
    let Ok(tf_player) = q_player.single() else {
        return;
    };
    let Ok((mut tf_light, mut light)) = q_light.single_mut() else {
        return;
    };
    let t = &tunables.player;

    light.facing = turn_towards(light.facing, input.aim_axis(), t.aim_speed * time.delta_secs());

    let origin = tf_player.translation.truncate()
        + light.facing * t.aim_distance
        + Vec2::from(t.flashlight_offset);
    tf_light.translation.x = origin.x;
    tf_light.translation.y = origin.y;
    tf_light.rotation = Quat::from_rotation_z(light.facing.to_angle());
}

#[cfg(test)]
mod tests;
