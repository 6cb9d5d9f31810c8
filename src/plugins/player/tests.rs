use std::f32::consts::FRAC_PI_2;

use avian2d::prelude::*;
use bevy::prelude::*;

use super::{Player, PlayerInput};
use crate::common::anim::AnimationFlags;
use crate::common::test_utils::{run_system_once, set_fixed_delta};
use crate::common::tunables::Tunables;
use crate::plugins::health::{ActorKind, Dead};
use crate::plugins::light_detection::Flashlight;

#[test]
fn spawn_creates_player() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn);

    let kinds: Vec<_> = world
        .query_filtered::<&ActorKind, With<Player>>()
        .iter(&world)
        .copied()
        .collect();
    assert_eq!(kinds, vec![ActorKind::Player]);
}

#[test]
fn input_is_clamped_and_zero_aim_is_ignored() {
    let mut input = PlayerInput::default();
    input.set_move(Vec2::new(3.0, 4.0));
    assert!((input.move_axis().length() - 1.0).abs() < 1e-6);
    input.set_move(Vec2::new(0.5, 0.0));
    assert_eq!(input.move_axis(), Vec2::new(0.5, 0.0));

    input.set_aim(Vec2::new(0.0, -2.0));
    assert_eq!(input.aim_axis(), Vec2::NEG_Y);
    input.set_aim(Vec2::ZERO);
    assert_eq!(input.aim_axis(), Vec2::NEG_Y);
}

#[test]
fn apply_movement_sets_velocity_until_dead() {
    let mut world = World::new();
    let mut tunables = Tunables::default();
    tunables.player.move_speed = 100.0;
    world.insert_resource(tunables);
    let mut input = PlayerInput::default();
    input.set_move(Vec2::X);
    world.insert_resource(input);
    let player = world
        .spawn((Player, LinearVelocity::ZERO, AnimationFlags::default()))
        .id();

    run_system_once(&mut world, super::apply_movement);
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::new(100.0, 0.0));
    assert!(world.get::<AnimationFlags>(player).unwrap().is_moving);

    world.entity_mut(player).insert((Dead, LinearVelocity::ZERO));
    run_system_once(&mut world, super::apply_movement);
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::ZERO);
}

#[test]
fn turn_towards_interpolates_by_angle() {
    let half = super::turn_towards(Vec2::X, Vec2::Y, 0.5);
    assert!((half.to_angle() - FRAC_PI_2 * 0.5).abs() < 1e-5);
    assert!((half.length() - 1.0).abs() < 1e-5);

    let done = super::turn_towards(Vec2::X, Vec2::Y, 7.0);
    assert!(done.distance(Vec2::Y) < 1e-5);

    assert_eq!(super::turn_towards(Vec2::X, Vec2::ZERO, 0.5), Vec2::X);
}

#[test]
fn flashlight_follows_player_and_aim() {
    let mut world = World::new();
    let mut tunables = Tunables::default();
    tunables.player.aim_speed = 1000.0;
    tunables.player.aim_distance = 10.0;
    tunables.player.flashlight_offset = [0.0, 2.0];
    world.insert_resource(tunables);
    let mut input = PlayerInput::default();
    input.set_aim(Vec2::Y);
    world.insert_resource(input);
    set_fixed_delta(&mut world, 1.0 / 64.0);

    world.spawn((Player, Transform::from_xyz(50.0, -20.0, 1.0)));
    let light = world
        .spawn((Flashlight::default(), Transform::default()))
        .id();

    run_system_once(&mut world, super::aim_flashlight);

    let facing = world.get::<Flashlight>(light).unwrap().facing;
    assert!(facing.distance(Vec2::Y) < 1e-4);
    let tf = world.get::<Transform>(light).unwrap();
    assert!(tf.translation.truncate().distance(Vec2::new(50.0, -8.0)) < 1e-3);
    let (_, angle) = tf.rotation.to_axis_angle();
    assert!((angle - FRAC_PI_2).abs() < 1e-4);
}
