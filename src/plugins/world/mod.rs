//! World plugin: walls around the arena.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::world_layers;
use crate::common::state::GameState;
use crate::common::tunables::{ArenaTunables, Tunables};

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_arena);
}

/// Center and size of the four walls, outside the playable rectangle.
pub fn wall_rects(arena: &ArenaTunables) -> [(&'static str, Vec2, Vec2); 4] {
    let (hw, hh, t) = (arena.half_width, arena.half_height, arena.wall_thickness);
    let horizontal = Vec2::new(hw * 2.0 + t * 2.0, t);
    let vertical = Vec2::new(t, hh * 2.0);
    [
        ("WallTop", Vec2::new(0.0, hh + t * 0.5), horizontal),
        ("WallBottom", Vec2::new(0.0, -hh - t * 0.5), horizontal),
        ("WallLeft", Vec2::new(-hw - t * 0.5, 0.0), vertical),
        ("WallRight", Vec2::new(hw + t * 0.5, 0.0), vertical),
    ]
}

fn spawn_arena(mut commands: Commands, tunables: Res<Tunables>) {
    let wall_color = Color::srgb(0.25, 0.27, 0.33);

    for (name, pos, size) in wall_rects(&tunables.arena) {
        commands.spawn((
            Name::new(name),
            Sprite {
                color: wall_color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(pos.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            world_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

#[cfg(test)]
mod tests;
