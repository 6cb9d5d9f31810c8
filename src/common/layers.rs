//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Companion,
    Enemy,
    Light,
}

pub fn player_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Player, [Layer::World, Layer::Enemy])
}

pub fn companion_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Companion,
        [Layer::World, Layer::Enemy, Layer::Light],
    )
}

pub fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Enemy,
        [
            Layer::World,
            Layer::Player,
            Layer::Companion,
            Layer::Enemy,
            Layer::Light,
        ],
    )
}

/// The light cone only senses actors it can illuminate.
pub fn light_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Light, [Layer::Enemy, Layer::Companion])
}

pub fn world_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::World,
        [Layer::Player, Layer::Companion, Layer::Enemy],
    )
}

/// Keep membership but clear filters: the body stops interacting with anything
/// without a structural change.
#[inline]
pub fn non_interacting(membership: Layer) -> CollisionLayers {
    CollisionLayers::new(membership, [] as [Layer; 0])
}
