//! Feature plugins.

use bevy::prelude::*;

pub mod companion;
pub mod core;
pub mod enemies;
pub mod health;
pub mod light_detection;
pub mod physics;
pub mod player;
pub mod score;
pub mod waves;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    world::plugin(app);
    health::plugin(app);
    light_detection::plugin(app);
    player::plugin(app);
    companion::plugin(app);
    enemies::plugin(app);
    waves::plugin(app);
    score::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
}
