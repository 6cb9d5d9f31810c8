//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime.
//! - `dawn_watch::game::configure_headless` installs the gameplay plugins.
//! - time advances by exactly one fixed step per `app.update()`.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use dawn_watch::common::tunables::Tunables;

/// 64 Hz, the default fixed timestep.
pub const FIXED_STEP: Duration = Duration::from_micros(15_625);

pub fn app_headless() -> App {
    app_headless_with(Tunables {
        seed: Some(42),
        ..default()
    })
}

pub fn app_headless_with(tunables: Tunables) -> App {
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ))
    .insert_resource(TimeUpdateStrategy::ManualDuration(FIXED_STEP))
    .insert_resource(tunables);

    dawn_watch::game::configure_headless(&mut app);
    // `App::run` would do this; plugins (e.g. avian) init resources in `finish`.
    app.finish();
    app.cleanup();
    app
}

pub fn tick(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

pub fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query_filtered::<Entity, F>().iter(world).count()
}
