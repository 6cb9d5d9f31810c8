//! Core plugin: shared resources, the simulation step order, notification logging.
//!
//! One fixed step is one simulation tick:
//!
//! ```text
//! FixedUpdate:      Prepare -> Think -> Spawn
//! (avian step)      emits CollisionStart / CollisionEnd
//! FixedPostUpdate:  Sense -> Resolve -> Economy
//! PostUpdate:       despawn marked entities, log notifications
//! ```
//!
//! All six sets stop running once the session has an outcome.

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::anim::clear_animation_triggers;
use crate::common::messages::Notification;
use crate::common::rng::SimRng;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::score::session_in_progress;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Countdowns, trigger resets, flashlight aim.
    Prepare,
    /// Per-actor state machines.
    Think,
    /// Wave intermission and spawn schedule.
    Spawn,
    /// Contacts reported by physics this step.
    Sense,
    /// The damage pipeline.
    Resolve,
    /// Kills into score, drops and wave progress.
    Economy,
}

pub fn plugin(app: &mut App) {
    // Apps built for tests or from a config file insert their own tunables first.
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::default());
    }
    let seed = app.world().resource::<Tunables>().seed;

    app.insert_resource(SimRng::from_optional_seed(seed))
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.04)))
        .add_message::<Notification>();

    app.configure_sets(
        FixedUpdate,
        (SimSet::Prepare, SimSet::Think, SimSet::Spawn).chain(),
    )
    .configure_sets(
        FixedPostUpdate,
        (SimSet::Sense, SimSet::Resolve, SimSet::Economy)
            .chain()
            .after(CollisionEventSystems),
    );
    for set in [SimSet::Prepare, SimSet::Think, SimSet::Spawn] {
        app.configure_sets(
            FixedUpdate,
            set.run_if(in_state(GameState::InGame))
                .run_if(session_in_progress),
        );
    }
    for set in [SimSet::Sense, SimSet::Resolve, SimSet::Economy] {
        app.configure_sets(
            FixedPostUpdate,
            set.run_if(in_state(GameState::InGame))
                .run_if(session_in_progress),
        );
    }

    app.add_systems(OnEnter(GameState::InGame), reseed_rng)
        .add_systems(
            FixedUpdate,
            clear_animation_triggers.in_set(SimSet::Prepare),
        )
        .add_systems(PostUpdate, log_notifications);
}

/// A seeded session replays identically every time it is entered.
fn reseed_rng(tunables: Res<Tunables>, mut rng: ResMut<SimRng>) {
    *rng = SimRng::from_optional_seed(tunables.seed);
}

fn log_notifications(mut notifications: MessageReader<Notification>) {
    for n in notifications.read() {
        if n.is_milestone() {
            info!("{n:?}");
        } else {
            debug!("{n:?}");
        }
    }
}

#[cfg(test)]
mod tests;
