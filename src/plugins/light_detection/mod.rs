//! Light detection: which enemies are inside the flashlight cone right now.
//!
//! The cone is a kinematic triangle `Sensor` carried by the `Flashlight` entity. avian
//! reports when it starts and stops overlapping something; `track_light_contacts`
//! turns those contacts into:
//! - `LightRegistry` membership for enemies,
//! - the `Illuminated` flag for the companion.
//!
//! The registry is only written in `Sense`, so everything in `Think` reads the same
//! snapshot.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::contact::{sides_of_end, sides_of_start, split_pair};
use crate::common::layers::light_layers;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::SimSet;
use crate::plugins::enemies::Enemy;
use crate::plugins::health::Dead;

/// Ordered, duplicate-free set of enemies inside the light volume.
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct LightRegistry {
    members: Vec<Entity>,
}

impl LightRegistry {
    /// Returns `true` if `e` was not a member yet.
    pub fn on_enter(&mut self, e: Entity) -> bool {
        if self.members.contains(&e) {
            return false;
        }
        self.members.push(e);
        true
    }

    /// Returns `true` if `e` was a member.
    pub fn on_exit(&mut self, e: Entity) -> bool {
        let Some(i) = self.members.iter().position(|m| *m == e) else {
            return false;
        };
        self.members.remove(i);
        true
    }

    pub fn contains(&self, e: Entity) -> bool {
        self.members.contains(&e)
    }

    pub fn members(&self) -> &[Entity] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn clear(&mut self) {
        self.members.clear();
    }

    pub fn retain(&mut self, keep: impl FnMut(&Entity) -> bool) {
        self.members.retain(keep);
    }

    /// Member closest to `from`. Members `position_of` cannot place are skipped; the
    /// earliest member wins a tie.
    pub fn nearest_in_light(
        &self,
        from: Vec2,
        position_of: impl Fn(Entity) -> Option<Vec2>,
    ) -> Option<Entity> {
        let mut best: Option<(Entity, f32)> = None;
        for &e in &self.members {
            let Some(p) = position_of(e) else {
                continue;
            };
            let d = from.distance_squared(p);
            if best.is_none_or(|(_, bd)| d < bd) {
                best = Some((e, d));
            }
        }
        best.map(|(e, _)| e)
    }
}

/// Marker for the sensor volume that detects lit actors.
#[derive(Component, Debug, Clone, Copy)]
pub struct LightVolume;

/// The player's flashlight. `facing` is a unit vector.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Flashlight {
    pub facing: Vec2,
}

impl Default for Flashlight {
    fn default() -> Self {
        Self { facing: Vec2::X }
    }
}

/// Set on the companion while the light volume overlaps it.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Illuminated(pub bool);

/// Cone with its apex at the origin, opening along +X. Counter-clockwise.
pub fn cone_vertices(angle_degrees: f32, distance: f32) -> [Vec2; 3] {
    let half = (angle_degrees.clamp(1.0, 179.0) * 0.5).to_radians();
    let edge = Vec2::from_angle(half) * distance.max(1.0);
    [Vec2::ZERO, Vec2::new(edge.x, -edge.y), edge]
}

pub fn plugin(app: &mut App) {
    app.init_resource::<LightRegistry>()
        .add_systems(
            OnEnter(GameState::InGame),
            (reset_registry, spawn_flashlight),
        )
        .add_systems(
            FixedPostUpdate,
            track_light_contacts.in_set(SimSet::Sense),
        );
}

fn reset_registry(mut registry: ResMut<LightRegistry>) {
    registry.clear();
}

fn spawn_flashlight(mut commands: Commands, tunables: Res<Tunables>) {
    let [a, b, c] = cone_vertices(
        tunables.light.cone_angle_degrees,
        tunables.light.cone_distance,
    );
    commands.spawn((
        Name::new("Flashlight"),
        Flashlight::default(),
        LightVolume,
        Transform::from_xyz(0.0, 0.0, 2.0),
        RigidBody::Kinematic,
        Collider::triangle(a, b, c),
        Sensor,
        light_layers(),
        CollisionEventsEnabled,
        DespawnOnExit(GameState::InGame),
    ));
}

pub(crate) fn track_light_contacts(
    mut started: MessageReader<CollisionStart>,
    mut ended: MessageReader<CollisionEnd>,
    mut registry: ResMut<LightRegistry>,
    volumes: Query<(), With<LightVolume>>,
    live_enemies: Query<(), (With<Enemy>, Without<Dead>)>,
    mut lit: Query<&mut Illuminated>,
) {
    let is_volume = |e: Entity| volumes.contains(e);

    for ev in started.read() {
        let Some((_, other)) = split_pair(sides_of_start(ev), is_volume) else {
            continue;
        };
        let other = other.owner();
        if live_enemies.contains(other) {
            registry.on_enter(other);
        } else if let Ok(mut flag) = lit.get_mut(other) {
            flag.0 = true;
        }
    }

    for ev in ended.read() {
        let Some((_, other)) = split_pair(sides_of_end(ev), is_volume) else {
            continue;
        };
        let other = other.owner();
        registry.on_exit(other);
        if let Ok(mut flag) = lit.get_mut(other) {
            flag.0 = false;
        }
    }

    // Dead or despawned enemies never report an exit.
    if registry.members().iter().any(|e| !live_enemies.contains(*e)) {
        registry.retain(|e| live_enemies.contains(*e));
    }
}

#[cfg(test)]
mod tests;
