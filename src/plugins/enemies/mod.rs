//! Enemies plugin: chase, hit on contact, back off, die.
//!
//! ```text
//!            contact with target           elapsed >= attack_cooldown
//!  Chasing ------------------------> Repositioning ------------------> Chasing
//!     |                                    |
//!     +------------ Dead marker -----------+--> Dead --(death_grace)--> PendingDespawn
//! ```
//!
//! The brain is plain data with a `step` function, so every transition can be tested
//! without a schedule. Systems only gather positions and apply the result:
//! - Think: `enemy_think` steers every enemy (and runs the death grace).
//! - Sense: `enemy_contact_attacks` reads physics contacts and sends `DamageRequest`s.
//!
//! Targets are entity ids, never owned. A target that died or was despawned simply
//! stops resolving and gets cleared on the next step.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::Occluder2d;

use crate::common::anim::AnimationFlags;
use crate::common::contact::sides_of_start;
use crate::common::layers::enemy_layers;
use crate::common::sim_time::SimSeconds;
use crate::common::state::GameState;
use crate::common::tier::Tier;
use crate::common::tunables::EnemyTunables;
use crate::plugins::core::SimSet;
use crate::plugins::health::{
    ActorKind, DamageRequest, Dead, Health, Invincibility, PendingDespawn,
};

#[derive(Component, Debug, Clone, Copy)]
pub struct Enemy;

/// Per-enemy copy of the tier's tunables.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct EnemyStats {
    pub tier: Tier,
    pub move_speed: f32,
    pub attack_damage: i32,
    pub attack_cooldown: f32,
    pub reposition_speed: f32,
    pub reposition_duration: f32,
    pub sight_radius: Option<f32>,
    pub retarget_interval: f32,
    pub death_grace: f32,
}

impl From<&EnemyTunables> for EnemyStats {
    fn from(t: &EnemyTunables) -> Self {
        Self {
            tier: t.tier,
            move_speed: t.move_speed,
            attack_damage: t.attack_damage,
            attack_cooldown: t.attack_cooldown,
            reposition_speed: t.reposition_speed,
            reposition_duration: t.reposition_duration,
            sight_radius: t.sight_radius,
            retarget_interval: t.retarget_interval,
            death_grace: t.death_grace,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyState {
    Chasing,
    /// `elapsed` counts from the attack; both the knockback and the cooldown start there.
    Repositioning { elapsed: f32 },
    Dead { elapsed: f32 },
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct EnemyBrain {
    pub state: EnemyState,
    pub target: Option<Entity>,
    pub retarget: SimSeconds,
}

impl Default for EnemyBrain {
    fn default() -> Self {
        Self {
            state: EnemyState::Chasing,
            target: None,
            // Look for a target on the first tick.
            retarget: SimSeconds::ZERO,
        }
    }
}

/// What one step asks of the body. `velocity: None` keeps the current velocity.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnemyStep {
    pub velocity: Option<Vec2>,
    pub despawn: bool,
}

impl EnemyBrain {
    pub fn is_dead(&self) -> bool {
        matches!(self.state, EnemyState::Dead { .. })
    }

    pub fn die(&mut self) {
        if !self.is_dead() {
            self.state = EnemyState::Dead { elapsed: 0.0 };
            self.target = None;
        }
    }

    /// Contact with `other`. Only the current target, only while chasing.
    pub fn begin_attack(&mut self, other: Entity) -> bool {
        if self.state != EnemyState::Chasing || self.target != Some(other) {
            return false;
        }
        self.state = EnemyState::Repositioning { elapsed: 0.0 };
        true
    }

    /// `locate` resolves a living target's position; `acquire` picks a new target.
    pub fn step(
        &mut self,
        stats: &EnemyStats,
        dt: f32,
        me: Vec2,
        locate: impl Fn(Entity) -> Option<Vec2>,
        acquire: impl FnOnce() -> Option<Entity>,
    ) -> EnemyStep {
        match &mut self.state {
            EnemyState::Dead { elapsed } => {
                let was_done = *elapsed >= stats.death_grace;
                *elapsed += dt;
                EnemyStep {
                    velocity: Some(Vec2::ZERO),
                    despawn: !was_done && *elapsed >= stats.death_grace,
                }
            }
            EnemyState::Repositioning { elapsed } => {
                *elapsed += dt;
                let velocity = (*elapsed >= stats.reposition_duration).then_some(Vec2::ZERO);
                if *elapsed >= stats.attack_cooldown {
                    self.state = EnemyState::Chasing;
                }
                EnemyStep {
                    velocity,
                    despawn: false,
                }
            }
            EnemyState::Chasing => {
                if self.target.is_some_and(|t| locate(t).is_none()) {
                    self.target = None;
                }

                self.retarget.tick_down(dt);
                if self.target.is_none() && !self.retarget.is_positive() {
                    self.target = acquire();
                    self.retarget = SimSeconds::new(stats.retarget_interval);
                }

                let velocity = self
                    .target
                    .and_then(&locate)
                    .map_or(Vec2::ZERO, |to| {
                        (to - me).normalize_or_zero() * stats.move_speed
                    });
                EnemyStep {
                    velocity: Some(velocity),
                    despawn: false,
                }
            }
        }
    }
}

/// Nearest living companion in sight; failing that, the nearest living player in sight.
pub fn pick_target(
    me: Vec2,
    sight: Option<f32>,
    companions: &[(Entity, Vec2)],
    players: &[(Entity, Vec2)],
) -> Option<Entity> {
    nearest_within(me, sight, companions).or_else(|| nearest_within(me, sight, players))
}

fn nearest_within(me: Vec2, sight: Option<f32>, candidates: &[(Entity, Vec2)]) -> Option<Entity> {
    let limit = sight.map_or(f32::INFINITY, |r| r * r);
    let mut best: Option<(Entity, f32)> = None;
    for &(e, p) in candidates {
        let d = me.distance_squared(p);
        if d > limit {
            continue;
        }
        if best.is_none_or(|(_, bd)| d < bd) {
            best = Some((e, d));
        }
    }
    best.map(|(e, _)| e)
}

pub fn plugin(app: &mut App) {
    app.add_systems(FixedUpdate, enemy_think.in_set(SimSet::Think))
        .add_systems(
            FixedPostUpdate,
            enemy_contact_attacks.in_set(SimSet::Sense),
        );
}

fn tier_color(tier: Tier) -> Color {
    match tier {
        Tier::One => Color::srgb(0.85, 0.35, 0.3),
        Tier::Two => Color::srgb(0.8, 0.2, 0.55),
        Tier::Three => Color::srgb(0.55, 0.15, 0.8),
    }
}

/// Spawns one enemy of the tier described by `stats` at `position`.
pub fn spawn_enemy(commands: &mut Commands, stats: &EnemyTunables, position: Vec2) -> Entity {
    let radius = stats.radius.max(1.0);
    commands
        .spawn((
            (
                Name::new(format!("Enemy{:?}", stats.tier)),
                Enemy,
                ActorKind::Enemy(stats.tier),
                EnemyStats::from(stats),
                EnemyBrain::default(),
                Health::full(stats.max_hp.max(1)),
                Invincibility::new(0.0),
                AnimationFlags::default(),
            ),
            Sprite {
                color: tier_color(stats.tier),
                custom_size: Some(Vec2::splat(radius * 2.0)),
                ..default()
            },
            Transform::from_translation(position.extend(1.0)),
            (
                RigidBody::Dynamic,
                Collider::circle(radius),
                LockedAxes::ROTATION_LOCKED,
                enemy_layers(),
                CollisionEventsEnabled,
                LinearVelocity::ZERO,
            ),
            Occluder2d::circle(radius),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}

type EnemyBody = (
    Entity,
    &'static Transform,
    &'static EnemyStats,
    &'static mut EnemyBrain,
    &'static mut LinearVelocity,
    &'static mut AnimationFlags,
    Option<&'static mut Sprite>,
    Has<Dead>,
);

fn enemy_think(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    mut enemies: Query<EnemyBody, (With<Enemy>, Without<PendingDespawn>)>,
    actors: Query<(Entity, &Transform, &ActorKind), Without<Dead>>,
) {
    let dt = time.delta_secs();

    let mut companions = Vec::new();
    let mut players = Vec::new();
    for (e, tf, kind) in &actors {
        match kind {
            ActorKind::Companion => companions.push((e, tf.translation.truncate())),
            ActorKind::Player => players.push((e, tf.translation.truncate())),
            ActorKind::Enemy(_) => {}
        }
    }
    let locate = |target: Entity| {
        companions
            .iter()
            .chain(players.iter())
            .find(|(e, _)| *e == target)
            .map(|&(_, p)| p)
    };

    for (e, tf, stats, mut brain, mut vel, mut flags, sprite, dead) in &mut enemies {
        if dead {
            brain.die();
        }
        let me = tf.translation.truncate();
        let step = brain.step(stats, dt, me, locate, || {
            pick_target(me, stats.sight_radius, &companions, &players)
        });

        if let Some(v) = step.velocity {
            vel.0 = v;
        }

        flags.is_dead = brain.is_dead();
        flags.is_moving = !flags.is_dead && vel.0.length_squared() > 0.0;
        flags.is_chasing = brain.state == EnemyState::Chasing && brain.target.is_some();

        if let (EnemyState::Dead { elapsed }, Some(mut sprite)) = (brain.state, sprite) {
            let t = (elapsed / stats.death_grace.max(0.0001)).clamp(0.0, 1.0);
            sprite.color.set_alpha(1.0 - t);
        }

        if step.despawn {
            commands.entity(e).insert(PendingDespawn);
        }
    }
}

fn enemy_contact_attacks(
    mut started: MessageReader<CollisionStart>,
    mut enemies: Query<
        (
            &Transform,
            &EnemyStats,
            &mut EnemyBrain,
            &mut LinearVelocity,
            &mut AnimationFlags,
        ),
        (With<Enemy>, Without<Dead>),
    >,
    others: Query<&Transform, (Without<Enemy>, Without<Dead>)>,
    mut damage: MessageWriter<DamageRequest>,
) {
    for ev in started.read() {
        let (a, b) = sides_of_start(ev);
        for (me, other) in [(a.owner(), b.owner()), (b.owner(), a.owner())] {
            let Ok((tf, stats, mut brain, mut vel, mut flags)) = enemies.get_mut(me) else {
                continue;
            };
            let Ok(other_tf) = others.get(other) else {
                continue;
            };
            if !brain.begin_attack(other) {
                continue;
            }

            let away = (tf.translation - other_tf.translation)
                .truncate()
                .normalize_or_zero();
            vel.0 = away * stats.reposition_speed;
            flags.is_attacking = true;
            flags.is_chasing = false;

            damage.write(DamageRequest {
                target: other,
                amount: stats.attack_damage,
            });
        }
    }
}
