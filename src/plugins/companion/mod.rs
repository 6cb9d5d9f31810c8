//! Companion plugin: a melee ally that only picks fights with enemies the player lights.
//!
//! ```text
//!  Idle --(lit, enemy in light)--> Chasing --(in range)--> Attacking --(combo spent)--> Cooldown
//!   ^                               ^   |                     |                           |
//!   |                               |   +----(out of range)---+                           |
//!   |                               +------------------(attack_cooldown)------------------+
//!   +---------------------------(lock-on target lost, any state)
//!
//!  Dead marker (any state) -> Dead { fade } --(fade_duration)--> PendingDespawn
//! ```
//!
//! The light only gates acquisition. Once locked on, the companion follows its target
//! out of the cone. With `release_lock_on_light_exit` set, a target that leaves the
//! cone while the companion is still chasing it is dropped.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::anim::AnimationFlags;
use crate::common::layers::companion_layers;
use crate::common::state::GameState;
use crate::common::tunables::{CompanionTunables, Tunables};
use crate::plugins::core::SimSet;
use crate::plugins::enemies::Enemy;
use crate::plugins::health::{
    ActorKind, DamageRequest, Dead, Health, Invincibility, PendingDespawn,
};
use crate::plugins::light_detection::{Illuminated, LightRegistry};

#[derive(Component, Debug, Clone, Copy)]
pub struct Companion;

#[derive(Component, Debug, Clone, PartialEq)]
pub struct CompanionStats {
    pub move_speed: f32,
    pub attack_range: f32,
    pub attack_interval: f32,
    pub attack_cooldown: f32,
    pub attack_damage: i32,
    pub combo_slashes: u8,
    pub fade_duration: f32,
    pub release_lock_on_light_exit: bool,
}

impl From<&CompanionTunables> for CompanionStats {
    fn from(t: &CompanionTunables) -> Self {
        Self {
            move_speed: t.move_speed,
            attack_range: t.attack_range,
            attack_interval: t.attack_interval,
            attack_cooldown: t.attack_cooldown,
            attack_damage: t.attack_damage,
            combo_slashes: t.combo_slashes.max(1),
            fade_duration: t.fade_duration,
            release_lock_on_light_exit: t.release_lock_on_light_exit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompanionState {
    Idle,
    Chasing,
    Attacking,
    Cooldown,
    /// `fade` counts up to `fade_duration`.
    Dead { fade: f32 },
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct CompanionBrain {
    pub state: CompanionState,
    pub lock_on: Option<Entity>,
    pub slashes_left: u8,
    /// Seconds since the last slash. Starts unbounded so the first slash is immediate.
    pub since_action: f32,
}

impl Default for CompanionBrain {
    fn default() -> Self {
        Self {
            state: CompanionState::Idle,
            lock_on: None,
            slashes_left: 0,
            since_action: f32::INFINITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CompanionStep {
    pub velocity: Vec2,
    /// Target of a slash landed this step.
    pub strike: Option<Entity>,
    pub despawn: bool,
}

impl CompanionBrain {
    pub fn is_dead(&self) -> bool {
        matches!(self.state, CompanionState::Dead { .. })
    }

    pub fn die(&mut self) {
        if !self.is_dead() {
            self.state = CompanionState::Dead { fade: 0.0 };
            self.lock_on = None;
        }
    }

    /// Opacity for presentation: 1 while alive, fading to 0 over the death phase.
    pub fn fade_alpha(&self, stats: &CompanionStats) -> f32 {
        match self.state {
            CompanionState::Dead { fade } => {
                1.0 - (fade / stats.fade_duration.max(0.0001)).clamp(0.0, 1.0)
            }
            _ => 1.0,
        }
    }

    /// The locked target left the light cone. Only a chasing companion with
    /// `release_lock_on_light_exit` set gives up; a fight in progress is finished.
    pub fn target_left_light(&mut self, stats: &CompanionStats) -> bool {
        if !stats.release_lock_on_light_exit
            || self.state != CompanionState::Chasing
            || self.lock_on.is_none()
        {
            return false;
        }
        self.unlock();
        true
    }

    fn unlock(&mut self) {
        self.lock_on = None;
        self.state = CompanionState::Idle;
    }

    /// `locate` resolves a living enemy's position; `acquire` asks the light registry
    /// for the nearest lit enemy.
    pub fn step(
        &mut self,
        stats: &CompanionStats,
        dt: f32,
        me: Vec2,
        lit: bool,
        locate: impl Fn(Entity) -> Option<Vec2>,
        acquire: impl FnOnce() -> Option<Entity>,
    ) -> CompanionStep {
        let mut step = CompanionStep::default();

        if let CompanionState::Dead { fade } = &mut self.state {
            let was_done = *fade >= stats.fade_duration;
            *fade += dt;
            step.despawn = !was_done && *fade >= stats.fade_duration;
            return step;
        }

        self.since_action += dt;

        let target = self.lock_on.and_then(|e| locate(e).map(|p| (e, p)));
        if self.lock_on.is_some() && target.is_none() {
            self.unlock();
        }

        let toward = |p: Vec2| (p - me).normalize_or_zero() * stats.move_speed;
        let in_range = |p: Vec2| me.distance(p) <= stats.attack_range;

        match (self.state, target) {
            (CompanionState::Idle, _) => {
                if lit && self.lock_on.is_none() {
                    if let Some(e) = acquire() {
                        self.lock_on = Some(e);
                        self.state = CompanionState::Chasing;
                    }
                }
            }
            (CompanionState::Chasing, Some((_, p))) => {
                if in_range(p) {
                    self.slashes_left = stats.combo_slashes;
                    self.state = CompanionState::Attacking;
                } else {
                    step.velocity = toward(p);
                }
            }
            (CompanionState::Attacking, Some((e, p))) => {
                if !in_range(p) {
                    self.state = CompanionState::Chasing;
                    step.velocity = toward(p);
                } else if self.since_action >= stats.attack_interval {
                    self.since_action = 0.0;
                    self.slashes_left = self.slashes_left.saturating_sub(1);
                    step.strike = Some(e);
                    if self.slashes_left == 0 {
                        self.state = CompanionState::Cooldown;
                    }
                }
            }
            (CompanionState::Cooldown, Some(_)) => {
                if self.since_action >= stats.attack_cooldown {
                    self.state = CompanionState::Chasing;
                }
            }
            // Lost targets were unlocked above; dead is handled before.
            _ => {}
        }

        step
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(FixedUpdate, companion_think.in_set(SimSet::Think));
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let t = &tunables.companion;
    let radius = t.radius.max(1.0);
    commands.spawn((
        (
            Name::new("Companion"),
            Companion,
            ActorKind::Companion,
            CompanionStats::from(t),
            CompanionBrain::default(),
            Health::full(t.max_health.max(1)),
            Invincibility::new(t.invincibility),
            Illuminated::default(),
            AnimationFlags::default(),
        ),
        Sprite {
            color: Color::srgb(0.95, 0.8, 0.35),
            custom_size: Some(Vec2::splat(radius * 2.0)),
            ..default()
        },
        Transform::from_xyz(t.spawn_offset[0], t.spawn_offset[1], 1.0),
        (
            RigidBody::Dynamic,
            Collider::circle(radius),
            LockedAxes::ROTATION_LOCKED,
            companion_layers(),
            LinearVelocity::ZERO,
        ),
        DespawnOnExit(GameState::InGame),
    ));
}

type CompanionBody = (
    Entity,
    &'static Transform,
    &'static CompanionStats,
    &'static mut CompanionBrain,
    &'static mut LinearVelocity,
    &'static mut AnimationFlags,
    &'static Illuminated,
    Option<&'static mut Sprite>,
    Has<Dead>,
);

fn companion_think(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    registry: Res<LightRegistry>,
    mut companions: Query<CompanionBody, (With<Companion>, Without<PendingDespawn>)>,
    enemies: Query<&Transform, (With<Enemy>, Without<Dead>)>,
    mut damage: MessageWriter<DamageRequest>,
) {
    let dt = time.delta_secs();
    let locate = |e: Entity| enemies.get(e).ok().map(|tf| tf.translation.truncate());

    for (e, tf, stats, mut brain, mut vel, mut flags, lit, sprite, dead) in &mut companions {
        if dead {
            brain.die();
        }
        if brain.lock_on.is_some_and(|t| !registry.contains(t)) {
            brain.target_left_light(stats);
        }
        let me = tf.translation.truncate();
        let step = brain.step(stats, dt, me, lit.0, locate, || {
            registry.nearest_in_light(me, locate)
        });

        vel.0 = step.velocity;
        if let Some(target) = step.strike {
            flags.is_attacking = true;
            damage.write(DamageRequest {
                target,
                amount: stats.attack_damage,
            });
        }

        flags.is_dead = brain.is_dead();
        flags.is_moving = step.velocity.length_squared() > 0.0;
        flags.is_chasing = brain.state == CompanionState::Chasing;

        if let Some(mut sprite) = sprite {
            let alpha = brain.fade_alpha(stats);
            if sprite.color.alpha() != alpha {
                sprite.color.set_alpha(alpha);
            }
        }

        if step.despawn {
            commands.entity(e).insert(PendingDespawn);
        }
    }
}
