//! Health plugin: hit points, invincibility windows and the single damage pipeline.
//!
//! ```text
//! Sense:    enemy contacts / companion strikes -> DamageRequest
//! Resolve:  apply_damage_requests -> ActorDamaged, ActorDied (once per actor)
//! Economy:  score + waves read ActorDied
//! PostUpdate: despawn_marked
//! ```
//!
//! Damage never arrives any other way, so "dead actors ignore damage" and "one hit per
//! invincibility window" are enforced in one place. The player has no `Health`
//! component: its half-hearts live on the `Session`.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::anim::AnimationFlags;
use crate::common::layers::{non_interacting, Layer};
use crate::common::messages::Notification;
use crate::common::sim_time::SimSeconds;
use crate::common::state::GameState;
use crate::common::tier::Tier;
use crate::plugins::core::SimSet;
use crate::plugins::score::Session;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    Player,
    Companion,
    Enemy(Tier),
}

impl ActorKind {
    fn layer(self) -> Layer {
        match self {
            ActorKind::Player => Layer::Player,
            ActorKind::Companion => Layer::Companion,
            ActorKind::Enemy(_) => Layer::Enemy,
        }
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        Self { current: max, max }
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }
}

/// Damage immunity after a hit. `window` is fixed per actor; `remaining` counts down.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Invincibility {
    pub window: f32,
    pub remaining: SimSeconds,
}

impl Invincibility {
    pub fn new(window: f32) -> Self {
        Self {
            window: window.max(0.0),
            remaining: SimSeconds::ZERO,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.remaining.is_positive()
    }

    /// Lets a hit through and arms the window, or refuses it while the window is open.
    #[inline]
    pub fn admit(&mut self) -> bool {
        if self.is_active() {
            return false;
        }
        self.remaining = SimSeconds::new(self.window);
        true
    }
}

/// Terminal marker: the actor stopped interacting and waits for its own despawn.
#[derive(Component, Debug, Clone, Copy)]
pub struct Dead;

/// Marker: remove the entity in `PostUpdate`, outside the fixed step.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Ignored,
    Wounded { remaining: i32 },
    Killed,
}

/// Applies one hit. Dead actors, non-positive amounts and open windows are no-ops.
pub fn apply_damage(health: &mut Health, inv: &mut Invincibility, amount: i32) -> DamageOutcome {
    if health.is_depleted() || amount <= 0 || !inv.admit() {
        return DamageOutcome::Ignored;
    }
    health.current = (health.current - amount).max(0);
    if health.is_depleted() {
        DamageOutcome::Killed
    } else {
        DamageOutcome::Wounded {
            remaining: health.current,
        }
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRequest {
    pub target: Entity,
    pub amount: i32,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorDamaged {
    pub entity: Entity,
    pub kind: ActorKind,
    pub amount: i32,
    pub remaining: i32,
}

#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct ActorDied {
    pub entity: Entity,
    pub kind: ActorKind,
    pub position: Vec2,
}

pub fn plugin(app: &mut App) {
    app.add_message::<DamageRequest>()
        .add_message::<ActorDamaged>()
        .add_message::<ActorDied>();

    app.add_systems(FixedUpdate, tick_invincibility.in_set(SimSet::Prepare))
        .add_systems(
            FixedPostUpdate,
            apply_damage_requests.in_set(SimSet::Resolve),
        )
        .add_systems(
            PostUpdate,
            despawn_marked.run_if(in_state(GameState::InGame)),
        );
}

fn tick_invincibility(time: Res<Time<Fixed>>, mut q: Query<&mut Invincibility>) {
    let dt = time.delta_secs();
    for mut inv in &mut q {
        if inv.is_active() {
            inv.remaining.tick_down(dt);
        }
    }
}

type DamageTarget = (
    &'static ActorKind,
    &'static Transform,
    &'static mut Invincibility,
    Option<&'static mut Health>,
    Option<&'static mut AnimationFlags>,
    Option<&'static mut LinearVelocity>,
    Option<&'static mut CollisionLayers>,
);

pub(crate) fn apply_damage_requests(
    mut commands: Commands,
    mut requests: MessageReader<DamageRequest>,
    mut damaged: MessageWriter<ActorDamaged>,
    mut died: MessageWriter<ActorDied>,
    mut notifications: MessageWriter<Notification>,
    mut session: Option<ResMut<Session>>,
    mut q: Query<DamageTarget, Without<Dead>>,
) {
    let mut out = Vec::new();

    for req in requests.read() {
        // Dead or despawned targets are simply not in the query.
        let Ok((kind, tf, mut inv, health, mut flags, vel, layers)) = q.get_mut(req.target) else {
            continue;
        };

        let outcome = match (*kind, health) {
            (ActorKind::Player, _) => {
                let Some(session) = session.as_deref_mut() else {
                    continue;
                };
                if session.half_hearts() <= 0 || req.amount <= 0 || !inv.admit() {
                    DamageOutcome::Ignored
                } else {
                    match session.damage_player(req.amount, &mut out) {
                        0 => DamageOutcome::Killed,
                        remaining => DamageOutcome::Wounded { remaining },
                    }
                }
            }
            (_, Some(mut health)) => apply_damage(&mut health, &mut inv, req.amount),
            (_, None) => continue,
        };

        let remaining = match outcome {
            DamageOutcome::Ignored => continue,
            DamageOutcome::Wounded { remaining } => remaining,
            DamageOutcome::Killed => 0,
        };

        damaged.write(ActorDamaged {
            entity: req.target,
            kind: *kind,
            amount: req.amount,
            remaining,
        });

        if let Some(flags) = flags.as_deref_mut() {
            flags.is_damaged = true;
        }

        if outcome == DamageOutcome::Killed {
            if let Some(flags) = flags.as_deref_mut() {
                flags.is_dead = true;
                flags.is_moving = false;
                flags.is_chasing = false;
            }
            if let Some(mut vel) = vel {
                vel.0 = Vec2::ZERO;
            }
            if let Some(mut layers) = layers {
                *layers = non_interacting(kind.layer());
            }
            commands.entity(req.target).insert(Dead);
            died.write(ActorDied {
                entity: req.target,
                kind: *kind,
                position: tf.translation.truncate(),
            });
        }
    }

    notifications.write_batch(out);
}

/// Centralized structural cleanup after fixed-step work is done.
fn despawn_marked(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
