//! Test helpers.
//!
//! `World::run_system_once` runs a single system without a schedule. Systems that use
//! `Commands` only enqueue structural changes, so we `flush()` afterwards to apply them
//! before assertions.

use std::time::Duration;

use bevy::ecs::message::Message;
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::common::messages::Notification;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A `Time<Fixed>` whose last step lasted `dt` seconds.
pub fn fixed_time_with_delta(dt: f32) -> Time<Fixed> {
    let mut t = Time::<Fixed>::default();
    t.advance_by(Duration::from_secs_f32(dt));
    t
}

/// Replace the fixed clock so the next system run sees a step of `dt` seconds.
pub fn set_fixed_delta(world: &mut World, dt: f32) {
    world.insert_resource(fixed_time_with_delta(dt));
}

/// Take every message of type `M` written so far.
pub fn drain_messages<M: Message>(world: &mut World) -> Vec<M> {
    world.resource_mut::<Messages<M>>().drain().collect()
}

/// Register the message queues the simulation systems read and write.
pub fn init_sim_messages(world: &mut World) {
    world.init_resource::<Messages<Notification>>();
    world.init_resource::<Messages<crate::plugins::health::DamageRequest>>();
    world.init_resource::<Messages<crate::plugins::health::ActorDamaged>>();
    world.init_resource::<Messages<crate::plugins::health::ActorDied>>();
    world.init_resource::<Messages<avian2d::prelude::CollisionStart>>();
    world.init_resource::<Messages<avian2d::prelude::CollisionEnd>>();
}

/// Tiny deterministic PRNG for property-style tests (xorshift64*).
#[derive(Clone, Copy)]
pub struct TestRng(u64);

impl TestRng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform in `lo..=hi`.
    #[inline]
    pub fn range_i32(&mut self, lo: i32, hi: i32) -> i32 {
        let span = (hi - lo + 1).max(1) as u64;
        lo + (self.next_u64() % span) as i32
    }
}
