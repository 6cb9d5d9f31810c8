//! Score plugin: the session record and the kill economy.
//!
//! `Session` owns everything the HUD shows (score, half-hearts, battery) plus the
//! outcome. It is inserted fresh on entering `InGame` and kept through `GameOver` so
//! results stay readable.
//!
//! Within one tick a kill always lands in this order:
//!
//! ```text
//! ActorDied(Enemy) -> points + drops -> WaveTracker::notify_enemy_killed -> outcome
//! ```

use bevy::prelude::*;

use crate::common::messages::{Notification, Outcome, OutcomeKind, Pickup};
use crate::common::rng::SimRng;
use crate::common::state::GameState;
use crate::common::tier::Tier;
use crate::common::tunables::{KillRewards, PlayerTunables, Tunables};
use crate::plugins::core::SimSet;
use crate::plugins::health::{ActorDied, ActorKind};
use crate::plugins::waves::WaveTracker;

pub const MAX_BATTERY: f32 = 100.0;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Session {
    score: u32,
    half_hearts: i32,
    max_hearts: i32,
    battery: f32,
    elapsed: f32,
    outcome: Option<Outcome>,
}

impl Session {
    pub fn new(player: &PlayerTunables) -> Self {
        let max_hearts = player.max_hearts.max(1);
        Self {
            score: 0,
            half_hearts: max_hearts * 2,
            max_hearts,
            battery: player.starting_battery.clamp(0.0, MAX_BATTERY),
            elapsed: 0.0,
            outcome: None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn half_hearts(&self) -> i32 {
        self.half_hearts
    }

    pub fn max_half_hearts(&self) -> i32 {
        self.max_hearts * 2
    }

    pub fn battery(&self) -> f32 {
        self.battery
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn in_progress(&self) -> bool {
        self.outcome.is_none()
    }

    pub fn tick(&mut self, dt: f32) {
        if self.in_progress() {
            self.elapsed += dt.max(0.0);
        }
    }

    /// Initial values, so presentation can draw before anything happens.
    pub fn announce(&self, out: &mut Vec<Notification>) {
        out.push(self.hearts_changed());
        out.push(Notification::BatteryChanged {
            percent: self.battery,
        });
        out.push(Notification::ScoreChanged { score: self.score });
    }

    pub fn add_score(&mut self, points: u32, out: &mut Vec<Notification>) {
        self.score = self.score.saturating_add(points);
        out.push(Notification::ScoreChanged { score: self.score });
    }

    /// Removes half-hearts from the player and returns what is left. Reaching zero
    /// ends the session as a defeat.
    pub fn damage_player(&mut self, amount: i32, out: &mut Vec<Notification>) -> i32 {
        if amount <= 0 || self.half_hearts <= 0 {
            return self.half_hearts;
        }
        self.half_hearts = (self.half_hearts - amount).max(0);
        out.push(Notification::PlayerDamaged {
            amount,
            remaining: self.half_hearts,
        });
        out.push(self.hearts_changed());

        if self.half_hearts == 0 {
            out.push(Notification::PlayerDied);
            self.conclude(OutcomeKind::Defeat, out);
        }
        self.half_hearts
    }

    pub fn add_half_hearts(&mut self, count: i32, out: &mut Vec<Notification>) {
        self.half_hearts = (self.half_hearts + count).clamp(0, self.max_half_hearts());
        out.push(self.hearts_changed());
    }

    pub fn add_battery(&mut self, delta: f32, out: &mut Vec<Notification>) {
        self.battery = (self.battery + delta).clamp(0.0, MAX_BATTERY);
        out.push(Notification::BatteryChanged {
            percent: self.battery,
        });
    }

    /// Points first, then each drop on its own independent draw.
    pub fn register_enemy_kill(
        &mut self,
        tier: Tier,
        rewards: &KillRewards,
        rng: &mut SimRng,
        position: Vec2,
        out: &mut Vec<Notification>,
    ) {
        self.add_score(rewards.points, out);

        if rng.chance(rewards.battery.chance) {
            let percent = rewards.battery.percent;
            self.add_battery(percent, out);
            out.push(Notification::DropAwarded {
                pickup: Pickup::Battery { percent },
                position,
            });
        }

        if rng.chance(rewards.half_heart.chance) {
            let count = rewards.half_heart.half_hearts;
            self.add_half_hearts(count, out);
            out.push(Notification::DropAwarded {
                pickup: Pickup::HalfHearts { count },
                position,
            });
        }

        out.push(Notification::EnemyKilled { tier });
    }

    pub fn declare_victory(&mut self, out: &mut Vec<Notification>) {
        self.conclude(OutcomeKind::Victory, out);
    }

    fn conclude(&mut self, kind: OutcomeKind, out: &mut Vec<Notification>) {
        if self.outcome.is_some() {
            return;
        }
        let outcome = Outcome {
            kind,
            duration: self.elapsed,
        };
        self.outcome = Some(outcome);
        out.push(Notification::SessionEnded { outcome });
    }

    fn hearts_changed(&self) -> Notification {
        Notification::HeartsChanged {
            current: self.half_hearts,
            max: self.max_half_hearts(),
        }
    }
}

/// Run condition: a session exists and has no outcome yet.
pub fn session_in_progress(session: Option<Res<Session>>) -> bool {
    session.is_some_and(|s| s.in_progress())
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), start_session)
        .add_systems(FixedUpdate, tick_session_clock.in_set(SimSet::Prepare))
        .add_systems(
            FixedPostUpdate,
            (resolve_enemy_kills, conclude_on_all_waves_cleared)
                .chain()
                .in_set(SimSet::Economy),
        )
        // Outside the gated sets: it has to run on the tick the outcome appears.
        .add_systems(
            FixedPostUpdate,
            enter_game_over
                .after(SimSet::Economy)
                .run_if(in_state(GameState::InGame)),
        );
}

fn start_session(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut notifications: MessageWriter<Notification>,
) {
    let session = Session::new(&tunables.player);
    let mut out = Vec::new();
    session.announce(&mut out);
    notifications.write_batch(out);
    commands.insert_resource(session);
}

fn tick_session_clock(time: Res<Time<Fixed>>, mut session: ResMut<Session>) {
    session.tick(time.delta_secs());
}

pub(crate) fn resolve_enemy_kills(
    mut died: MessageReader<ActorDied>,
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut session: ResMut<Session>,
    mut tracker: Option<ResMut<WaveTracker>>,
    mut notifications: MessageWriter<Notification>,
) {
    let mut out = Vec::new();

    for ev in died.read() {
        let ActorKind::Enemy(tier) = ev.kind else {
            continue;
        };
        let rewards = tunables
            .enemy(tier)
            .map_or_else(|| KillRewards::for_tier(tier), |e| e.rewards);

        session.register_enemy_kill(tier, &rewards, &mut rng, ev.position, &mut out);
        if let Some(tracker) = tracker.as_deref_mut() {
            tracker.notify_enemy_killed(tier, &mut out);
        }
    }

    notifications.write_batch(out);
}

fn conclude_on_all_waves_cleared(
    tracker: Option<Res<WaveTracker>>,
    mut session: ResMut<Session>,
    mut notifications: MessageWriter<Notification>,
) {
    if !tracker.is_some_and(|t| t.is_cleared()) || !session.in_progress() {
        return;
    }
    let mut out = Vec::new();
    session.declare_victory(&mut out);
    notifications.write_batch(out);
}

fn enter_game_over(
    session: Option<Res<Session>>,
    next: Option<ResMut<NextState<GameState>>>,
) {
    let Some(outcome) = session.and_then(|s| s.outcome()) else {
        return;
    };
    let Some(mut next) = next else {
        return;
    };
    info!(
        "session over: {:?} after {:.1}s",
        outcome.kind, outcome.duration
    );
    next.set(GameState::GameOver);
}

#[cfg(test)]
mod tests;
