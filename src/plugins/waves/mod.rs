//! Waves plugin: the spawn schedule and wave progress tracking.
//!
//! A wave is a fixed number of enemies per tier. The tracker counts kills against
//! that total and only moves on when every enemy of the wave was killed and none is
//! left alive:
//!
//! ```text
//! start_next_wave -> [SpawnSchedule ticks] -> kills == total && alive == 0
//!     -> intermission (time_between_waves) -> start_next_wave -> ... -> AllWavesCleared
//! ```
//!
//! Counters only change in two places: `Spawn` (alive += 1) and `Economy` (kills).

use bevy::prelude::*;

use crate::common::messages::Notification;
use crate::common::rng::SimRng;
use crate::common::sim_time::SimSeconds;
use crate::common::state::GameState;
use crate::common::tier::Tier;
use crate::common::tunables::{SpawnArea, Tunables, WaveDefinition, WaveTunables};
use crate::plugins::core::SimSet;
use crate::plugins::enemies::spawn_enemy;

/// Ticks with living enemies and no kill before the tracker reports a stall
/// (about 30 s at the default 64 Hz).
pub const STALL_WARNING_TICKS: u32 = 64 * 30;

/// Round-robin over tiers, one enemy per step, `interval` seconds apart. The first
/// spawn is due immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSchedule {
    remaining: [u32; 3],
    cursor: usize,
    interval: f32,
    /// Seconds until the next spawn; goes negative to carry overshoot between ticks.
    wait: f32,
}

impl SpawnSchedule {
    pub fn new(def: &WaveDefinition) -> Self {
        Self {
            remaining: def.counts(),
            cursor: 0,
            interval: def.spawn_interval.max(0.0),
            wait: 0.0,
        }
    }

    pub fn pending(&self) -> u32 {
        self.remaining.iter().sum()
    }

    pub fn is_finished(&self) -> bool {
        self.pending() == 0
    }

    /// Advances the schedule and returns the tiers due this tick, in spawn order.
    pub fn tick(&mut self, dt: f32) -> Vec<Tier> {
        let mut due = Vec::new();
        if self.is_finished() {
            return due;
        }
        self.wait -= dt.max(0.0);
        while self.wait <= 0.0 {
            let Some(tier) = self.next_tier() else {
                break;
            };
            due.push(tier);
            self.wait += self.interval;
        }
        due
    }

    fn next_tier(&mut self) -> Option<Tier> {
        for _ in 0..Tier::ALL.len() {
            let i = self.cursor;
            self.cursor = (self.cursor + 1) % Tier::ALL.len();
            if self.remaining[i] > 0 {
                self.remaining[i] -= 1;
                return Some(Tier::ALL[i]);
            }
        }
        None
    }
}

#[derive(Resource, Debug, Clone)]
pub struct WaveTracker {
    definitions: Vec<WaveDefinition>,
    time_between_waves: f32,
    /// `None` until the first wave starts.
    current: Option<usize>,
    kills: u32,
    alive: u32,
    total: u32,
    progress: f32,
    schedule: Option<SpawnSchedule>,
    intermission: Option<SimSeconds>,
    cleared: bool,
    ticks_since_last_kill: u32,
    stall_reported: bool,
}

impl WaveTracker {
    pub fn new(definitions: Vec<WaveDefinition>, time_between_waves: f32) -> Self {
        Self {
            definitions,
            time_between_waves: time_between_waves.max(0.0),
            current: None,
            kills: 0,
            alive: 0,
            total: 0,
            progress: 0.0,
            schedule: None,
            intermission: None,
            cleared: false,
            ticks_since_last_kill: 0,
            stall_reported: false,
        }
    }

    pub fn from_tunables(waves: &WaveTunables) -> Self {
        Self::new(waves.definitions.clone(), waves.time_between_waves)
    }

    pub fn current_wave(&self) -> Option<usize> {
        self.current
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn alive(&self) -> u32 {
        self.alive
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn in_intermission(&self) -> bool {
        self.intermission.is_some()
    }

    pub fn pending_spawns(&self) -> u32 {
        self.schedule.as_ref().map_or(0, SpawnSchedule::pending)
    }

    pub fn ticks_since_last_kill(&self) -> u32 {
        self.ticks_since_last_kill
    }

    /// Moves to the next wave and replaces the spawn schedule. Past the last wave the
    /// tracker is cleared for good.
    pub fn start_next_wave(&mut self, out: &mut Vec<Notification>) {
        if self.cleared {
            return;
        }
        let index = self.current.map_or(0, |i| i + 1);
        self.current = Some(index);
        self.intermission = None;
        self.schedule = None;

        let Some(def) = self.definitions.get(index) else {
            self.cleared = true;
            out.push(Notification::AllWavesCleared);
            return;
        };

        self.kills = 0;
        self.alive = 0;
        self.total = def.total();
        self.progress = 0.0;
        self.ticks_since_last_kill = 0;
        self.stall_reported = false;
        self.schedule = Some(SpawnSchedule::new(def));

        out.push(Notification::WaveProgress { progress: 0.0 });
        out.push(Notification::WaveChanged {
            index,
            total: self.definitions.len(),
        });

        if self.total == 0 {
            self.progress = 1.0;
            out.push(Notification::WaveProgress { progress: 1.0 });
            self.finish_wave(out);
        }
    }

    pub fn record_spawn(&mut self) {
        self.alive += 1;
    }

    pub fn notify_enemy_killed(&mut self, tier: Tier, out: &mut Vec<Notification>) {
        if self.current.is_none() || self.cleared || self.in_intermission() {
            debug!("kill of {tier:?} outside an active wave ignored");
            return;
        }
        self.kills = (self.kills + 1).min(self.total);
        self.alive = self.alive.saturating_sub(1);
        self.progress = if self.total == 0 {
            1.0
        } else {
            self.kills as f32 / self.total as f32
        };
        self.ticks_since_last_kill = 0;
        self.stall_reported = false;
        out.push(Notification::WaveProgress {
            progress: self.progress,
        });

        if self.kills == self.total && self.alive == 0 {
            self.finish_wave(out);
        }
    }

    /// Advances the intermission or the spawn schedule. Returns the tiers to spawn now.
    pub fn tick(&mut self, dt: f32, out: &mut Vec<Notification>) -> Vec<Tier> {
        if self.cleared {
            return Vec::new();
        }

        if let Some(wait) = self.intermission.as_mut() {
            wait.tick_down(dt);
            if wait.is_positive() {
                return Vec::new();
            }
            self.start_next_wave(out);
        }

        if self.alive > 0 {
            self.ticks_since_last_kill = self.ticks_since_last_kill.saturating_add(1);
        }

        self.schedule
            .as_mut()
            .map(|s| s.tick(dt))
            .unwrap_or_default()
    }

    /// True once per stall streak: living enemies, no kill for `STALL_WARNING_TICKS`.
    pub fn take_stall_report(&mut self) -> bool {
        if self.stall_reported || self.alive == 0 || self.ticks_since_last_kill < STALL_WARNING_TICKS {
            return false;
        }
        self.stall_reported = true;
        true
    }

    fn finish_wave(&mut self, out: &mut Vec<Notification>) {
        self.schedule = None;
        if self.time_between_waves <= 0.0 {
            self.start_next_wave(out);
        } else {
            self.intermission = Some(SimSeconds::new(self.time_between_waves));
        }
    }
}

/// Starts the first wave when `auto_start` is off.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct StartWaves;

pub fn plugin(app: &mut App) {
    app.add_message::<StartWaves>()
        .add_systems(OnEnter(GameState::InGame), reset_waves)
        .add_systems(FixedUpdate, run_wave_schedule.in_set(SimSet::Spawn));
}

/// Uniform point inside a bounded area, the fixed center otherwise.
pub fn sample_spawn_point(areas: &[SpawnArea], rng: &mut SimRng) -> Option<Vec2> {
    let area = areas.get(rng.index(areas.len())?)?;
    let center = Vec2::from(area.center);
    Some(match area.half_extents {
        Some([hx, hy]) => {
            let (hx, hy) = (hx.abs(), hy.abs());
            center + Vec2::new(rng.range(-hx, hx), rng.range(-hy, hy))
        }
        None => center,
    })
}

fn reset_waves(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut notifications: MessageWriter<Notification>,
) {
    let mut tracker = WaveTracker::from_tunables(&tunables.waves);
    if tunables.waves.auto_start {
        let mut out = Vec::new();
        tracker.start_next_wave(&mut out);
        notifications.write_batch(out);
    }
    commands.insert_resource(tracker);
}

fn run_wave_schedule(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    tunables: Res<Tunables>,
    mut rng: ResMut<SimRng>,
    mut tracker: ResMut<WaveTracker>,
    mut start: MessageReader<StartWaves>,
    mut notifications: MessageWriter<Notification>,
) {
    let mut out = Vec::new();

    if start.read().count() > 0 && tracker.current_wave().is_none() {
        tracker.start_next_wave(&mut out);
    }

    for tier in tracker.tick(time.delta_secs(), &mut out) {
        let Some(stats) = tunables.enemy(tier) else {
            warn!("no stats configured for {tier:?}; spawn skipped");
            continue;
        };
        let Some(position) = sample_spawn_point(&tunables.waves.spawn_areas, &mut rng) else {
            warn!("no spawn areas configured; {tier:?} spawn skipped");
            continue;
        };
        spawn_enemy(&mut commands, stats, position);
        tracker.record_spawn();
    }

    if tracker.take_stall_report() {
        warn!(
            "wave {:?} stalled: {} alive, {}/{} killed, {} still to spawn, no kill for {} ticks",
            tracker.current_wave(),
            tracker.alive(),
            tracker.kills(),
            tracker.total(),
            tracker.pending_spawns(),
            tracker.ticks_since_last_kill()
        );
    }

    notifications.write_batch(out);
}
