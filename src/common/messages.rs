//! Outbound notifications for presentation collaborators.
//!
//! This is the session's outbox: the score and wave modules push notifications while
//! they mutate state, and systems forward them into `Messages<Notification>` at the
//! end of the step. HUD, audio and animation layers read them once per frame.

use bevy::prelude::*;

use super::tier::Tier;

/// A resource granted by an enemy kill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pickup {
    Battery { percent: f32 },
    HalfHearts { count: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Victory,
    Defeat,
}

/// How a session ended and how long it took, in simulation seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub duration: f32,
}

#[derive(Message, Debug, Clone, PartialEq)]
pub enum Notification {
    HeartsChanged { current: i32, max: i32 },
    BatteryChanged { percent: f32 },
    ScoreChanged { score: u32 },
    PlayerDamaged { amount: i32, remaining: i32 },
    PlayerDied,
    EnemyKilled { tier: Tier },
    DropAwarded { pickup: Pickup, position: Vec2 },
    WaveProgress { progress: f32 },
    /// `index` is zero-based.
    WaveChanged { index: usize, total: usize },
    AllWavesCleared,
    SessionEnded { outcome: Outcome },
}

impl Notification {
    /// Notifications that change what the session *is*, as opposed to HUD ticks.
    pub fn is_milestone(&self) -> bool {
        matches!(
            self,
            Notification::PlayerDied
                | Notification::WaveChanged { .. }
                | Notification::AllWavesCleared
                | Notification::SessionEnded { .. }
        )
    }
}
