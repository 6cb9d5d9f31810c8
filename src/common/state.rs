//! Global state machine.
//!
//! `InGame` owns every simulated entity (`DespawnOnExit`). Once the session has an
//! outcome the score plugin moves to `GameOver`; the `Session` resource survives the
//! transition so results stay readable.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    GameOver,
}
