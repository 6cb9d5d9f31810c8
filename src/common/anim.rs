//! Animation-state flags exposed to the presentation layer.
//!
//! The simulation writes these; an animator (out of this crate) reads them once per
//! frame. `is_attacking` and `is_damaged` are triggers: they are raised during a tick
//! and cleared at the start of the next one.

use bevy::prelude::*;

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFlags {
    pub is_moving: bool,
    pub is_chasing: bool,
    pub is_attacking: bool,
    pub is_damaged: bool,
    pub is_dead: bool,
}

impl AnimationFlags {
    #[inline]
    pub fn clear_triggers(&mut self) {
        self.is_attacking = false;
        self.is_damaged = false;
    }
}

pub fn clear_animation_triggers(mut q: Query<&mut AnimationFlags>) {
    for mut flags in &mut q {
        if flags.is_attacking || flags.is_damaged {
            flags.clear_triggers();
        }
    }
}
