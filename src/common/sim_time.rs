//! Simulation-time countdowns.
//!
//! Every delayed behaviour (invincibility, retargeting, spawn cadence, intermissions)
//! is a countdown advanced once per fixed tick. Clamping happens on write, so hot
//! code never has to check for negative time.

/// Non-negative seconds of simulation time left on a countdown.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct SimSeconds(f32);

impl SimSeconds {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn new(v: f32) -> Self {
        Self(v.max(0.0))
    }

    #[inline]
    pub fn tick_down(&mut self, dt: f32) {
        self.0 = (self.0 - dt).max(0.0);
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}
