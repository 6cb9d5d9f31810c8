//! Enemy strength classes.

use serde::{Deserialize, Serialize};

/// Enemy tier. Determines stats, score value and drop odds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    One,
    Two,
    Three,
}

impl Tier {
    /// Round-robin order used by the spawner.
    pub const ALL: [Tier; 3] = [Tier::One, Tier::Two, Tier::Three];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Tier::One => 0,
            Tier::Two => 1,
            Tier::Three => 2,
        }
    }

    #[inline]
    pub const fn level(self) -> u8 {
        self.index() as u8 + 1
    }
}
