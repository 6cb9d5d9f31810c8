//! Configuration errors.
//!
//! The simulation itself never fails; anomalies degrade to idle behaviour. Only
//! loading and validating `Tunables` can produce an error.

use thiserror::Error;

use super::tier::Tier;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tunables from '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed tunables: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("max hearts must be positive, got {0}")]
    NoHearts(i32),

    #[error("companion combo must have at least one slash")]
    EmptyCombo,

    #[error("{what} must be a probability in [0, 1], got {value}")]
    ProbabilityOutOfRange { what: &'static str, value: f32 },

    #[error("{what} must not be negative, got {value}")]
    Negative { what: &'static str, value: f32 },

    #[error("tier {0:?} is configured more than once")]
    DuplicateTier(Tier),

    #[error(
        "tier {tier:?}: reposition duration {reposition}s exceeds attack cooldown {cooldown}s"
    )]
    RepositionExceedsCooldown {
        tier: Tier,
        reposition: f32,
        cooldown: f32,
    },
}
