//! Tunable gameplay constants.
//!
//! Everything static about a session lives here: actor stats, per-tier rewards, light
//! cone geometry and the wave list. The binary reads `assets/tunables.ron`; tests build
//! the struct directly. Every section is `#[serde(default)]`, so a file only has to
//! name the values it changes.

use std::collections::HashSet;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::tier::Tier;

pub const TUNABLES_PATH: &str = "assets/tunables.ron";

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    /// Fixed seed for drops and spawn sampling. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub arena: ArenaTunables,
    pub light: LightTunables,
    pub player: PlayerTunables,
    pub companion: CompanionTunables,
    pub enemies: Vec<EnemyTunables>,
    pub waves: WaveTunables,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            seed: None,
            arena: ArenaTunables::default(),
            light: LightTunables::default(),
            player: PlayerTunables::default(),
            companion: CompanionTunables::default(),
            enemies: Tier::ALL.into_iter().map(EnemyTunables::for_tier).collect(),
            waves: WaveTunables::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaTunables {
    pub half_width: f32,
    pub half_height: f32,
    pub wall_thickness: f32,
}

impl Default for ArenaTunables {
    fn default() -> Self {
        Self {
            half_width: 1024.0,
            half_height: 576.0,
            wall_thickness: 30.0,
        }
    }
}

/// Flashlight cone geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightTunables {
    pub cone_angle_degrees: f32,
    pub cone_distance: f32,
}

impl Default for LightTunables {
    fn default() -> Self {
        Self {
            cone_angle_degrees: 30.0,
            cone_distance: 240.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTunables {
    /// Whole hearts; the session tracks half-hearts.
    pub max_hearts: i32,
    pub starting_battery: f32,
    pub move_speed: f32,
    pub radius: f32,
    pub invincibility: f32,
    /// Radians per second blended toward the aim direction.
    pub aim_speed: f32,
    pub aim_distance: f32,
    pub flashlight_offset: [f32; 2],
}

impl Default for PlayerTunables {
    fn default() -> Self {
        Self {
            max_hearts: 3,
            starting_battery: 100.0,
            move_speed: 100.0,
            radius: 13.0,
            invincibility: 2.0,
            aim_speed: 10.0,
            aim_distance: 10.0,
            flashlight_offset: [0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionTunables {
    /// Half-hearts.
    pub max_health: i32,
    pub move_speed: f32,
    pub radius: f32,
    pub attack_range: f32,
    pub attack_interval: f32,
    pub attack_cooldown: f32,
    pub attack_damage: i32,
    pub combo_slashes: u8,
    pub invincibility: f32,
    pub fade_duration: f32,
    pub spawn_offset: [f32; 2],
    pub release_lock_on_light_exit: bool,
}

impl Default for CompanionTunables {
    fn default() -> Self {
        Self {
            max_health: 6,
            move_speed: 40.0,
            radius: 11.0,
            attack_range: 28.0,
            attack_interval: 0.2,
            attack_cooldown: 0.5,
            attack_damage: 1,
            combo_slashes: 2,
            invincibility: 0.5,
            fade_duration: 1.0,
            spawn_offset: [-30.0, 0.0],
            release_lock_on_light_exit: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryDrop {
    pub chance: f32,
    pub percent: f32,
}

impl Default for BatteryDrop {
    fn default() -> Self {
        Self {
            chance: 0.0,
            percent: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartDrop {
    pub chance: f32,
    pub half_hearts: i32,
}

impl Default for HeartDrop {
    fn default() -> Self {
        Self {
            chance: 0.0,
            half_hearts: 0,
        }
    }
}

/// What a kill of one tier is worth.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KillRewards {
    pub points: u32,
    pub battery: BatteryDrop,
    pub half_heart: HeartDrop,
}

impl KillRewards {
    pub fn for_tier(tier: Tier) -> Self {
        match tier {
            Tier::One => Self {
                points: 10,
                ..default()
            },
            Tier::Two => Self {
                points: 20,
                battery: BatteryDrop {
                    chance: 0.30,
                    percent: 15.0,
                },
                ..default()
            },
            Tier::Three => Self {
                points: 30,
                battery: BatteryDrop {
                    chance: 0.50,
                    percent: 20.0,
                },
                half_heart: HeartDrop {
                    chance: 0.20,
                    half_hearts: 1,
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTunables {
    pub tier: Tier,
    pub max_hp: i32,
    pub move_speed: f32,
    pub radius: f32,
    pub attack_damage: i32,
    pub attack_cooldown: f32,
    pub reposition_speed: f32,
    pub reposition_duration: f32,
    /// `None` means the enemy sees the whole arena.
    pub sight_radius: Option<f32>,
    pub retarget_interval: f32,
    pub death_grace: f32,
    pub rewards: KillRewards,
}

impl Default for EnemyTunables {
    fn default() -> Self {
        Self::for_tier(Tier::One)
    }
}

impl EnemyTunables {
    pub fn for_tier(tier: Tier) -> Self {
        let level = tier.level();
        Self {
            tier,
            max_hp: i32::from(level),
            move_speed: 80.0 - 20.0 * f32::from(level),
            radius: 12.0,
            attack_damage: 1,
            attack_cooldown: 1.5,
            reposition_speed: 60.0,
            reposition_duration: 0.2,
            sight_radius: None,
            retarget_interval: 0.5,
            death_grace: 1.0,
            rewards: KillRewards::for_tier(tier),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveDefinition {
    pub tier1: u32,
    pub tier2: u32,
    pub tier3: u32,
    /// Seconds between individual spawns.
    pub spawn_interval: f32,
}

impl Default for WaveDefinition {
    fn default() -> Self {
        Self {
            tier1: 0,
            tier2: 0,
            tier3: 0,
            spawn_interval: 1.0,
        }
    }
}

impl WaveDefinition {
    pub fn counts(&self) -> [u32; 3] {
        [self.tier1, self.tier2, self.tier3]
    }

    pub fn total(&self) -> u32 {
        self.tier1 + self.tier2 + self.tier3
    }
}

/// A spawn location. Bounded areas are sampled uniformly; unbounded ones always yield
/// their center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnArea {
    pub center: [f32; 2],
    pub half_extents: Option<[f32; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTunables {
    pub definitions: Vec<WaveDefinition>,
    pub time_between_waves: f32,
    pub auto_start: bool,
    pub spawn_areas: Vec<SpawnArea>,
}

impl Default for WaveTunables {
    fn default() -> Self {
        let wave = |tier1, tier2, tier3, spawn_interval| WaveDefinition {
            tier1,
            tier2,
            tier3,
            spawn_interval,
        };
        Self {
            definitions: vec![wave(6, 0, 0, 1.0), wave(6, 3, 0, 0.8), wave(6, 4, 2, 0.6)],
            time_between_waves: 2.0,
            auto_start: true,
            spawn_areas: vec![
                SpawnArea {
                    center: [-900.0, 0.0],
                    half_extents: Some([40.0, 400.0]),
                },
                SpawnArea {
                    center: [900.0, 0.0],
                    half_extents: Some([40.0, 400.0]),
                },
            ],
        }
    }
}

impl Tunables {
    pub fn enemy(&self, tier: Tier) -> Option<&EnemyTunables> {
        self.enemies.iter().find(|e| e.tier == tier)
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let tunables: Self = ron::from_str(text)?;
        tunables.validate()?;
        Ok(tunables)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.player.max_hearts <= 0 {
            return Err(ConfigError::NoHearts(self.player.max_hearts));
        }
        if self.companion.combo_slashes == 0 {
            return Err(ConfigError::EmptyCombo);
        }

        non_negative("player invincibility", self.player.invincibility)?;
        non_negative("companion attack interval", self.companion.attack_interval)?;
        non_negative("companion attack cooldown", self.companion.attack_cooldown)?;
        non_negative("companion invincibility", self.companion.invincibility)?;
        non_negative("companion fade duration", self.companion.fade_duration)?;
        non_negative("time between waves", self.waves.time_between_waves)?;
        for wave in &self.waves.definitions {
            non_negative("spawn interval", wave.spawn_interval)?;
        }

        let mut seen = HashSet::new();
        for enemy in &self.enemies {
            if !seen.insert(enemy.tier) {
                return Err(ConfigError::DuplicateTier(enemy.tier));
            }
            non_negative("attack cooldown", enemy.attack_cooldown)?;
            non_negative("reposition duration", enemy.reposition_duration)?;
            non_negative("retarget interval", enemy.retarget_interval)?;
            non_negative("death grace", enemy.death_grace)?;
            if enemy.reposition_duration > enemy.attack_cooldown {
                return Err(ConfigError::RepositionExceedsCooldown {
                    tier: enemy.tier,
                    reposition: enemy.reposition_duration,
                    cooldown: enemy.attack_cooldown,
                });
            }
            probability("battery drop chance", enemy.rewards.battery.chance)?;
            probability("half-heart drop chance", enemy.rewards.half_heart.chance)?;
        }

        Ok(())
    }
}

fn non_negative(what: &'static str, value: f32) -> Result<(), ConfigError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { what, value })
    }
}

fn probability(what: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { what, value })
    }
}
