//! Data-driven game balance
//!
//! Every numeric knob of the simulation lives here. Defaults reproduce the
//! shipped balance; a JSON file can override any subset of it.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_FRAME_DT;
use crate::sim::difficulty::Tier;
use crate::sim::enemy::EnemyClass;

/// Rejected tuning input
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("at least one lane is required")]
    NoLanes,
    #[error("difficulty table is empty")]
    NoTiers,
    #[error("first difficulty tier must start at score 0 (found {0})")]
    FirstThresholdNotZero(u64),
    #[error("tier {index} threshold {score} does not exceed the previous tier")]
    NonIncreasingThreshold { index: usize, score: u64 },
    #[error("tier {index} has spawn band {min}..{max}")]
    InvalidSpawnBand { index: usize, min: f32, max: f32 },
    #[error("{table} weights must be non-negative with a positive total")]
    InvalidWeights { table: &'static str },
    #[error("{field} must be positive")]
    NonPositive { field: &'static str },
}

/// Per-class enemy stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    pub base_health: u32,
    pub scale: f32,
    /// Points awarded when defeated
    pub score: u64,
}

/// Enemy roster balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Indexed by `EnemyClass::index()`. Score grows with the class:
    /// 100/300/500/800/1500 by default, so TANK and BOSS pay for their
    /// health. Set them to 100 for flat scoring.
    pub classes: [ClassStats; EnemyClass::COUNT],
    /// Total speed spread as a fraction of the tier's base speed
    pub speed_variation_ratio: f32,
    /// Seconds a hit flash stays on before the enemy's own colors return
    pub flash_duration: f32,
    /// Fraction of the enemy box used when testing contact with the player
    pub contact_shrink: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        let stats = |base_health, scale, score| ClassStats {
            base_health,
            scale,
            score,
        };
        Self {
            classes: [
                stats(200, 1.0, 100),
                stats(400, 1.2, 300),
                stats(800, 1.4, 500),
                stats(1500, 1.6, 800),
                stats(3000, 2.0, 1500),
            ],
            speed_variation_ratio: 0.2,
            flash_duration: 0.1,
            contact_shrink: 0.8,
        }
    }
}

/// Multiplier gate balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateTuning {
    /// Z of the first gate in a lane
    pub standoff: f32,
    /// Z distance between stacked gates in one lane
    pub stack_spacing: f32,
    pub max_per_lane: usize,
    /// Seconds a gate stays up
    pub lifespan: f32,
    pub spawn_interval: f32,
    /// Extra margin around the gate frame when testing projectile hits
    pub hit_expansion: f32,
    pub width: f32,
    pub height: f32,
    pub thickness: f32,
}

impl Default for GateTuning {
    fn default() -> Self {
        Self {
            standoff: 5.0,
            stack_spacing: 0.7,
            max_per_lane: 3,
            lifespan: 5.0,
            spawn_interval: 1.5,
            hit_expansion: 0.5,
            width: 3.0,
            height: 6.0,
            thickness: 0.2,
        }
    }
}

/// Weapon and projectile balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponTuning {
    /// Shots per second
    pub fire_rate: f32,
    pub fire_rate_cap: f32,
    /// Units per second
    pub projectile_speed: f32,
    pub projectile_speed_cap: f32,
    pub damage_min: u32,
    pub damage_max: u32,
    pub damage_multiplier_cap: f32,
    pub critical_chance: f32,
    pub critical_multiplier: f32,
    /// Angle between neighbouring projectiles after a gate split (radians)
    pub gate_spread_step: f32,
    /// Spawn offset from the firing origin
    pub muzzle_offset: [f32; 3],
    pub max_z: f32,
    pub min_z: f32,
    pub max_abs_x: f32,
    /// Seconds between automatic shots
    pub auto_fire_interval: f32,
}

impl Default for WeaponTuning {
    fn default() -> Self {
        Self {
            fire_rate: 2.0,
            fire_rate_cap: 10.0,
            projectile_speed: 60.0,
            projectile_speed_cap: 180.0,
            damage_min: 100,
            damage_max: 200,
            damage_multiplier_cap: 50.0,
            critical_chance: 0.05,
            critical_multiplier: 2.0,
            gate_spread_step: PI / 60.0,
            muzzle_offset: [0.0, 0.5, 2.0],
            max_z: 100.0,
            min_z: -20.0,
            max_abs_x: 20.0,
            auto_fire_interval: 0.5,
        }
    }
}

/// Spawn weights per power-up kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpWeights {
    pub pierce: f32,
    pub multiplier: f32,
    pub fire_rate: f32,
    pub speed: f32,
}

impl Default for PowerUpWeights {
    fn default() -> Self {
        Self {
            pierce: 0.25,
            multiplier: 0.25,
            fire_rate: 0.25,
            // Speed pickups exist but are off in the default rotation
            speed: 0.0,
        }
    }
}

/// Power-up balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerUpTuning {
    pub spawn_interval: f32,
    pub spawn_z: f32,
    /// Units per second toward the player
    pub scroll_speed: f32,
    /// Pickup box grows by this many times its own size on every side
    pub pickup_expansion: f32,
    pub weights: PowerUpWeights,
    pub damage_factor: f32,
    pub fire_rate_factor: f32,
    pub speed_factor: f32,
    /// Angle between neighbouring projectiles after a pickup re-split (radians)
    pub respread_step: f32,
}

impl Default for PowerUpTuning {
    fn default() -> Self {
        Self {
            spawn_interval: 5.0,
            spawn_z: 50.0,
            scroll_speed: 20.0,
            pickup_expansion: 1.5,
            weights: PowerUpWeights::default(),
            damage_factor: 1.5,
            fire_rate_factor: 1.2,
            speed_factor: 1.2,
            respread_step: PI / 95.0,
        }
    }
}

/// Frame timing and global speed ramp
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockTuning {
    pub max_dt: f32,
    pub start_speed: f32,
    pub speed_step: f32,
    /// Seconds between speed steps
    pub speed_step_interval: f32,
    pub max_speed: f32,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            max_dt: MAX_FRAME_DT,
            start_speed: 0.5,
            speed_step: 0.1,
            speed_step_interval: 10.0,
            max_speed: 2.0,
        }
    }
}

/// Player movement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub start_lane: usize,
    /// Units per second while sliding between lanes
    pub lateral_speed: f32,
    /// Snap to the lane once closer than this
    pub snap_distance: f32,
    pub auto_fire: bool,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            start_lane: 1,
            lateral_speed: 10.0,
            snap_distance: 0.1,
            auto_fire: true,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// X of each lane
    pub lanes: Vec<f32>,
    pub tiers: Vec<Tier>,
    pub enemies: EnemyTuning,
    pub gates: GateTuning,
    pub weapon: WeaponTuning,
    pub powerups: PowerUpTuning,
    pub clock: ClockTuning,
    pub player: PlayerTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lanes: vec![-4.0, 0.0, 4.0],
            tiers: Tier::default_table(),
            enemies: EnemyTuning::default(),
            gates: GateTuning::default(),
            weapon: WeaponTuning::default(),
            powerups: PowerUpTuning::default(),
            clock: ClockTuning::default(),
            player: PlayerTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document (missing fields keep defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lanes.is_empty() {
            return Err(TuningError::NoLanes);
        }

        let first = self.tiers.first().ok_or(TuningError::NoTiers)?;
        if first.score != 0 {
            return Err(TuningError::FirstThresholdNotZero(first.score));
        }
        for (index, pair) in self.tiers.windows(2).enumerate() {
            if pair[1].score <= pair[0].score {
                return Err(TuningError::NonIncreasingThreshold {
                    index: index + 1,
                    score: pair[1].score,
                });
            }
        }
        for (index, tier) in self.tiers.iter().enumerate() {
            if tier.spawn_distance_min > tier.spawn_distance_max {
                return Err(TuningError::InvalidSpawnBand {
                    index,
                    min: tier.spawn_distance_min,
                    max: tier.spawn_distance_max,
                });
            }
            if !weights_ok(&tier.class_weights) {
                return Err(TuningError::InvalidWeights {
                    table: "enemy class",
                });
            }
        }

        let w = &self.powerups.weights;
        if !weights_ok(&[w.pierce, w.multiplier, w.fire_rate, w.speed]) {
            return Err(TuningError::InvalidWeights { table: "power-up" });
        }

        let positive = [
            ("weapon.fire_rate", self.weapon.fire_rate),
            ("weapon.projectile_speed", self.weapon.projectile_speed),
            ("gates.spawn_interval", self.gates.spawn_interval),
            ("gates.lifespan", self.gates.lifespan),
            ("powerups.spawn_interval", self.powerups.spawn_interval),
            ("clock.max_dt", self.clock.max_dt),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(TuningError::NonPositive { field });
            }
        }

        Ok(())
    }

    pub fn class_stats(&self, class: EnemyClass) -> &ClassStats {
        &self.enemies.classes[class.index()]
    }
}

fn weights_ok(weights: &[f32]) -> bool {
    weights.iter().all(|w| *w >= 0.0) && weights.iter().sum::<f32>() > 0.0
}
