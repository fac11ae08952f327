//! Score-driven difficulty tiers
//!
//! Numeric spawn parameters ramp linearly from one tier to the next as the
//! score climbs. Enemy class odds do not ramp: they switch when a threshold is
//! crossed.

use serde::{Deserialize, Serialize};

use super::enemy::EnemyClass;

/// One row of the difficulty table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    /// Score at which this tier starts
    pub score: u64,
    /// Enemy health multiplier for enemies spawned in this tier
    pub health_multiplier: f32,
    pub max_population: u32,
    /// Seconds between spawn attempts
    pub spawn_interval: f32,
    pub spawn_distance_min: f32,
    pub spawn_distance_max: f32,
    pub base_speed: f32,
    /// Spawn weight per class, indexed by `EnemyClass::index()`
    pub class_weights: [f32; EnemyClass::COUNT],
}

impl Tier {
    /// The shipped EASY..MASTER progression
    pub fn default_table() -> Vec<Tier> {
        #[allow(clippy::too_many_arguments)]
        fn tier(
            name: &str,
            score: u64,
            health_multiplier: f32,
            max_population: u32,
            spawn_interval: f32,
            band: (f32, f32),
            base_speed: f32,
            class_weights: [f32; EnemyClass::COUNT],
        ) -> Tier {
            Tier {
                name: name.to_string(),
                score,
                health_multiplier,
                max_population,
                spawn_interval,
                spawn_distance_min: band.0,
                spawn_distance_max: band.1,
                base_speed,
                class_weights,
            }
        }

        vec![
            tier("EASY", 0, 1.0, 20, 1.5, (30.0, 100.0), 5.0, [0.40, 0.30, 0.15, 0.10, 0.05]),
            tier("MEDIUM", 10_000, 1.5, 30, 1.2, (25.0, 90.0), 7.0, [0.35, 0.35, 0.15, 0.10, 0.05]),
            tier("HARD", 20_000, 2.0, 35, 1.0, (20.0, 80.0), 9.0, [0.30, 0.30, 0.20, 0.10, 0.05]),
            tier("EXPERT", 50_000, 2.5, 40, 0.8, (15.0, 70.0), 11.0, [0.25, 0.25, 0.25, 0.15, 0.05]),
            tier("MASTER", 100_000, 3.0, 50, 0.5, (10.0, 60.0), 13.0, [0.20, 0.20, 0.25, 0.20, 0.15]),
        ]
    }
}

/// Spawn parameters at a given score (interpolated between tiers)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnParams {
    pub max_population: u32,
    pub spawn_interval: f32,
    pub spawn_distance_min: f32,
    pub spawn_distance_max: f32,
    pub base_speed: f32,
}

/// Pure lookup over an ordered tier table
#[derive(Debug, Clone)]
pub struct DifficultyModel {
    tiers: Vec<Tier>,
}

impl Default for DifficultyModel {
    fn default() -> Self {
        Self::new(Tier::default_table())
    }
}

impl DifficultyModel {
    /// Build from a tier table ordered by strictly increasing score
    pub fn new(tiers: Vec<Tier>) -> Self {
        if tiers.is_empty() {
            log::warn!("Empty difficulty table, using defaults");
            return Self {
                tiers: Tier::default_table(),
            };
        }
        Self { tiers }
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    /// Index of the highest tier whose threshold does not exceed `score`
    pub fn tier_index_for(&self, score: u64) -> usize {
        self.tiers.iter().rposition(|t| t.score <= score).unwrap_or(0)
    }

    pub fn tier_for(&self, score: u64) -> &Tier {
        &self.tiers[self.tier_index_for(score)]
    }

    /// Fraction of the way from the current tier's threshold to the next one.
    /// 1.0 at or past the last tier.
    pub fn progress(&self, score: u64) -> f32 {
        let index = self.tier_index_for(score);
        match self.tiers.get(index + 1) {
            Some(next) => {
                let prev = self.tiers[index].score;
                let span = next.score.saturating_sub(prev).max(1) as f64;
                (((score.saturating_sub(prev)) as f64 / span) as f32).clamp(0.0, 1.0)
            }
            None => 1.0,
        }
    }

    pub fn interpolated_params(&self, score: u64) -> SpawnParams {
        let index = self.tier_index_for(score);
        let current = &self.tiers[index];
        // No tier beyond the last: hold its values
        let next = self.tiers.get(index + 1).unwrap_or(current);
        let t = self.progress(score);

        SpawnParams {
            max_population: lerp(current.max_population as f32, next.max_population as f32, t)
                .round() as u32,
            spawn_interval: lerp(current.spawn_interval, next.spawn_interval, t),
            spawn_distance_min: lerp(current.spawn_distance_min, next.spawn_distance_min, t),
            spawn_distance_max: lerp(current.spawn_distance_max, next.spawn_distance_max, t),
            base_speed: lerp(current.base_speed, next.base_speed, t),
        }
    }

    /// Class spawn weights: a step function of the score
    pub fn class_weights(&self, score: u64) -> [f32; EnemyClass::COUNT] {
        self.tier_for(score).class_weights
    }

    pub fn health_multiplier(&self, score: u64) -> f32 {
        self.tier_for(score).health_multiplier
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
