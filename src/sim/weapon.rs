//! Session-wide weapon stats
//!
//! Power-ups only ever push these upward. Projectiles copy what they need at
//! fire time, so upgrades never reach shots already in flight.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::WeaponTuning;

/// Slack on the cooldown so accumulated frame time lands on the boundary
const COOLDOWN_EPSILON: f32 = 1e-4;

/// Weapon stats for the current run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponState {
    /// Shots per second
    pub fire_rate: f32,
    pub projectile_speed: f32,
    /// Enemies a new projectile may pass through
    pub piercing_shots: u32,
    /// Damage multiplier from power-ups
    pub permanent_multiplier: f32,
    pub critical_chance: f32,
    pub critical_multiplier: f32,
    pub damage_min: u32,
    pub damage_max: u32,
    pub fire_rate_cap: f32,
    pub projectile_speed_cap: f32,
    pub damage_multiplier_cap: f32,
    /// Session time of the last shot
    pub last_fire_time: Option<f32>,
}

/// Outcome of one damage roll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRoll {
    pub amount: u32,
    pub critical: bool,
}

impl WeaponState {
    pub fn new(tuning: &WeaponTuning) -> Self {
        Self {
            fire_rate: tuning.fire_rate,
            projectile_speed: tuning.projectile_speed,
            piercing_shots: 0,
            permanent_multiplier: 1.0,
            critical_chance: tuning.critical_chance,
            critical_multiplier: tuning.critical_multiplier,
            damage_min: tuning.damage_min,
            damage_max: tuning.damage_max.max(tuning.damage_min),
            fire_rate_cap: tuning.fire_rate_cap,
            projectile_speed_cap: tuning.projectile_speed_cap,
            damage_multiplier_cap: tuning.damage_multiplier_cap,
            last_fire_time: None,
        }
    }

    /// Seconds that must pass between shots
    pub fn fire_cooldown(&self) -> f32 {
        1.0 / self.fire_rate
    }

    /// Whether a shot is allowed at `now`, and record it if so
    pub fn try_trigger(&mut self, now: f32) -> bool {
        if let Some(last) = self.last_fire_time
            && now - last < self.fire_cooldown() - COOLDOWN_EPSILON
        {
            return false;
        }
        self.last_fire_time = Some(now);
        true
    }

    /// Uniform integer base damage, times the permanent multiplier, with a
    /// chance to crit
    pub fn calculate_damage(&self, rng: &mut impl Rng) -> DamageRoll {
        let base = rng.random_range(self.damage_min..=self.damage_max) as f32;
        let critical = rng.random::<f32>() < self.critical_chance;
        let crit = if critical { self.critical_multiplier } else { 1.0 };
        DamageRoll {
            amount: (base * self.permanent_multiplier * crit).round() as u32,
            critical,
        }
    }

    pub fn add_pierce(&mut self) {
        self.piercing_shots = self.piercing_shots.saturating_add(1);
    }

    pub fn boost_damage(&mut self, factor: f32) {
        self.permanent_multiplier = (self.permanent_multiplier * factor)
            .min(self.damage_multiplier_cap)
            .max(self.permanent_multiplier);
    }

    pub fn boost_fire_rate(&mut self, factor: f32) {
        self.fire_rate = (self.fire_rate * factor)
            .min(self.fire_rate_cap)
            .max(self.fire_rate);
    }

    pub fn boost_speed(&mut self, factor: f32) {
        self.projectile_speed = (self.projectile_speed * factor)
            .min(self.projectile_speed_cap)
            .max(self.projectile_speed);
    }
}
