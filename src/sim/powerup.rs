//! Collectible weapon upgrades
//!
//! Power-ups drift down a lane toward the player and are picked up by
//! shooting them. Every effect is permanent for the rest of the run.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::events::{EntityRef, GameEvent, VisualKind};
use super::gate::GateTrack;
use super::projectile::{ProjectileEngine, ProjectileId};
use super::weapon::WeaponState;
use crate::consts::{DESPAWN_Z, ENTITY_Y, POWERUP_RADIUS};
use crate::tuning::{PowerUpTuning, Tuning};
use crate::weighted_pick;

pub type PowerUpId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// One more enemy each new projectile can pass through
    Pierce,
    /// Damage multiplier
    Multiplier,
    FireRate,
    /// Projectile speed
    Speed,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Pierce,
        PowerUpKind::Multiplier,
        PowerUpKind::FireRate,
        PowerUpKind::Speed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Pierce => "Pierce +1",
            PowerUpKind::Multiplier => "Damage x1.5",
            PowerUpKind::FireRate => "Fire Rate x1.2",
            PowerUpKind::Speed => "Speed x1.2",
        }
    }

    /// Apply this upgrade to the weapon
    pub fn apply(self, weapon: &mut WeaponState, tuning: &PowerUpTuning) {
        match self {
            PowerUpKind::Pierce => weapon.add_pierce(),
            PowerUpKind::Multiplier => weapon.boost_damage(tuning.damage_factor),
            PowerUpKind::FireRate => weapon.boost_fire_rate(tuning.fire_rate_factor),
            PowerUpKind::Speed => weapon.boost_speed(tuning.speed_factor),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: PowerUpId,
    pub lane: usize,
    pub kind: PowerUpKind,
    pub pos: Vec3,
    /// Set the moment a projectile touches it; the effect never applies twice
    pub consumed: bool,
}

impl PowerUp {
    pub fn bounds(&self) -> Aabb {
        Aabb::around_sphere(self.pos, POWERUP_RADIUS)
    }
}

#[derive(Debug, Clone)]
pub struct PowerUpEngine {
    powerups: Vec<PowerUp>,
    tuning: PowerUpTuning,
    lanes: Vec<f32>,
    spawn_timer: f32,
    next_id: PowerUpId,
}

impl PowerUpEngine {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            powerups: Vec::new(),
            tuning: tuning.powerups.clone(),
            lanes: tuning.lanes.clone(),
            spawn_timer: 0.0,
            next_id: 1,
        }
    }

    pub fn powerups(&self) -> &[PowerUp] {
        &self.powerups
    }

    pub fn get(&self, id: PowerUpId) -> Option<&PowerUp> {
        self.powerups.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.powerups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.powerups.is_empty()
    }

    /// Spawn timer, scrolling and culling
    pub fn tick(&mut self, dt: f32, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        self.spawn_timer += dt;
        if self.spawn_timer >= self.tuning.spawn_interval {
            self.spawn_timer = 0.0;
            self.spawn_random(rng, events);
        }

        for p in &mut self.powerups {
            p.pos.z -= self.tuning.scroll_speed * dt;
        }

        self.powerups.retain(|p| {
            if p.pos.z < DESPAWN_Z {
                events.push(GameEvent::Despawned {
                    entity: EntityRef::PowerUp(p.id),
                });
                false
            } else {
                true
            }
        });
    }

    /// Random lane, kind drawn from the weight table
    pub fn spawn_random(&mut self, rng: &mut impl Rng, events: &mut Vec<GameEvent>) -> Option<PowerUpId> {
        if self.lanes.is_empty() {
            return None;
        }
        let lane = rng.random_range(0..self.lanes.len());
        let w = self.tuning.weights;
        let kind = weighted_pick(&[w.pierce, w.multiplier, w.fire_rate, w.speed], rng.random::<f32>())
            .map(|i| PowerUpKind::ALL[i])
            .unwrap_or(PowerUpKind::Pierce);
        self.spawn(kind, lane, self.tuning.spawn_z, events)
    }

    pub fn spawn(
        &mut self,
        kind: PowerUpKind,
        lane: usize,
        z: f32,
        events: &mut Vec<GameEvent>,
    ) -> Option<PowerUpId> {
        let x = *self.lanes.get(lane)?;
        let id = self.next_id;
        self.next_id += 1;
        let pos = Vec3::new(x, ENTITY_Y, z);
        log::debug!("Power-up #{} {:?} lane {}", id, kind, lane);
        events.push(GameEvent::Spawned {
            entity: EntityRef::PowerUp(id),
            kind: VisualKind::PowerUp(kind),
            position: pos,
            scale: 1.0,
        });
        self.powerups.push(PowerUp {
            id,
            lane,
            kind,
            pos,
            consumed: false,
        });
        Some(id)
    }

    /// Let projectiles collect power-ups. Returns the kinds collected.
    ///
    /// A collecting projectile that came through a gate is split again by
    /// that gate's multiplier, this time with the gate tag and the lineage's
    /// passed gates cleared.
    pub fn check_collisions(
        &mut self,
        projectiles: &mut ProjectileEngine,
        weapon: &mut WeaponState,
        gates: &GateTrack,
        events: &mut Vec<GameEvent>,
    ) -> Vec<PowerUpKind> {
        let tuning = &self.tuning;
        let mut collected = Vec::new();

        for powerup in self.powerups.iter_mut().filter(|p| !p.consumed) {
            let size = powerup.bounds().size();
            let pickup = powerup.bounds().expanded_by_vector(size * tuning.pickup_expansion);
            let Some((shooter, tag)) = projectiles
                .projectiles()
                .iter()
                .find(|p| p.bounds().intersects(&pickup))
                .map(|p| (p.id, p.last_gate))
            else {
                continue;
            };

            powerup.consumed = true;
            powerup.kind.apply(weapon, tuning);
            log::info!("Collected {}", powerup.kind.label());
            events.push(GameEvent::PowerUpCollected { kind: powerup.kind });
            collected.push(powerup.kind);

            if let Some(tag) = tag {
                let multiplier = gates.get(tag.gate).map_or(tag.multiplier, |g| g.multiplier);
                resplit(projectiles, shooter, multiplier, tuning.respread_step, events);
            }
        }

        self.powerups.retain(|p| {
            if p.consumed {
                events.push(GameEvent::Despawned {
                    entity: EntityRef::PowerUp(p.id),
                });
            }
            !p.consumed
        });
        collected
    }
}

fn resplit(
    projectiles: &mut ProjectileEngine,
    id: ProjectileId,
    count: u32,
    step: f32,
    events: &mut Vec<GameEvent>,
) {
    let children = projectiles.multiply(id, count, step, None, events);
    log::debug!("Projectile #{} re-split into {}", id, children.len());
}
