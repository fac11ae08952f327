//! Projectiles: firing, gate splitting, movement and enemy hits

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::enemy::{EnemyClass, EnemyId, EnemyRoster};
use super::events::{EntityRef, GameEvent, VisualKind};
use super::gate::{GateId, GateTrack};
use super::weapon::WeaponState;
use crate::consts::PROJECTILE_RADIUS;
use crate::tuning::{Tuning, WeaponTuning};
use crate::{direction_to_heading, fan_headings, heading_to_direction};

pub type ProjectileId = u32;

/// The gate that last split a projectile's lineage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateTag {
    pub gate: GateId,
    /// Multiplier the gate carried when it was passed
    pub multiplier: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pos: Vec3,
    /// Unit vector on the XZ plane
    pub direction: Vec3,
    pub speed_multiplier: f32,
    /// Hits left before the projectile is used up (snapshot at fire time)
    pub remaining_pierces: u32,
    /// Gate this lineage last split at, read by the power-up re-split
    pub last_gate: Option<GateTag>,
    /// Every gate this lineage has split at; none of them splits it again
    pub passed_gates: Vec<GateId>,
    /// Enemy struck most recently; not struck again while still overlapping
    pub last_enemy: Option<EnemyId>,
    /// Created by a split rather than fired
    pub duplicated: bool,
}

impl Projectile {
    pub fn bounds(&self) -> Aabb {
        Aabb::around_sphere(self.pos, PROJECTILE_RADIUS)
    }

    pub fn heading(&self) -> f32 {
        direction_to_heading(self.direction)
    }
}

/// Reported to the caller when a hit defeats an enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyDefeat {
    pub enemy: EnemyId,
    pub class: EnemyClass,
    pub position: Vec3,
}

#[derive(Debug, Clone)]
pub struct ProjectileEngine {
    projectiles: Vec<Projectile>,
    tuning: WeaponTuning,
    next_id: ProjectileId,
}

impl ProjectileEngine {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            projectiles: Vec::new(),
            tuning: tuning.weapon.clone(),
            next_id: 1,
        }
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Fire straight ahead from `origin` if the weapon is off cooldown
    pub fn fire(
        &mut self,
        weapon: &mut WeaponState,
        origin: Vec3,
        now: f32,
        events: &mut Vec<GameEvent>,
    ) -> Option<ProjectileId> {
        if !weapon.try_trigger(now) {
            return None;
        }
        let pos = origin + Vec3::from(self.tuning.muzzle_offset);
        Some(self.spawn(
            Projectile {
                id: 0,
                pos,
                direction: Vec3::Z,
                speed_multiplier: 1.0,
                remaining_pierces: weapon.piercing_shots,
                last_gate: None,
                passed_gates: Vec::new(),
                last_enemy: None,
                duplicated: false,
            },
            events,
        ))
    }

    fn spawn(&mut self, mut projectile: Projectile, events: &mut Vec<GameEvent>) -> ProjectileId {
        let id = self.next_id;
        self.next_id += 1;
        projectile.id = id;
        events.push(GameEvent::Spawned {
            entity: EntityRef::Projectile(id),
            kind: VisualKind::Projectile,
            position: projectile.pos,
            scale: 1.0,
        });
        self.projectiles.push(projectile);
        id
    }

    /// Remove a projectile
    pub fn remove(&mut self, id: ProjectileId, events: &mut Vec<GameEvent>) -> Option<Projectile> {
        let index = self.projectiles.iter().position(|p| p.id == id)?;
        events.push(GameEvent::Despawned {
            entity: EntityRef::Projectile(id),
        });
        Some(self.projectiles.remove(index))
    }

    /// Replace a projectile with `count` copies fanned `step` radians apart
    /// around its heading. Copies keep pierces and speed and carry `tag`.
    /// A gate tag extends the lineage's passed gates; no tag clears them.
    pub fn multiply(
        &mut self,
        id: ProjectileId,
        count: u32,
        step: f32,
        tag: Option<GateTag>,
        events: &mut Vec<GameEvent>,
    ) -> Vec<ProjectileId> {
        let Some(parent) = self.remove(id, events) else {
            return Vec::new();
        };
        let passed_gates = match tag {
            Some(tag) => {
                let mut passed = parent.passed_gates.clone();
                passed.push(tag.gate);
                passed
            }
            None => Vec::new(),
        };
        fan_headings(parent.heading(), count, step)
            .map(|heading| {
                self.spawn(
                    Projectile {
                        id: 0,
                        pos: parent.pos,
                        direction: heading_to_direction(heading),
                        speed_multiplier: parent.speed_multiplier,
                        remaining_pierces: parent.remaining_pierces,
                        last_gate: tag,
                        passed_gates: passed_gates.clone(),
                        last_enemy: parent.last_enemy,
                        duplicated: true,
                    },
                    events,
                )
            })
            .collect()
    }

    /// Gate splits, then movement and culling
    pub fn tick(
        &mut self,
        dt: f32,
        weapon: &WeaponState,
        gates: &GateTrack,
        events: &mut Vec<GameEvent>,
    ) {
        // Decide every split against the same snapshot, then apply
        let splits: Vec<(ProjectileId, GateTag)> = self
            .projectiles
            .iter()
            .filter_map(|p| {
                let bounds = p.bounds();
                gates
                    .gates()
                    .iter()
                    .find(|g| {
                        !p.passed_gates.contains(&g.id)
                            && gates.hit_bounds(g).intersects(&bounds)
                    })
                    .map(|g| {
                        (
                            p.id,
                            GateTag {
                                gate: g.id,
                                multiplier: g.multiplier,
                            },
                        )
                    })
            })
            .collect();

        for (id, tag) in splits {
            self.multiply(id, tag.multiplier, self.tuning.gate_spread_step, Some(tag), events);
        }

        for p in &mut self.projectiles {
            p.pos += p.direction * weapon.projectile_speed * p.speed_multiplier * dt;
        }

        let t = &self.tuning;
        self.projectiles.retain(|p| {
            let inside = p.pos.z <= t.max_z && p.pos.z >= t.min_z && p.pos.x.abs() <= t.max_abs_x;
            if !inside {
                events.push(GameEvent::Despawned {
                    entity: EntityRef::Projectile(p.id),
                });
            }
            inside
        });
    }

    /// Resolve projectile hits on enemies.
    ///
    /// Each projectile takes at most one hit per call. A hit spends a pierce,
    /// or retires the projectile when none are left. `on_defeat` runs for the
    /// hit that brings an enemy to zero.
    pub fn check_enemy_collisions(
        &mut self,
        weapon: &WeaponState,
        roster: &mut EnemyRoster,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
        mut on_defeat: impl FnMut(EnemyDefeat),
    ) {
        let mut retired = Vec::new();

        for p in &mut self.projectiles {
            let bounds = p.bounds();
            let target = roster
                .enemies()
                .iter()
                .find(|e| e.is_alive() && p.last_enemy != Some(e.id) && e.bounds().intersects(&bounds))
                .map(|e| (e.id, e.class, e.pos));
            let Some((enemy, class, position)) = target else {
                continue;
            };

            let roll = weapon.calculate_damage(rng);
            let defeated = roster.apply_damage(enemy, roll.amount, events);
            let remaining = roster.get(enemy).map_or(0, |e| e.current_health);
            events.push(GameEvent::EnemyDamaged {
                id: enemy,
                position,
                amount: roll.amount,
                critical: roll.critical,
                remaining,
            });
            if defeated {
                on_defeat(EnemyDefeat {
                    enemy,
                    class,
                    position,
                });
            }

            p.last_enemy = Some(enemy);
            if p.remaining_pierces > 0 {
                p.remaining_pierces -= 1;
            } else {
                retired.push(p.id);
            }
        }

        for id in retired {
            self.remove(id, events);
        }
    }
}
