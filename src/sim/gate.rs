//! Multiplier gates
//!
//! Gates stand a fixed distance in front of the player and stack up to a cap
//! per lane. A gate's multiplier follows its rank in the stack: the front
//! gate doubles, the next quadruples, and so on. When a gate expires the
//! gates behind it slide forward and take over the lower multipliers.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::events::{EntityRef, GameEvent, VisualKind};
use crate::tuning::{GateTuning, Tuning};

pub type GateId = u32;

/// Multiplier carried by the gate at `rank` (0 = front of the lane)
#[inline]
pub fn multiplier_for_rank(rank: usize) -> u32 {
    2u32.saturating_pow(rank as u32 + 1)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub id: GateId,
    pub lane: usize,
    /// Position in the lane stack, 0 at the front
    pub rank: usize,
    pub pos: Vec3,
    pub multiplier: u32,
    /// Session time the gate went up (seconds)
    pub spawn_time: f32,
}

/// All live gates plus their spawn timer
#[derive(Debug, Clone)]
pub struct GateTrack {
    gates: Vec<Gate>,
    tuning: GateTuning,
    lanes: Vec<f32>,
    spawn_timer: f32,
    next_id: GateId,
}

impl GateTrack {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            gates: Vec::new(),
            tuning: tuning.gates.clone(),
            lanes: tuning.lanes.clone(),
            spawn_timer: 0.0,
            next_id: 1,
        }
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn get(&self, id: GateId) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id == id)
    }

    pub fn count_in_lane(&self, lane: usize) -> usize {
        self.gates.iter().filter(|g| g.lane == lane).count()
    }

    /// Frame box including the side pillars
    pub fn bounds(&self, gate: &Gate) -> Aabb {
        let t = &self.tuning;
        let size = Vec3::new(t.width + 2.0 * t.thickness, t.height + t.thickness, t.thickness);
        Aabb::from_center_size(gate.pos, size)
    }

    /// Box used for projectile hits
    pub fn hit_bounds(&self, gate: &Gate) -> Aabb {
        self.bounds(gate).expanded_by_scalar(self.tuning.hit_expansion)
    }

    fn z_for_rank(&self, rank: usize) -> f32 {
        self.tuning.standoff + rank as f32 * self.tuning.stack_spacing
    }

    /// Put up a gate at the back of `lane`'s stack, unless the lane is full
    pub fn spawn(&mut self, lane: usize, now: f32, events: &mut Vec<GameEvent>) -> Option<GateId> {
        let x = *self.lanes.get(lane)?;
        let rank = self.count_in_lane(lane);
        if rank >= self.tuning.max_per_lane {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        let gate = Gate {
            id,
            lane,
            rank,
            pos: Vec3::new(x, 0.0, self.z_for_rank(rank)),
            multiplier: multiplier_for_rank(rank),
            spawn_time: now,
        };
        log::debug!("Gate #{} lane {} x{}", id, lane, gate.multiplier);
        events.push(GameEvent::Spawned {
            entity: EntityRef::Gate(id),
            kind: VisualKind::Gate {
                multiplier: gate.multiplier,
            },
            position: gate.pos,
            scale: 1.0,
        });
        self.gates.push(gate);
        Some(id)
    }

    /// Spawn attempt in a random lane (fails silently if that lane is full)
    pub fn spawn_random(
        &mut self,
        rng: &mut impl Rng,
        now: f32,
        events: &mut Vec<GameEvent>,
    ) -> Option<GateId> {
        if self.lanes.is_empty() {
            return None;
        }
        let lane = rng.random_range(0..self.lanes.len());
        self.spawn(lane, now, events)
    }

    /// Expire old gates, then run the spawn timer
    pub fn tick(
        &mut self,
        dt: f32,
        now: f32,
        spawn_interval: f32,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        self.expire(now, events);

        self.spawn_timer += dt;
        if self.spawn_timer >= spawn_interval {
            self.spawn_timer = 0.0;
            self.spawn_random(rng, now, events);
        }
    }

    /// Remove gates older than their lifespan and repack their lanes.
    /// Returns how many were removed.
    pub fn expire(&mut self, now: f32, events: &mut Vec<GameEvent>) -> usize {
        let lifespan = self.tuning.lifespan;
        // Vec order is spawn order, so oldest go first
        let expired: Vec<(GateId, usize)> = self
            .gates
            .iter()
            .filter(|g| now - g.spawn_time >= lifespan)
            .map(|g| (g.id, g.lane))
            .collect();

        for &(id, lane) in &expired {
            self.gates.retain(|g| g.id != id);
            events.push(GameEvent::Despawned {
                entity: EntityRef::Gate(id),
            });
            self.repack(lane, events);
        }
        expired.len()
    }

    /// Recompute rank, depth and multiplier of every gate in `lane`
    fn repack(&mut self, lane: usize, events: &mut Vec<GameEvent>) {
        let standoff = self.tuning.standoff;
        let spacing = self.tuning.stack_spacing;
        for (rank, gate) in self.gates.iter_mut().filter(|g| g.lane == lane).enumerate() {
            if gate.rank == rank {
                continue;
            }
            gate.rank = rank;
            gate.pos.z = standoff + rank as f32 * spacing;
            gate.multiplier = multiplier_for_rank(rank);
            log::debug!("Gate #{} repacked to rank {} x{}", gate.id, rank, gate.multiplier);
            events.push(GameEvent::GateRepacked {
                id: gate.id,
                z: gate.pos.z,
                multiplier: gate.multiplier,
            });
        }
    }
}
