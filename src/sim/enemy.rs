//! Enemy roster: spawning, scrolling, damage
//!
//! Enemies spawn ahead of the player in one of the lanes and walk toward the
//! camera. Health is scaled by the difficulty tier at the moment of spawning
//! and never rescaled afterwards.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::difficulty::{DifficultyModel, SpawnParams};
use super::events::{EntityRef, GameEvent, VisualKind};
use super::schedule::Scheduler;
use crate::consts::{DESPAWN_Z, ENEMY_SIZE, ENTITY_Y};
use crate::tuning::{EnemyTuning, Tuning};
use crate::weighted_pick;

pub type EnemyId = u32;

/// Enemy classes, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyClass {
    Weak,
    Medium,
    Strong,
    Tank,
    Boss,
}

impl EnemyClass {
    pub const COUNT: usize = 5;
    pub const ALL: [EnemyClass; Self::COUNT] = [
        EnemyClass::Weak,
        EnemyClass::Medium,
        EnemyClass::Strong,
        EnemyClass::Tank,
        EnemyClass::Boss,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Label shown above the enemy
    pub fn display_name(self) -> &'static str {
        match self {
            EnemyClass::Weak => "Scout",
            EnemyClass::Medium => "Soldier",
            EnemyClass::Strong => "Elite",
            EnemyClass::Tank => "Tank",
            EnemyClass::Boss => "Boss",
        }
    }
}

/// A live enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub class: EnemyClass,
    pub lane: usize,
    pub pos: Vec3,
    pub scale: f32,
    pub max_health: u32,
    pub current_health: u32,
    /// Units per second before the global game speed is applied
    pub speed: f32,
    /// Hit flash currently showing
    pub flashing: bool,
    defeated: bool,
}

impl Enemy {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, Vec3::from(ENEMY_SIZE) * self.scale)
    }

    /// False once health has reached zero
    pub fn is_alive(&self) -> bool {
        !self.defeated
    }

    /// Health bar fill (0-1)
    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.current_health as f32 / self.max_health as f32
        }
    }
}

/// Owns every enemy and the spawn cadence
#[derive(Debug, Clone)]
pub struct EnemyRoster {
    enemies: Vec<Enemy>,
    model: DifficultyModel,
    tuning: EnemyTuning,
    lanes: Vec<f32>,
    params: SpawnParams,
    health_multiplier: f32,
    class_weights: [f32; EnemyClass::COUNT],
    tier_index: usize,
    spawn_timer: f32,
    last_spawn_lane: Option<usize>,
    /// Seconds of simulation seen by this roster
    clock: f32,
    flash_reverts: Scheduler<EnemyId>,
    next_id: EnemyId,
}

impl EnemyRoster {
    pub fn new(tuning: &Tuning) -> Self {
        let model = DifficultyModel::new(tuning.tiers.clone());
        let params = model.interpolated_params(0);
        let health_multiplier = model.health_multiplier(0);
        let class_weights = model.class_weights(0);
        Self {
            enemies: Vec::new(),
            model,
            tuning: tuning.enemies.clone(),
            lanes: tuning.lanes.clone(),
            params,
            health_multiplier,
            class_weights,
            tier_index: 0,
            spawn_timer: 0.0,
            last_spawn_lane: None,
            clock: 0.0,
            flash_reverts: Scheduler::new(),
            next_id: 1,
        }
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn get(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub fn params(&self) -> &SpawnParams {
        &self.params
    }

    pub fn tier_index(&self) -> usize {
        self.tier_index
    }

    pub fn health_multiplier(&self) -> f32 {
        self.health_multiplier
    }

    pub fn model(&self) -> &DifficultyModel {
        &self.model
    }

    /// Re-read spawn tuning for the current score
    pub fn update_difficulty(&mut self, score: u64, events: &mut Vec<GameEvent>) {
        let index = self.model.tier_index_for(score);
        if index != self.tier_index {
            let name = self.model.tiers()[index].name.clone();
            log::info!("Difficulty tier {} ({}) at score {}", index, name, score);
            events.push(GameEvent::TierChanged { index, name });
            self.tier_index = index;
        }
        self.params = self.model.interpolated_params(score);
        self.health_multiplier = self.model.health_multiplier(score);
        self.class_weights = self.model.class_weights(score);
    }

    /// Advance spawning and movement by `dt` seconds
    pub fn tick(
        &mut self,
        dt: f32,
        game_speed: f32,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        self.clock += dt;

        for id in self.flash_reverts.drain_due(self.clock) {
            if let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == id) {
                enemy.flashing = false;
                events.push(GameEvent::HitFlash { id, active: false });
            }
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.params.spawn_interval {
            self.spawn_timer = 0.0;
            self.try_spawn(rng, events);
        }

        for enemy in &mut self.enemies {
            enemy.pos.z -= dt * enemy.speed * game_speed;
        }

        let flash_reverts = &mut self.flash_reverts;
        self.enemies.retain(|enemy| {
            if enemy.pos.z < DESPAWN_Z {
                flash_reverts.cancel(&enemy.id);
                events.push(GameEvent::Despawned {
                    entity: EntityRef::Enemy(enemy.id),
                });
                false
            } else {
                true
            }
        });
    }

    /// Spawn one enemy if the population cap allows it
    pub fn try_spawn(&mut self, rng: &mut impl Rng, events: &mut Vec<GameEvent>) -> Option<EnemyId> {
        if self.enemies.len() >= self.params.max_population as usize || self.lanes.is_empty() {
            return None;
        }

        let lane = self.pick_lane(rng);
        self.last_spawn_lane = Some(lane);

        let class = weighted_pick(&self.class_weights, rng.random::<f32>())
            .map(|i| EnemyClass::ALL[i])
            .unwrap_or(EnemyClass::Weak);

        let band = self.params.spawn_distance_max - self.params.spawn_distance_min;
        let z = self.params.spawn_distance_min + rng.random::<f32>() * band;

        let variation = self.params.base_speed * self.tuning.speed_variation_ratio;
        let speed = self.params.base_speed + (rng.random::<f32>() - 0.5) * variation;

        Some(self.spawn(class, lane, z, speed, events))
    }

    /// Place an enemy of `class` in `lane` at distance `z`, health scaled by
    /// the current tier
    pub fn spawn(
        &mut self,
        class: EnemyClass,
        lane: usize,
        z: f32,
        speed: f32,
        events: &mut Vec<GameEvent>,
    ) -> EnemyId {
        let stats = self.tuning.classes[class.index()];
        let health = (stats.base_health as f32 * self.health_multiplier).round() as u32;
        let x = self.lanes.get(lane).copied().unwrap_or(0.0);

        let id = self.next_id;
        self.next_id += 1;

        let enemy = Enemy {
            id,
            class,
            lane,
            pos: Vec3::new(x, ENTITY_Y, z),
            scale: stats.scale,
            max_health: health,
            current_health: health,
            speed,
            flashing: false,
            defeated: false,
        };
        log::debug!(
            "Spawned {} #{} lane {} z {:.1} hp {}",
            class.display_name(),
            id,
            lane,
            z,
            health
        );
        events.push(GameEvent::Spawned {
            entity: EntityRef::Enemy(id),
            kind: VisualKind::Enemy(class),
            position: enemy.pos,
            scale: enemy.scale,
        });
        self.enemies.push(enemy);
        id
    }

    /// Lane for the next spawn: never the same as the previous spawn's lane
    /// when there is more than one lane
    fn pick_lane(&self, rng: &mut impl Rng) -> usize {
        let n = self.lanes.len();
        match self.last_spawn_lane {
            Some(last) if n > 1 && last < n => {
                let pick = rng.random_range(0..n - 1);
                if pick >= last { pick + 1 } else { pick }
            }
            _ => rng.random_range(0..n),
        }
    }

    /// Subtract `amount` from an enemy's health (never below zero).
    ///
    /// Returns true only on the hit that defeats it. Flashes the enemy and
    /// queues the revert.
    pub fn apply_damage(&mut self, id: EnemyId, amount: u32, events: &mut Vec<GameEvent>) -> bool {
        let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        if enemy.defeated {
            return false;
        }

        enemy.current_health = enemy.current_health.saturating_sub(amount);

        enemy.flashing = true;
        events.push(GameEvent::HitFlash { id, active: true });
        self.flash_reverts
            .reschedule(self.clock + self.tuning.flash_duration, id);

        if enemy.current_health == 0 {
            enemy.defeated = true;
            return true;
        }
        false
    }

    /// Tear down an enemy (used when the weapon pass clears a defeated one)
    pub fn remove(&mut self, id: EnemyId, events: &mut Vec<GameEvent>) -> Option<Enemy> {
        let index = self.enemies.iter().position(|e| e.id == id)?;
        self.flash_reverts.cancel(&id);
        events.push(GameEvent::Despawned {
            entity: EntityRef::Enemy(id),
        });
        Some(self.enemies.remove(index))
    }

    /// First live enemy touching the player box
    pub fn check_player_collision(&self, player: &Aabb) -> Option<EnemyId> {
        self.enemies
            .iter()
            .filter(|e| e.is_alive())
            .find(|e| {
                e.bounds()
                    .scaled_about_center(self.tuning.contact_shrink)
                    .intersects(player)
            })
            .map(|e| e.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn roster() -> EnemyRoster {
        EnemyRoster::new(&Tuning::default())
    }

    #[test]
    fn test_weak_enemy_defeat_clamps_to_zero() {
        let mut roster = roster();
        let mut events = Vec::new();
        let id = roster.spawn(EnemyClass::Weak, 0, 50.0, 5.0, &mut events);
        assert_eq!(roster.get(id).unwrap().max_health, 200);

        assert!(roster.apply_damage(id, 250, &mut events));
        let enemy = roster.get(id).unwrap();
        assert_eq!(enemy.current_health, 0);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn test_defeat_reported_once() {
        let mut roster = roster();
        let mut events = Vec::new();
        let id = roster.spawn(EnemyClass::Medium, 1, 50.0, 5.0, &mut events);

        assert!(!roster.apply_damage(id, 150, &mut events));
        assert_eq!(roster.get(id).unwrap().current_health, 250);
        assert!(roster.apply_damage(id, 250, &mut events));
        assert!(!roster.apply_damage(id, 100, &mut events));
        assert!(!roster.apply_damage(id, 0, &mut events));
        assert_eq!(roster.get(id).unwrap().current_health, 0);

        // Unknown enemy
        assert!(!roster.apply_damage(999, 100, &mut events));
    }

    #[test]
    fn test_health_fixed_at_spawn() {
        let mut roster = roster();
        let mut events = Vec::new();
        let early = roster.spawn(EnemyClass::Weak, 0, 50.0, 5.0, &mut events);

        roster.update_difficulty(20_000, &mut events);
        assert!(events.iter().any(|e| matches!(e, GameEvent::TierChanged { index: 2, .. })));
        let late = roster.spawn(EnemyClass::Weak, 1, 50.0, 5.0, &mut events);

        assert_eq!(roster.get(early).unwrap().max_health, 200);
        assert_eq!(roster.get(late).unwrap().max_health, 400);
    }

    #[test]
    fn test_hit_flash_reverts_after_duration() {
        let mut roster = roster();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        let id = roster.spawn(EnemyClass::Tank, 0, 90.0, 0.0, &mut events);

        roster.apply_damage(id, 10, &mut events);
        assert!(roster.get(id).unwrap().flashing);

        events.clear();
        roster.tick(0.05, 1.0, &mut rng, &mut events);
        assert!(roster.get(id).unwrap().flashing);

        roster.tick(0.06, 1.0, &mut rng, &mut events);
        assert!(!roster.get(id).unwrap().flashing);
        assert!(events.contains(&GameEvent::HitFlash { id, active: false }));
    }

    #[test]
    fn test_repeat_hit_extends_flash() {
        let mut roster = roster();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut events = Vec::new();
        let id = roster.spawn(EnemyClass::Boss, 0, 90.0, 0.0, &mut events);

        roster.apply_damage(id, 10, &mut events);
        roster.tick(0.08, 1.0, &mut rng, &mut events);
        roster.apply_damage(id, 10, &mut events);
        roster.tick(0.04, 1.0, &mut rng, &mut events);
        // First revert would have been due at 0.1
        assert!(roster.get(id).unwrap().flashing);
        roster.tick(0.07, 1.0, &mut rng, &mut events);
        assert!(!roster.get(id).unwrap().flashing);
    }

    #[test]
    fn test_scrolls_and_despawns_without_score() {
        let mut roster = roster();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut events = Vec::new();
        let id = roster.spawn(EnemyClass::Weak, 2, -19.5, 10.0, &mut events);

        events.clear();
        roster.tick(0.1, 1.0, &mut rng, &mut events);
        assert!(roster.get(id).is_none());
        assert!(events.contains(&GameEvent::Despawned {
            entity: EntityRef::Enemy(id)
        }));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::ScoreAwarded { .. })));
    }

    #[test]
    fn test_movement_scaled_by_game_speed() {
        let mut roster = roster();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut events = Vec::new();
        let id = roster.spawn(EnemyClass::Weak, 0, 50.0, 6.0, &mut events);
        roster.tick(0.5, 0.5, &mut rng, &mut events);
        assert!((roster.get(id).unwrap().pos.z - 48.5).abs() < 1e-5);
    }

    #[test]
    fn test_spawn_respects_population_cap_and_lane_diversity() {
        let mut tuning = Tuning::default();
        tuning.tiers[0].max_population = 4;
        let mut roster = EnemyRoster::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(42);
        let mut events = Vec::new();

        let mut lanes = Vec::new();
        for _ in 0..10 {
            if let Some(id) = roster.try_spawn(&mut rng, &mut events) {
                lanes.push(roster.get(id).unwrap().lane);
            }
        }
        assert_eq!(roster.len(), 4);
        assert_eq!(lanes.len(), 4);
        for pair in lanes.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test]
    fn test_spawned_values_within_tier_bounds() {
        let mut roster = roster();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut events = Vec::new();
        for _ in 0..20 {
            let id = roster.try_spawn(&mut rng, &mut events).unwrap();
            let e = roster.get(id).unwrap().clone();
            assert!((30.0..=100.0).contains(&e.pos.z));
            assert!((4.5..=5.5).contains(&e.speed));
            let base = Tuning::default().class_stats(e.class).base_health;
            assert_eq!(e.max_health, base);
        }
    }

    #[test]
    fn test_single_lane_spawns() {
        let mut tuning = Tuning::default();
        tuning.lanes = vec![0.0];
        let mut roster = EnemyRoster::new(&tuning);
        let mut rng = Pcg32::seed_from_u64(5);
        let mut events = Vec::new();
        assert!(roster.try_spawn(&mut rng, &mut events).is_some());
        assert!(roster.try_spawn(&mut rng, &mut events).is_some());
        assert!(roster.enemies().iter().all(|e| e.lane == 0));
    }

    #[test]
    fn test_spawn_timer() {
        let mut roster = roster();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut events = Vec::new();
        // EASY interval is 1.5s
        for _ in 0..89 {
            roster.tick(1.0 / 60.0, 0.5, &mut rng, &mut events);
        }
        assert!(roster.is_empty());
        for _ in 0..2 {
            roster.tick(1.0 / 60.0, 0.5, &mut rng, &mut events);
        }
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_player_contact() {
        let mut roster = roster();
        let mut events = Vec::new();
        let id = roster.spawn(EnemyClass::Weak, 1, -10.0, 5.0, &mut events);
        let player = Aabb::from_center_size(Vec3::new(0.0, ENTITY_Y, -10.0), Vec3::new(1.0, 2.0, 1.0));
        assert_eq!(roster.check_player_collision(&player), Some(id));

        roster.remove(id, &mut events);
        assert_eq!(roster.check_player_collision(&player), None);
        assert!(roster.remove(id, &mut events).is_none());
    }
}
