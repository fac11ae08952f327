//! Game state and core simulation types
//!
//! Everything a run needs lives in `GameState`, including the one RNG every
//! subsystem draws from. Same seed and same inputs give the same run.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::SimulationClock;
use super::collision::Aabb;
use super::enemy::EnemyRoster;
use super::events::GameEvent;
use super::gate::GateTrack;
use super::powerup::PowerUpEngine;
use super::projectile::ProjectileEngine;
use super::weapon::WeaponState;
use crate::consts::{ENTITY_Y, PLAYER_SIZE, PLAYER_Z};
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// An enemy reached the player; the run is over
    GameOver,
}

/// The player's runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Lane the player is in or sliding toward
    pub lane: usize,
    pub pos: Vec3,
}

impl Player {
    pub fn new(lane: usize, x: f32) -> Self {
        Self {
            lane,
            pos: Vec3::new(x, ENTITY_Y, PLAYER_Z),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.pos, Vec3::from(PLAYER_SIZE))
    }

    /// Slide toward `target_x` at `speed`, snapping once within `snap`
    pub fn slide_toward(&mut self, target_x: f32, speed: f32, snap: f32, dt: f32) {
        let dx = target_x - self.pos.x;
        if dx.abs() <= snap {
            self.pos.x = target_x;
        } else {
            let step = (speed * dt).min(dx.abs());
            self.pos.x += dx.signum() * step;
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub clock: SimulationClock,
    pub score: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub auto_fire: bool,
    /// Time banked toward the next automatic shot
    pub auto_fire_timer: f32,
    pub roster: EnemyRoster,
    pub gates: GateTrack,
    pub projectiles: ProjectileEngine,
    pub powerups: PowerUpEngine,
    pub weapon: WeaponState,
    /// Enemies defeated this run
    pub kills: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Events since the host last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a game state with custom balance. Tuning that fails
    /// validation is replaced by the defaults.
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Rejected tuning: {}. Using defaults", e);
                Tuning::default()
            }
        };
        let lane = tuning
            .player
            .start_lane
            .min(tuning.lanes.len().saturating_sub(1));
        let x = tuning.lanes.get(lane).copied().unwrap_or(0.0);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            clock: SimulationClock::new(&tuning.clock),
            score: 0,
            phase: GamePhase::Playing,
            player: Player::new(lane, x),
            auto_fire: tuning.player.auto_fire,
            auto_fire_timer: 0.0,
            roster: EnemyRoster::new(&tuning),
            gates: GateTrack::new(&tuning),
            projectiles: ProjectileEngine::new(&tuning),
            powerups: PowerUpEngine::new(&tuning),
            weapon: WeaponState::new(&tuning.weapon),
            kills: 0,
            time_ticks: 0,
            events: Vec::new(),
            tuning,
        }
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// X of the lane the player is heading to
    pub fn player_target_x(&self) -> f32 {
        self.tuning
            .lanes
            .get(self.player.lane)
            .copied()
            .unwrap_or(self.player.pos.x)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.lane, 1);
        assert_eq!(state.player.pos, Vec3::new(0.0, 1.0, -10.0));
        assert!(state.auto_fire);
        assert_eq!(state.score, 0);
        assert_eq!(state.clock.game_speed, 0.5);
        assert!(state.roster.is_empty());
    }

    #[test]
    fn test_start_lane_clamped() {
        let mut tuning = Tuning::default();
        tuning.lanes = vec![-2.0, 2.0];
        tuning.player.start_lane = 5;
        let state = GameState::with_tuning(1, tuning);
        assert_eq!(state.player.lane, 1);
        assert_eq!(state.player.pos.x, 2.0);
    }

    #[test]
    fn test_slide_and_snap() {
        let mut player = Player::new(1, 0.0);
        player.slide_toward(4.0, 10.0, 0.1, 0.1);
        assert!((player.pos.x - 1.0).abs() < 1e-6);
        for _ in 0..3 {
            player.slide_toward(4.0, 10.0, 0.1, 0.1);
        }
        assert_eq!(player.pos.x, 4.0);

        player.pos.x = 3.95;
        player.slide_toward(4.0, 10.0, 0.1, 0.0);
        assert_eq!(player.pos.x, 4.0);
    }

    #[test]
    fn test_invalid_tuning_falls_back_to_defaults() {
        use crate::sim::difficulty::Tier;

        let mut tuning = Tuning::default();
        tuning.tiers[2].score = tuning.tiers[1].score;
        tuning.weapon.fire_rate = 7.0;
        let mut state = GameState::with_tuning(5, tuning);
        assert_eq!(state.tuning.tiers, Tier::default_table());
        assert_eq!(state.weapon.fire_rate, 2.0);

        // Scores around the repeated threshold stay well defined
        state.score = state.tuning.tiers[1].score + 1;
        for _ in 0..10 {
            crate::sim::tick(&mut state, &crate::sim::TickInput::default(), 1.0 / 60.0);
        }
        assert!(state.roster.model().progress(state.score) <= 1.0);
    }

    #[test]
    fn test_drain_events() {
        let mut state = GameState::new(1);
        state.events.push(GameEvent::PowerUpCollected {
            kind: crate::sim::PowerUpKind::Pierce,
        });
        assert_eq!(state.drain_events().len(), 1);
        assert!(state.events.is_empty());
    }
}
