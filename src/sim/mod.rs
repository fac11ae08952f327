//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only, owned by `GameState`
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies; hosts read `GameEvent`s and
//!   `render_snapshot`

pub mod clock;
pub mod collision;
pub mod difficulty;
pub mod enemy;
pub mod events;
pub mod gate;
pub mod powerup;
pub mod projectile;
pub mod schedule;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod weapon;

pub use clock::SimulationClock;
pub use collision::Aabb;
pub use difficulty::{DifficultyModel, SpawnParams, Tier};
pub use enemy::{Enemy, EnemyClass, EnemyId, EnemyRoster};
pub use events::{EntityRef, GameEvent, VisualKind};
pub use gate::{Gate, GateId, GateTrack, multiplier_for_rank};
pub use powerup::{PowerUp, PowerUpEngine, PowerUpId, PowerUpKind};
pub use projectile::{EnemyDefeat, GateTag, Projectile, ProjectileEngine, ProjectileId};
pub use schedule::Scheduler;
pub use snapshot::{RenderItem, render_snapshot};
pub use state::{GamePhase, GameState, Player};
pub use tick::{TickInput, tick};
pub use weapon::{DamageRoll, WeaponState};
