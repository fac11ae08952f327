//! Events emitted to the render, HUD and audio collaborators
//!
//! The simulation never talks to a scene graph directly. Hosts drain these
//! after each tick and mirror them into whatever they draw with.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyClass;
use super::powerup::PowerUpKind;

/// Identity of a simulated entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Enemy(u32),
    Gate(u32),
    Projectile(u32),
    PowerUp(u32),
}

/// What a renderer should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualKind {
    Player,
    Enemy(EnemyClass),
    Gate { multiplier: u32 },
    Projectile,
    PowerUp(PowerUpKind),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    Spawned {
        entity: EntityRef,
        kind: VisualKind,
        position: Vec3,
        scale: f32,
    },
    Despawned {
        entity: EntityRef,
    },
    /// A gate moved down its lane stack after a gate in front of it expired
    GateRepacked {
        id: u32,
        z: f32,
        multiplier: u32,
    },
    /// Enemy hit-flash on (`active`) or reverted to its own colors
    HitFlash {
        id: u32,
        active: bool,
    },
    /// Damage number popup
    EnemyDamaged {
        id: u32,
        position: Vec3,
        amount: u32,
        critical: bool,
        remaining: u32,
    },
    ScoreAwarded {
        class: EnemyClass,
        points: u64,
        total: u64,
    },
    PowerUpCollected {
        kind: PowerUpKind,
    },
    TierChanged {
        index: usize,
        name: String,
    },
    GameOver {
        score: u64,
        elapsed: f32,
    },
}
