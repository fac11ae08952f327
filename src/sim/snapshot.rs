//! Flat per-frame view of everything a renderer needs to draw

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::events::{EntityRef, VisualKind};
use super::state::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    /// `None` for the player
    pub entity: Option<EntityRef>,
    pub kind: VisualKind,
    pub position: Vec3,
    /// Yaw on the XZ plane, 0 facing +Z
    pub heading: f32,
    pub scale: f32,
    /// Enemy hit flash
    pub flashing: bool,
    /// Enemy health bar fill
    pub health: Option<f32>,
}

/// Build the draw list for the current state: player, gates, enemies,
/// projectiles, then power-ups
pub fn render_snapshot(state: &GameState) -> Vec<RenderItem> {
    let mut items = Vec::with_capacity(
        1 + state.gates.gates().len()
            + state.roster.len()
            + state.projectiles.len()
            + state.powerups.len(),
    );

    items.push(RenderItem {
        entity: None,
        kind: VisualKind::Player,
        position: state.player.pos,
        heading: 0.0,
        scale: 1.0,
        flashing: false,
        health: None,
    });

    items.extend(state.gates.gates().iter().map(|g| RenderItem {
        entity: Some(EntityRef::Gate(g.id)),
        kind: VisualKind::Gate {
            multiplier: g.multiplier,
        },
        position: g.pos,
        heading: 0.0,
        scale: 1.0,
        flashing: false,
        health: None,
    }));

    items.extend(state.roster.enemies().iter().map(|e| RenderItem {
        entity: Some(EntityRef::Enemy(e.id)),
        kind: VisualKind::Enemy(e.class),
        position: e.pos,
        // Enemies face the player
        heading: std::f32::consts::PI,
        scale: e.scale,
        flashing: e.flashing,
        health: Some(e.health_fraction()),
    }));

    items.extend(state.projectiles.projectiles().iter().map(|p| RenderItem {
        entity: Some(EntityRef::Projectile(p.id)),
        kind: VisualKind::Projectile,
        position: p.pos,
        heading: p.heading(),
        scale: 1.0,
        flashing: false,
        health: None,
    }));

    items.extend(state.powerups.powerups().iter().map(|p| RenderItem {
        entity: Some(EntityRef::PowerUp(p.id)),
        kind: VisualKind::PowerUp(p.kind),
        position: p.pos,
        heading: 0.0,
        scale: 1.0,
        flashing: false,
        health: None,
    }));

    items
}
