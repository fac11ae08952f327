//! Gate Runner - A lane-based endless runner shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (enemies, gates, projectiles, power-ups)
//! - `tuning`: Data-driven game balance
//! - `platform`: Browser/native platform abstraction

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Largest time step a single tick may consume (seconds)
    pub const MAX_FRAME_DT: f32 = 1.0 / 60.0;

    /// Player sits this far behind the world origin, facing +Z
    pub const PLAYER_Z: f32 = -10.0;
    /// Height of player/enemy/power-up centers above the platform
    pub const ENTITY_Y: f32 = 1.0;

    /// Enemies, projectiles and power-ups behind this Z are gone
    pub const DESPAWN_Z: f32 = -20.0;

    /// Unscaled enemy box (width, height, depth)
    pub const ENEMY_SIZE: [f32; 3] = [1.0, 2.0, 1.0];
    /// Player box (width, height, depth)
    pub const PLAYER_SIZE: [f32; 3] = [1.0, 2.0, 1.0];
    /// Projectile sphere radius
    pub const PROJECTILE_RADIUS: f32 = 0.2;
    /// Power-up octahedron radius
    pub const POWERUP_RADIUS: f32 = 0.5;
}

/// Unit direction on the XZ plane for a heading angle (0 = straight ahead, +Z)
#[inline]
pub fn heading_to_direction(heading: f32) -> Vec3 {
    Vec3::new(heading.sin(), 0.0, heading.cos())
}

/// Heading angle of a direction on the XZ plane
#[inline]
pub fn direction_to_heading(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// Symmetric fan of `count` headings around `center`, `step` radians apart
pub fn fan_headings(center: f32, count: u32, step: f32) -> impl Iterator<Item = f32> {
    let half = (count.saturating_sub(1)) as f32 / 2.0;
    (0..count).map(move |i| center + step * (i as f32 - half))
}

/// Pick an index from a weight table using `roll` in [0, 1).
///
/// The roll is scaled by the table total, so weights need not sum to 1.
/// Returns `None` if rounding leaves the cumulative sum short of the roll;
/// callers fall back to their first entry.
pub fn weighted_pick(weights: &[f32], roll: f32) -> Option<usize> {
    let total: f32 = weights.iter().sum();
    let target = roll * total;
    let mut cumulative = 0.0;
    for (i, w) in weights.iter().enumerate() {
        cumulative += w;
        if target < cumulative {
            return Some(i);
        }
    }
    None
}
