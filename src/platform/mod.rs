//! Platform abstraction layer
//!
//! Maps host input onto `TickInput`. The browser session wrapper lives in
//! `web` and only exists on wasm32.

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::sim::TickInput;

/// Apply a keydown (`KeyboardEvent.code`) to the pending input.
/// Returns false for keys the game does not use.
pub fn apply_key(code: &str, input: &mut TickInput) -> bool {
    match code {
        "ArrowLeft" | "KeyA" => input.move_left = true,
        "ArrowRight" | "KeyD" => input.move_right = true,
        "Space" => input.fire = true,
        "KeyT" => input.toggle_auto_fire = true,
        "KeyP" | "Escape" => input.pause = true,
        "KeyI" => {
            input.autopilot = !input.autopilot;
            log::info!("Autopilot: {}", input.autopilot);
        }
        _ => return false,
    }
    true
}

/// Reset the flags that must only be seen by one tick.
/// Autopilot is a mode and stays as it is.
pub fn clear_one_shots(input: &mut TickInput) {
    input.move_left = false;
    input.move_right = false;
    input.fire = false;
    input.toggle_auto_fire = false;
    input.pause = false;
}
