//! Browser bindings
//!
//! JS owns the render loop and calls `tick` once per animation frame, then
//! pulls events and the draw list as JSON.

use wasm_bindgen::prelude::*;

use super::{apply_key, clear_one_shots};
use crate::sim::{GameState, TickInput, render_snapshot, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Gate Runner wasm module loaded");
}

#[wasm_bindgen]
pub struct WebSession {
    state: GameState,
    input: TickInput,
}

#[wasm_bindgen]
impl WebSession {
    /// Session seeded from the wall clock
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebSession {
        Self::with_seed(js_sys::Date::now() as u64)
    }

    pub fn with_seed(seed: u64) -> WebSession {
        log::info!("Game initialized with seed: {}", seed);
        WebSession {
            state: GameState::new(seed),
            input: TickInput::default(),
        }
    }

    /// Session with a JSON tuning document
    pub fn with_tuning(seed: u64, json: &str) -> Result<WebSession, JsValue> {
        let tuning = Tuning::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(WebSession {
            state: GameState::with_tuning(seed, tuning),
            input: TickInput::default(),
        })
    }

    pub fn key_down(&mut self, code: &str) -> bool {
        apply_key(code, &mut self.input)
    }

    /// Tab hidden or window blurred
    pub fn auto_pause(&mut self) {
        if self.state.phase == crate::sim::GamePhase::Playing {
            self.input.pause = true;
            log::info!("Auto-paused");
        }
    }

    pub fn tick(&mut self, frame_dt: f32) {
        tick(&mut self.state, &self.input, frame_dt);
        clear_one_shots(&mut self.input);
    }

    /// Drain pending events as a JSON array
    pub fn events_json(&mut self) -> String {
        let events = self.state.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::error!("Failed to encode events: {}", e);
            "[]".to_string()
        })
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&render_snapshot(&self.state)).unwrap_or_else(|e| {
            log::error!("Failed to encode snapshot: {}", e);
            "[]".to_string()
        })
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn elapsed(&self) -> f32 {
        self.state.clock.elapsed
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn fire_rate(&self) -> f32 {
        self.state.weapon.fire_rate
    }

    pub fn damage_multiplier(&self) -> f32 {
        self.state.weapon.permanent_multiplier
    }

    pub fn piercing_shots(&self) -> u32 {
        self.state.weapon.piercing_shots
    }

    pub fn auto_fire(&self) -> bool {
        self.state.auto_fire
    }
}

impl Default for WebSession {
    fn default() -> Self {
        Self::new()
    }
}
