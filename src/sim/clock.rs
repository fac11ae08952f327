//! Session time and the global speed ramp

use serde::{Deserialize, Serialize};

use crate::tuning::ClockTuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationClock {
    /// Seconds of play so far (paused time excluded)
    pub elapsed: f32,
    /// Scales enemy movement
    pub game_speed: f32,
    tuning: ClockTuning,
}

impl SimulationClock {
    pub fn new(tuning: &ClockTuning) -> Self {
        Self {
            elapsed: 0.0,
            game_speed: tuning.start_speed,
            tuning: tuning.clone(),
        }
    }

    /// Consume one frame. Returns the step actually simulated, which never
    /// exceeds the configured maximum.
    pub fn advance(&mut self, frame_dt: f32) -> f32 {
        let dt = frame_dt.clamp(0.0, self.tuning.max_dt);
        self.elapsed += dt;

        let steps = (self.elapsed / self.tuning.speed_step_interval).floor();
        self.game_speed =
            (self.tuning.start_speed + steps * self.tuning.speed_step).min(self.tuning.max_speed);
        dt
    }
}
