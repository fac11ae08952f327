//! Gate Runner entry point
//!
//! On the web the game is driven from JS through `platform::web`. Natively
//! this runs a headless autopilot session and prints a summary.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use gate_runner::Tuning;
    use gate_runner::consts::MAX_FRAME_DT;
    use gate_runner::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(12345);
    let seconds = args
        .get(1)
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(120.0);
    let tuning = match args.get(2) {
        Some(path) => load_tuning(path),
        None => Tuning::default(),
    };

    log::info!("Gate Runner (native) starting, seed {} for {}s", seed, seconds);

    let mut state = GameState::with_tuning(seed, tuning);
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut kills_by_class = [0u32; gate_runner::sim::EnemyClass::COUNT];
    let mut powerups = 0u32;
    while state.clock.elapsed < seconds && !state.is_over() {
        tick(&mut state, &input, MAX_FRAME_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::ScoreAwarded { class, .. } => kills_by_class[class.index()] += 1,
                GameEvent::PowerUpCollected { .. } => powerups += 1,
                _ => {}
            }
        }
    }

    let outcome = if state.is_over() { "overrun" } else { "survived" };
    log::info!("Session {} after {:.1}s", outcome, state.clock.elapsed);
    println!("\nGate Runner session (seed {})", seed);
    println!("  Outcome:      {} at {:.1}s", outcome, state.clock.elapsed);
    println!("  Score:        {}", state.score);
    println!(
        "  Tier:         {}",
        state.roster.model().tiers()[state.roster.tier_index()].name
    );
    println!("  Kills:        {} {:?}", state.kills, kills_by_class);
    println!("  Power-ups:    {}", powerups);
    println!(
        "  Weapon:       {:.1} shots/s, x{:.2} damage, {} pierce",
        state.weapon.fire_rate, state.weapon.permanent_multiplier, state.weapon.piercing_shots
    );
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> gate_runner::Tuning {
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|json| gate_runner::Tuning::from_json(&json).map_err(|e| e.to_string()));
    match loaded {
        Ok(tuning) => {
            log::info!("Loaded tuning from {}", path);
            tuning
        }
        Err(e) => {
            log::error!("Bad tuning file {}: {}. Using defaults", path, e);
            gate_runner::Tuning::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
