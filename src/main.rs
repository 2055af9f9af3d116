//! Shoppy Bird entry point
//!
//! Natively this is a headless driver: an autopilot plays a number of runs
//! through the same frame clock and fixed stepper a browser host would use,
//! with the best score kept in a JSON file.
//!
//! Usage: `shoppy-bird [runs] [seed]`
//! Environment: `SHOPPY_BIRD_TUNING` (tuning JSON path), `SHOPPY_BIRD_SAVE`
//! (best-score file path), `RUST_LOG`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use shoppy_bird::persistence::JsonFileStore;
    use shoppy_bird::sim::{GameEvent, GamePhase, GameState, TickInput, snapshot, tick};
    use shoppy_bird::{FixedStepper, FrameClock, Performance, ScoreLedger, Tuning, Viewport};

    const DEFAULT_SAVE_PATH: &str = "shoppy_bird_save.json";
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Runs longer than this are abandoned
    const MAX_RUN_MS: f64 = 120_000.0;

    pub fn run() {
        shoppy_bird::platform::init_logging();

        let mut args = std::env::args().skip(1);
        let runs: u32 = args.next().and_then(|a| a.parse().ok()).unwrap_or(3);
        let seed: u64 = args.next().and_then(|a| a.parse().ok()).unwrap_or(0x5EED);

        let tuning = load_tuning();
        let save_path =
            std::env::var("SHOPPY_BIRD_SAVE").unwrap_or_else(|_| DEFAULT_SAVE_PATH.to_string());
        let mut ledger = ScoreLedger::new(Box::new(JsonFileStore::new(&save_path)));
        log::info!(
            "Shoppy Bird (headless) starting: {runs} runs, seed {seed}, best {} from {save_path}",
            ledger.best_score()
        );

        let max_frame_delta_ms = tuning.max_frame_delta_ms;
        let mut state = GameState::new(seed, tuning, Viewport::default(), ledger.best_score());
        let mut clock = FrameClock::new(max_frame_delta_ms);
        let mut stepper = FixedStepper::new();
        let mut elapsed_ms = 0.0;

        for run in 0..runs {
            if run > 0 {
                let restart = TickInput {
                    restart: true,
                    ..Default::default()
                };
                tick(&mut state, &mut ledger, &restart, 0.0);
                clock.reset();
                stepper.reset();
            }

            let run_started_ms = elapsed_ms;
            while state.phase != GamePhase::GameOver {
                elapsed_ms += FRAME_MS;
                let mut input = TickInput {
                    jump: autopilot_wants_jump(&state),
                    quit_to_menu: elapsed_ms - run_started_ms > MAX_RUN_MS,
                    ..Default::default()
                };
                let dt = clock.frame(elapsed_ms, FRAME_MS);
                stepper.advance(dt, |step| {
                    tick(&mut state, &mut ledger, &input, step);
                    // One-shot signals apply to the first substep only
                    input = TickInput::default();
                });
                report_events(&mut state);
            }

            let performance = Performance::for_score(state.score);
            log::info!(
                "Run {} finished: score {} | best {} | {}",
                run + 1,
                state.score,
                state.best_score,
                performance.message()
            );
            match serde_json::to_string(&snapshot(&state)) {
                Ok(json) => println!("{json}"),
                Err(e) => log::warn!("Could not serialize final frame: {e}"),
            }
        }

        if ledger.is_degraded() {
            log::warn!("Best score was kept in memory only this session");
        }
    }

    /// Flap whenever the bird sinks below the next gap center
    fn autopilot_wants_jump(state: &GameState) -> bool {
        if state.phase != GamePhase::Running {
            return false;
        }
        let player = &state.player;
        let left = player.pos.x - player.hitbox_size * 0.5;
        let target_y = state
            .zones
            .iter_active()
            .map(|(_, z)| z)
            .filter(|z| !z.consumed && z.bounds().max.x >= left)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map(|z| z.pos.y + z.size.y * 0.15)
            .unwrap_or(state.viewport.height * 0.5);
        player.pos.y > target_y && player.velocity_y > 0.0
    }

    fn report_events(state: &mut GameState) {
        for event in state.drain_events() {
            match event {
                GameEvent::Scored { score } => log::debug!("Score {score}"),
                GameEvent::Transition(transition) => log::debug!("Scene: {transition:?}"),
                _ => {}
            }
        }
    }

    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("SHOPPY_BIRD_TUNING") else {
            return Tuning::default();
        };
        let loaded = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|text| Tuning::from_json(&text).map_err(|e| e.to_string()));
        match loaded {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning.sanitized()
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {path}: {e}");
                Tuning::default()
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser host drives the library directly; this only wires up logging
    shoppy_bird::platform::init_logging();
}
