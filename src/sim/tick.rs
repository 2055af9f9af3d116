//! Fixed timestep simulation tick
//!
//! One function per phase, dispatched on `GameState::phase`. A tick runs to
//! completion; timer firings are handled inside it, after collisions.

use glam::Vec2;

use super::collision;
use super::motion;
use super::rect::Rect;
use super::spawner;
use super::state::{GameEvent, GamePhase, GameState, SceneTransition};
use super::timer::{TimerFire, TimerKind};
use crate::highscores::ScoreLedger;
use crate::platform::Viewport;
use crate::secs_to_ms;

/// Input signals for a single tick (already debounced by the host)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump key pressed
    pub jump: bool,
    /// Tap position in viewport pixels; taps on UI controls are filtered out
    /// by the host
    pub pointer_tap: Option<Vec2>,
    /// Pause key or pause/resume button
    pub pause_toggle: bool,
    /// Start a new run (game over screen)
    pub restart: bool,
    /// Leave to the menu
    pub quit_to_menu: bool,
}

impl TickInput {
    /// Jump key, or a tap that landed on the playfield
    pub fn wants_jump(&self, viewport: &Viewport) -> bool {
        let playfield = Rect::new(Vec2::ZERO, Vec2::new(viewport.width, viewport.height));
        self.jump || self.pointer_tap.is_some_and(|p| playfield.contains_point(p))
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, ledger: &mut ScoreLedger, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
    state.time_ticks += 1;

    match state.phase {
        GamePhase::PauseRequested => {
            apply_pause(state);
            return;
        }
        GamePhase::Paused => {
            if input.quit_to_menu {
                quit_to_menu(state, ledger);
                return;
            }
            if !input.pause_toggle {
                return;
            }
            resume(state);
        }
        GamePhase::GameOver => {
            tick_game_over(state, ledger, input, dt);
            return;
        }
        GamePhase::Running => {
            if input.quit_to_menu {
                quit_to_menu(state, ledger);
                return;
            }
            if input.pause_toggle {
                request_pause(state);
            }
        }
    }

    // Guarded: a no-op once a pause is pending
    if input.wants_jump(&state.viewport) {
        motion::jump(state);
    }
    simulate(state, ledger, dt);
}

/// One step of running rules: motion, scroll, contacts, timers, recycling
fn simulate(state: &mut GameState, ledger: &mut ScoreLedger, dt: f32) {
    let dt_ms = secs_to_ms(dt);
    state.run_time_ms += dt_ms;

    motion::integrate_player(&mut state.player, &state.tuning, dt);
    motion::scroll_world(state, dt);

    if state.collisions_armed {
        let contacts = collision::overlapping_pairs(state);
        collision::resolve(state, ledger, &contacts);
    }

    for fire in state.timers.advance(dt_ms) {
        dispatch_timer(state, fire);
    }

    spawner::recycle_offscreen(state);
}

fn dispatch_timer(state: &mut GameState, fire: TimerFire) {
    if fire.generation != state.generation {
        log::debug!(
            "Dropping stale {:?} firing from run {} (current run {})",
            fire.kind,
            fire.generation,
            state.generation
        );
        return;
    }

    match fire.kind {
        TimerKind::ArmCollisions => {
            state.collisions_armed = true;
            log::debug!("Collisions armed at {:.0} ms", state.run_time_ms);
        }
        TimerKind::OpeningJump => {
            motion::jump(state);
        }
        TimerKind::SpawnPipes => {
            if matches!(state.phase, GamePhase::Running | GamePhase::PauseRequested) {
                spawner::spawn_pipe_row(state);
            }
        }
        TimerKind::SpawnCloud => {
            if matches!(state.phase, GamePhase::Running | GamePhase::PauseRequested) {
                spawner::spawn_cloud(state);
            }
        }
    }
}

fn request_pause(state: &mut GameState) {
    state.phase = GamePhase::PauseRequested;
    state.pause_indicator = true;
    state.events.push(GameEvent::PauseRequested);
    log::info!("Pause requested at {:.0} ms", state.run_time_ms);
}

fn apply_pause(state: &mut GameState) {
    state.player.enabled = false;
    state.timers.pause_all();
    state.phase = GamePhase::Paused;
    state.events.push(GameEvent::Paused);
    log::info!("Paused");
}

fn resume(state: &mut GameState) {
    state.player.enabled = true;
    state.timers.resume_all();
    state.pause_indicator = false;
    state.phase = GamePhase::Running;
    state.events.push(GameEvent::Resumed);
    log::info!("Resumed");
}

fn tick_game_over(state: &mut GameState, ledger: &mut ScoreLedger, input: &TickInput, dt: f32) {
    motion::crash_dive(&mut state.player, &state.tuning, dt);

    if input.restart {
        let best = ledger.reload();
        state.restart(best);
        state
            .events
            .push(GameEvent::Transition(SceneTransition::RestartRun));
    } else if input.quit_to_menu {
        quit_to_menu(state, ledger);
    }
}

/// End the run if it is still live, then hand off to the menu
fn quit_to_menu(state: &mut GameState, ledger: &mut ScoreLedger) {
    if state.phase != GamePhase::GameOver {
        ledger.record_run_end(state.score);
        state.best_score = ledger.best_score();
        state.phase = GamePhase::GameOver;
        log::info!(
            "Run {} abandoned: score {} | best {}",
            state.generation,
            state.score,
            state.best_score
        );
    }
    state.teardown();
    state
        .events
        .push(GameEvent::Transition(SceneTransition::GoToMenu));
}
