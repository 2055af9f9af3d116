//! Collision and scoring detection
//!
//! Detection is a plain query over the current positions; nothing is
//! callback-driven. Resolution then applies each contact in a fixed order:
//! scoring first, then at most one crash. A crash and a score in the same
//! tick both count since they come from different geometry.

use super::pool::EntityId;
use super::state::{CrashCause, GameEvent, GamePhase, GameState, SceneTransition};
use crate::highscores::ScoreLedger;

/// A pair that overlaps this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Player inside an unconsumed scoring zone
    Zone(EntityId),
    /// Player touching a pipe
    Obstacle(EntityId),
    /// Player touching the bottom edge of the world
    Floor,
}

/// List every overlap involving the player, zones first
pub fn overlapping_pairs(state: &GameState) -> Vec<Contact> {
    let mut contacts = Vec::new();
    if !state.player.enabled {
        return contacts;
    }
    let player = state.player.bounds();

    for (id, zone) in state.zones.iter_active() {
        if !zone.consumed && player.overlaps(&zone.bounds()) {
            contacts.push(Contact::Zone(id));
        }
    }
    for (id, obstacle) in state.obstacles.iter_active() {
        if player.overlaps(&obstacle.bounds()) {
            contacts.push(Contact::Obstacle(id));
        }
    }
    if player.max.y >= state.viewport.height {
        contacts.push(Contact::Floor);
    }
    contacts
}

/// Apply contacts. Returns true if the run ended.
pub fn resolve(state: &mut GameState, ledger: &mut ScoreLedger, contacts: &[Contact]) -> bool {
    for contact in contacts {
        if let Contact::Zone(id) = *contact {
            score_zone(state, id);
        }
    }

    let crash = contacts.iter().find_map(|c| match *c {
        Contact::Obstacle(id) => Some(CrashCause::Obstacle(id)),
        Contact::Floor => Some(CrashCause::Floor),
        Contact::Zone(_) => None,
    });
    match crash {
        Some(cause) => end_run(state, ledger, cause),
        None => false,
    }
}

/// Score a zone once. Consumed or inactive zones are ignored.
pub fn score_zone(state: &mut GameState, id: EntityId) -> bool {
    if !matches!(state.phase, GamePhase::Running | GamePhase::PauseRequested) {
        return false;
    }
    let Some(zone) = state.zones.get_mut(id) else {
        return false;
    };
    if !zone.active || zone.consumed {
        return false;
    }
    zone.consumed = true;
    state.score += 1;
    state.events.push(GameEvent::Scored { score: state.score });
    true
}

/// Enter game over. Only a `Running` run can end; anything else is a stale
/// contact and is ignored.
pub fn end_run(state: &mut GameState, ledger: &mut ScoreLedger, cause: CrashCause) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }

    state.phase = GamePhase::GameOver;
    state.player.enabled = false;
    state.player.tinted = true;
    let released = state.clear_world();
    log::debug!("Run {} ended, {} entities released", state.generation, released);

    let new_best = ledger.record_run_end(state.score);
    state.best_score = ledger.best_score();
    log::info!(
        "Game over ({:?}): score {} | best {}",
        cause,
        state.score,
        state.best_score
    );
    state.events.push(GameEvent::Crashed(cause));
    state
        .events
        .push(GameEvent::Transition(SceneTransition::GoToGameOver {
            score: state.score,
            best_score: state.best_score,
            new_best,
        }));
    true
}
