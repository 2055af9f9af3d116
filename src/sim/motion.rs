//! Motion integration
//!
//! Semi-implicit Euler: velocity first, then position with the new velocity.
//! Everything is scaled by `dt` so the result does not depend on frame rate.

use super::state::{GameEvent, GamePhase, GameState, Player};
use crate::tuning::Tuning;

/// Jump if the run accepts input. Returns true if the jump happened.
pub fn jump(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running || !state.player.enabled {
        return false;
    }
    state.player.velocity_y = state.tuning.jump_impulse;
    state.player.rotation = state.tuning.flap_angle;
    state.events.push(GameEvent::Jumped);
    true
}

/// Advance the player under gravity and apply the ceiling rule
pub fn integrate_player(player: &mut Player, tuning: &Tuning, dt: f32) {
    if !player.enabled {
        return;
    }

    player.velocity_y += tuning.gravity * dt;
    player.pos.y += player.velocity_y * dt;

    // Nose follows velocity once the climb has mostly bled off
    if player.rotation < tuning.dive_angle && player.velocity_y > tuning.jump_impulse * 0.5 {
        player.rotation += player.velocity_y / tuning.gravity * tuning.angular_velocity * dt;
    }
    player.rotation = player.rotation.clamp(tuning.flap_angle, tuning.dive_angle);

    // Ceiling: stop dead, no residual spin
    if player.display_top() < 0.0 {
        player.pos.y = player.display_size * 0.5;
        player.velocity_y = 0.0;
        player.rotation = 0.0;
    }
}

/// Keep turning toward the dive angle after a crash (visual only)
pub fn crash_dive(player: &mut Player, tuning: &Tuning, dt: f32) {
    if player.rotation < tuning.dive_angle {
        player.rotation = (player.rotation + tuning.angular_velocity * dt).min(tuning.dive_angle);
    }
}

/// Scroll every active obstacle, zone and cloud by its own velocity
pub fn scroll_world(state: &mut GameState, dt: f32) {
    for (_, obstacle) in state.obstacles.iter_active_mut() {
        obstacle.pos.x += obstacle.velocity_x * dt;
    }
    for (_, zone) in state.zones.iter_active_mut() {
        zone.pos.x += zone.velocity_x * dt;
    }
    for (_, cloud) in state.clouds.iter_active_mut() {
        cloud.pos.x += cloud.velocity_x * dt;
    }
}
