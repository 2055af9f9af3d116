//! Obstacle and ambience spawning, plus recycling
//!
//! Each pipe row is three pooled entities sharing one spawn group: an upper
//! pipe, a lower pipe and a narrow scoring zone, all at the same x and built
//! from the same gap center. Anything that scrolls past the left edge goes
//! back to its pool.

use glam::Vec2;
use rand::Rng;

use super::state::{Cloud, GameEvent, GameState, Obstacle, ObstacleKind, ScoringZone};
use crate::platform::Viewport;
use crate::tuning::Tuning;

/// Allowed gap centers `[gap * margin, height - gap * margin]`.
///
/// On a viewport too short for that band the gap is pinned to the middle.
pub fn gap_center_range(tuning: &Tuning, viewport: &Viewport) -> (f32, f32) {
    let lo = tuning.gap_size * tuning.gap_margin;
    let hi = viewport.height - tuning.gap_size * tuning.gap_margin;
    if lo > hi {
        let mid = viewport.height * 0.5;
        (mid, mid)
    } else {
        (lo, hi)
    }
}

/// Draw a whole-pixel gap center uniformly from the allowed band
pub fn roll_gap_center<R: Rng>(rng: &mut R, tuning: &Tuning, viewport: &Viewport) -> f32 {
    let (lo, hi) = gap_center_range(tuning, viewport);
    let (lo_px, hi_px) = (lo.ceil() as i32, hi.floor() as i32);
    if lo_px > hi_px {
        return (lo + hi) * 0.5;
    }
    rng.random_range(lo_px..=hi_px) as f32
}

/// Upper bound on simultaneously live spawn groups
pub fn max_live_groups(tuning: &Tuning, viewport: &Viewport) -> usize {
    (viewport.width / tuning.spawn_spacing()).ceil() as usize + 2
}

/// Spawn a pipe row at a random gap. Returns the gap center.
pub fn spawn_pipe_row(state: &mut GameState) -> f32 {
    let gap_center = roll_gap_center(&mut state.rng, &state.tuning, &state.viewport);
    spawn_pipe_row_at(state, gap_center);
    gap_center
}

/// Spawn a pipe row around `gap_center`. Returns the spawn group id.
pub fn spawn_pipe_row_at(state: &mut GameState, gap_center: f32) -> u32 {
    let group = state.next_group_id();
    let tuning = &state.tuning;
    let x = state.viewport.width + tuning.pipe_width * 0.5;
    let half_gap = tuning.gap_size * 0.5;
    let pipe_size = Vec2::new(tuning.pipe_width, state.viewport.height);
    let speed = tuning.scroll_speed;

    for (kind, y) in [
        (ObstacleKind::Upper, gap_center - half_gap),
        (ObstacleKind::Lower, gap_center + half_gap),
    ] {
        let (_, pipe) = state.obstacles.acquire();
        *pipe = Obstacle {
            kind,
            pos: Vec2::new(x, y),
            size: pipe_size,
            velocity_x: speed,
            active: true,
            visible: true,
            group,
        };
    }

    let (_, zone) = state.zones.acquire();
    *zone = ScoringZone {
        pos: Vec2::new(x, gap_center),
        size: Vec2::new(tuning.score_zone_width, tuning.gap_size),
        velocity_x: speed,
        active: true,
        consumed: false,
        group,
    };

    log::debug!("Pipe row {group} spawned at gap {gap_center}");
    state.events.push(GameEvent::PipesSpawned { group, gap_center });
    group
}

/// Spawn one decoration cloud just off the right edge
pub fn spawn_cloud(state: &mut GameState) {
    let band = (state.viewport.height * state.tuning.cloud_band).max(1.0);
    let y = state.rng.random_range(0.0..band);
    let scale = state.rng.random_range(0.6..1.4_f32);
    let width = state.tuning.cloud_width * scale;
    let x = state.viewport.width + width * 0.5;
    // Bigger clouds read as closer, so they drift faster
    let velocity_x = state.tuning.cloud_speed * scale;

    let (_, cloud) = state.clouds.acquire();
    *cloud = Cloud {
        pos: Vec2::new(x, y),
        scale,
        width,
        velocity_x,
        active: true,
    };
}

/// Return everything left of the recycle line to its pool. Returns the count.
pub fn recycle_offscreen(state: &mut GameState) -> usize {
    let threshold = state.tuning.recycle_threshold();
    let recycled = state.obstacles.release_where(|o| o.pos.x < threshold)
        + state.zones.release_where(|z| z.pos.x < threshold)
        + state.clouds.release_where(|c| c.pos.x < -c.width);
    if recycled > 0 {
        log::debug!(
            "Recycled {recycled} entities (pool capacity: {} pipes, {} zones, {} clouds)",
            state.obstacles.capacity(),
            state.zones.capacity(),
            state.clouds.capacity()
        );
    }
    recycled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::motion::scroll_world;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state() -> GameState {
        GameState::new(11, Tuning::default(), Viewport::default(), 0)
    }

    #[test]
    fn gap_centers_stay_in_band() {
        let tuning = Tuning::default();
        let viewport = Viewport::default();
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..1000 {
            let c = roll_gap_center(&mut rng, &tuning, &viewport);
            assert!((105.0..=495.0).contains(&c), "gap center {c}");
            assert_eq!(c, c.round());
        }
    }

    #[test]
    fn short_viewport_pins_gap_to_middle() {
        let tuning = Tuning::default();
        let viewport = Viewport {
            width: 800.0,
            height: 150.0,
        };
        assert_eq!(gap_center_range(&tuning, &viewport), (75.0, 75.0));
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(roll_gap_center(&mut rng, &tuning, &viewport), 75.0);
    }

    #[test]
    fn pipe_row_shares_x_and_gap() {
        let mut s = state();
        let group = spawn_pipe_row_at(&mut s, 300.0);

        let pipes: Vec<_> = s.obstacles.iter_active().map(|(_, o)| o.clone()).collect();
        assert_eq!(pipes.len(), 2);
        let upper = pipes.iter().find(|o| o.kind == ObstacleKind::Upper).unwrap();
        let lower = pipes.iter().find(|o| o.kind == ObstacleKind::Lower).unwrap();
        assert_eq!(upper.pos.x, 840.0);
        assert_eq!(lower.pos.x, 840.0);
        assert_eq!(upper.pos.y, 225.0);
        assert_eq!(lower.pos.y, 375.0);
        assert_eq!(upper.group, group);
        assert_eq!(lower.velocity_x, -150.0);

        let (_, zone) = s.zones.iter_active().next().unwrap();
        assert_eq!(zone.pos, Vec2::new(840.0, 300.0));
        assert_eq!(zone.size, Vec2::new(5.0, 150.0));
        assert!(!zone.consumed);
        assert_eq!(zone.group, group);
    }

    #[test]
    fn offscreen_rows_are_recycled_and_reused() {
        let mut s = state();
        spawn_pipe_row_at(&mut s, 300.0);
        // 840 + 85 px at 150 px/s
        for _ in 0..((925.0 / 150.0 / 0.01) as usize) {
            scroll_world(&mut s, 0.01);
            recycle_offscreen(&mut s);
        }
        assert_eq!(s.obstacles.active_count(), 2);
        scroll_world(&mut s, 0.05);
        assert_eq!(recycle_offscreen(&mut s), 3);
        assert_eq!(s.live_groups(), 0);

        spawn_pipe_row_at(&mut s, 200.0);
        assert_eq!(s.obstacles.capacity(), 2);
        assert_eq!(s.zones.capacity(), 1);
    }

    #[test]
    fn clouds_spawn_in_top_band_and_recycle() {
        let mut s = state();
        for _ in 0..50 {
            spawn_cloud(&mut s);
        }
        for (_, c) in s.clouds.iter_active() {
            assert!(c.pos.y >= 0.0 && c.pos.y < 240.0);
            assert!(c.velocity_x < 0.0);
        }
        for (_, c) in s.clouds.iter_active_mut() {
            c.pos.x = -c.width - 1.0;
        }
        assert_eq!(recycle_offscreen(&mut s), 50);
    }

    #[test]
    fn live_group_bound() {
        let tuning = Tuning::default();
        assert_eq!(max_live_groups(&tuning, &Viewport::default()), 6);
    }
}
