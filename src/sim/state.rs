//! Game state and core simulation types
//!
//! One `GameState` holds a whole session: the current run's phase, score and
//! player, plus the entity pools that outlive individual runs.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::pool::{EntityId, EntityPool, Poolable};
use super::rect::Rect;
use super::timer::{Timer, Timers};
use crate::platform::Viewport;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Pause asked for this tick; applied at the start of the next one
    PauseRequested,
    /// Simulation frozen, waiting for resume
    Paused,
    /// Run ended
    GameOver,
}

/// The player-controlled flyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position; x never changes after spawn
    pub pos: Vec2,
    /// Vertical velocity (px/s, negative = up)
    pub velocity_y: f32,
    /// Visual rotation in degrees (negative = nose up)
    pub rotation: f32,
    /// Physics body enabled; disabled while paused or after game over
    pub enabled: bool,
    /// Drawn with the crash tint
    pub tinted: bool,
    pub display_size: f32,
    pub hitbox_size: f32,
}

impl Player {
    pub fn spawn(tuning: &Tuning, viewport: &Viewport) -> Self {
        Self {
            pos: Vec2::new(
                viewport.width * tuning.player_start_x,
                viewport.height * tuning.player_start_y,
            ),
            velocity_y: 0.0,
            rotation: 0.0,
            enabled: true,
            tinted: false,
            display_size: tuning.player_display_size,
            hitbox_size: tuning.player_hitbox_size,
        }
    }

    /// Collision box
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, Vec2::splat(self.hitbox_size))
    }

    /// Top edge of the drawn sprite
    pub fn display_top(&self) -> f32 {
        self.pos.y - self.display_size * 0.5
    }
}

/// Which half of a pipe pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Hangs from the top; `pos.y` is its bottom edge
    #[default]
    Upper,
    /// Stands on the bottom; `pos.y` is its top edge
    Lower,
}

/// One pipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// x = center, y = the edge facing the gap
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_x: f32,
    pub active: bool,
    pub visible: bool,
    /// Spawn group shared with its partner pipe and zone
    pub group: u32,
}

impl Obstacle {
    pub fn bounds(&self) -> Rect {
        match self.kind {
            ObstacleKind::Upper => Rect::above(self.pos, self.size),
            ObstacleKind::Lower => Rect::below(self.pos, self.size),
        }
    }
}

impl Poolable for Obstacle {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.visible = false;
        self.velocity_x = 0.0;
    }
}

/// Invisible trigger in the middle of a gap
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringZone {
    /// Gap center
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_x: f32,
    pub active: bool,
    /// Already scored; never scores again
    pub consumed: bool,
    pub group: u32,
}

impl ScoringZone {
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.pos, self.size)
    }
}

impl Poolable for ScoringZone {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.consumed = true;
        self.velocity_x = 0.0;
    }
}

/// Background decoration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub scale: f32,
    pub width: f32,
    pub velocity_x: f32,
    pub active: bool,
}

impl Poolable for Cloud {
    fn is_active(&self) -> bool {
        self.active
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.velocity_x = 0.0;
    }
}

/// What ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    Obstacle(EntityId),
    Floor,
}

/// Scene changes requested of the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneTransition {
    GoToMenu,
    GoToGameOver {
        score: u64,
        best_score: u64,
        new_best: bool,
    },
    RestartRun,
}

/// Notable things that happened during a tick, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { generation: u32 },
    Jumped,
    Scored { score: u64 },
    PipesSpawned { group: u32, gap_center: f32 },
    PauseRequested,
    Paused,
    Resumed,
    Crashed(CrashCause),
    Transition(SceneTransition),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    /// Run counter; bumped on every restart
    pub generation: u32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Gaps cleared this run
    pub score: u64,
    /// Best score as of the last ledger read/write
    pub best_score: u64,
    /// Physics time of the current run
    pub run_time_ms: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Collision and scoring checks are live
    pub collisions_armed: bool,
    /// "Paused" overlay and "Resume" button shown
    pub pause_indicator: bool,
    pub player: Player,
    pub obstacles: EntityPool<Obstacle>,
    pub zones: EntityPool<ScoringZone>,
    pub clouds: EntityPool<Cloud>,
    pub timers: Timers,
    pub events: Vec<GameEvent>,
    /// Next spawn group id
    next_group: u32,
}

impl GameState {
    /// Create a session and start its first run
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport, best_score: u64) -> Self {
        let tuning = tuning.sanitized();
        let player = Player::spawn(&tuning, &viewport);
        let mut state = Self {
            seed,
            generation: 0,
            rng: run_rng(seed, 0),
            timers: arm_timers(&tuning, 0),
            tuning,
            viewport,
            phase: GamePhase::Running,
            score: 0,
            best_score,
            run_time_ms: 0.0,
            time_ticks: 0,
            collisions_armed: false,
            pause_indicator: false,
            player,
            obstacles: EntityPool::new(),
            zones: EntityPool::new(),
            clouds: EntityPool::new(),
            events: Vec::new(),
            next_group: 1,
        };
        state.collisions_armed = state.tuning.collision_grace_ms <= 0.0;
        log::info!(
            "Run 0 started (seed {}, viewport {}x{})",
            seed,
            state.viewport.width,
            state.viewport.height
        );
        state.events.push(GameEvent::RunStarted { generation: 0 });
        state
    }

    /// Cancel the run's timers and return every world entity to its pool.
    /// The player is left as is. Returns the number of entities released.
    pub fn clear_world(&mut self) -> usize {
        self.timers.cancel_all();
        self.collisions_armed = false;
        self.obstacles.release_all() + self.zones.release_all() + self.clouds.release_all()
    }

    /// Stop the current run: clear the world and disable the player
    pub fn teardown(&mut self) {
        let released = self.clear_world();
        self.player.enabled = false;
        self.pause_indicator = false;
        log::debug!("Run {} torn down, {} entities released", self.generation, released);
    }

    /// Tear down and start a fresh run with the same pools
    pub fn restart(&mut self, best_score: u64) {
        self.teardown();
        self.generation = self.generation.wrapping_add(1);
        self.rng = run_rng(self.seed, self.generation);
        self.timers = arm_timers(&self.tuning, self.generation);
        self.player = Player::spawn(&self.tuning, &self.viewport);
        self.phase = GamePhase::Running;
        self.score = 0;
        self.best_score = best_score;
        self.run_time_ms = 0.0;
        self.collisions_armed = self.tuning.collision_grace_ms <= 0.0;
        self.next_group = 1;
        log::info!("Run {} started (best {})", self.generation, best_score);
        self.events.push(GameEvent::RunStarted {
            generation: self.generation,
        });
    }

    /// Allocate a spawn group id
    pub fn next_group_id(&mut self) -> u32 {
        let id = self.next_group;
        self.next_group += 1;
        id
    }

    /// Spawn groups currently on screen (one zone per group)
    pub fn live_groups(&self) -> usize {
        self.zones.active_count()
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Per-run RNG; restarts stay deterministic for a given session seed
fn run_rng(seed: u64, generation: u32) -> Pcg32 {
    Pcg32::seed_from_u64(seed ^ (generation as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn arm_timers(tuning: &Tuning, generation: u32) -> Timers {
    Timers {
        spawn_pipes: Timer::repeating(tuning.spawn_interval_ms, generation),
        spawn_cloud: Timer::repeating(tuning.cloud_interval_ms, generation),
        arm_collisions: if tuning.collision_grace_ms > 0.0 {
            Timer::once(tuning.collision_grace_ms, generation)
        } else {
            Timer::disarmed(generation)
        },
        opening_jump: match tuning.opening_jump_ms {
            Some(ms) => Timer::once(ms, generation),
            None => Timer::disarmed(generation),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(7, Tuning::default(), Viewport::default(), 0)
    }

    #[test]
    fn new_run_starts_running_with_player_placed() {
        let s = state();
        assert_eq!(s.phase, GamePhase::Running);
        assert_eq!(s.score, 0);
        assert!(s.player.enabled);
        assert!((s.player.pos.x - 800.0 / 3.0).abs() < 1e-3);
        assert!((s.player.pos.y - 360.0).abs() < 1e-3);
        assert!(!s.collisions_armed);
        assert_eq!(s.events, vec![GameEvent::RunStarted { generation: 0 }]);
    }

    #[test]
    fn obstacle_bounds_face_the_gap() {
        let upper = Obstacle {
            kind: ObstacleKind::Upper,
            pos: Vec2::new(100.0, 200.0),
            size: Vec2::new(80.0, 600.0),
            ..Default::default()
        };
        assert_eq!(upper.bounds().max.y, 200.0);

        let lower = Obstacle {
            kind: ObstacleKind::Lower,
            pos: Vec2::new(100.0, 350.0),
            size: Vec2::new(80.0, 600.0),
            ..Default::default()
        };
        assert_eq!(lower.bounds().min.y, 350.0);
    }

    #[test]
    fn restart_bumps_generation_and_clears_pools() {
        let mut s = state();
        let (_, zone) = s.zones.acquire();
        zone.active = true;
        s.score = 4;
        s.phase = GamePhase::GameOver;

        s.restart(4);
        assert_eq!(s.generation, 1);
        assert_eq!(s.phase, GamePhase::Running);
        assert_eq!(s.score, 0);
        assert_eq!(s.best_score, 4);
        assert_eq!(s.zones.active_count(), 0);
        assert_eq!(s.zones.capacity(), 1);
        assert_eq!(s.timers.spawn_pipes.generation(), 1);
    }

    #[test]
    fn teardown_cancels_timers() {
        let mut s = state();
        s.teardown();
        assert!(!s.timers.any_armed());
        assert!(!s.player.enabled);
    }

    #[test]
    fn clear_world_keeps_the_player() {
        let mut s = state();
        let (_, cloud) = s.clouds.acquire();
        cloud.active = true;
        assert_eq!(s.clear_world(), 1);
        assert_eq!(s.clouds.active_count(), 0);
        assert!(!s.timers.any_armed());
        assert!(s.player.enabled);
    }
}
