//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering, storage or platform dependencies beyond the injected ledger

pub mod collision;
pub mod motion;
pub mod pool;
pub mod rect;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod timer;
pub mod view;

pub use collision::{Contact, end_run, overlapping_pairs};
pub use pool::{EntityId, EntityPool, Poolable};
pub use rect::Rect;
pub use spawner::{max_live_groups, spawn_cloud, spawn_pipe_row, spawn_pipe_row_at};
pub use state::{
    Cloud, CrashCause, GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Player,
    SceneTransition, ScoringZone,
};
pub use tick::{TickInput, tick};
pub use timer::{Timer, TimerKind, TimerState, Timers};
pub use view::{FrameView, snapshot};
