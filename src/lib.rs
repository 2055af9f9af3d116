//! Shoppy Bird - an endless side-scrolling obstacle runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, spawning, collisions, game phases)
//! - `highscores`: Best-score ledger over an injected key-value store
//! - `persistence`: Key-value storage capability (memory, file, LocalStorage)
//! - `platform`: Logging, viewport and frame timing helpers
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::{Performance, ScoreLedger};
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use platform::{FixedStepper, FrameClock, Viewport};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Viewport used when the host reports nothing usable
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;

    /// Persistence key for the best score
    pub const BEST_SCORE_KEY: &str = "shoppyBirdHighScore";
}

/// Convert milliseconds to seconds
#[inline]
pub fn ms_to_secs(ms: f32) -> f32 {
    ms / 1000.0
}

/// Convert seconds to milliseconds
#[inline]
pub fn secs_to_ms(secs: f32) -> f32 {
    secs * 1000.0
}
