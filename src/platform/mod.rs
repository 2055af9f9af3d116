//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging backends
//! - Viewport dimensions reported by the host
//! - Frame timing (host deltas to fixed simulation steps)

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH, MAX_SUBSTEPS, SIM_DT};

/// Install the logger for this target
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Install the logger for this target
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Playfield size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    /// Build from host-reported dimensions; unusable values fall back to 800x600
    pub fn from_reported(width: Option<f64>, height: Option<f64>) -> Self {
        let usable = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0).map(|v| v as f32);
        match (usable(width), usable(height)) {
            (Some(width), Some(height)) => Self { width, height },
            _ => {
                log::warn!(
                    "Viewport {:?}x{:?} unusable, using {}x{}",
                    width,
                    height,
                    DEFAULT_VIEWPORT_WIDTH,
                    DEFAULT_VIEWPORT_HEIGHT
                );
                Self::default()
            }
        }
    }
}

/// Converts host frame callbacks into sanitized deltas
#[derive(Debug, Clone)]
pub struct FrameClock {
    last_elapsed_ms: Option<f64>,
    max_delta_ms: f32,
}

impl FrameClock {
    pub fn new(max_delta_ms: f32) -> Self {
        Self {
            last_elapsed_ms: None,
            max_delta_ms,
        }
    }

    /// Accept `(elapsed_ms, delta_ms)` from the host and return seconds to simulate.
    ///
    /// The host delta wins when it is sane; otherwise the difference between
    /// successive elapsed values is used. Negative or non-finite values give 0.
    pub fn frame(&mut self, elapsed_ms: f64, delta_ms: f64) -> f32 {
        let from_elapsed = self
            .last_elapsed_ms
            .map(|last| elapsed_ms - last)
            .unwrap_or(0.0);
        if elapsed_ms.is_finite() {
            self.last_elapsed_ms = Some(elapsed_ms);
        }

        let delta = if delta_ms.is_finite() && delta_ms >= 0.0 {
            delta_ms
        } else {
            from_elapsed
        };
        if !delta.is_finite() || delta <= 0.0 {
            return 0.0;
        }
        crate::ms_to_secs((delta as f32).min(self.max_delta_ms))
    }

    /// Forget the previous frame (after a long suspension)
    pub fn reset(&mut self) {
        self.last_elapsed_ms = None;
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
}

impl FixedStepper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add frame time and call `step(SIM_DT)` for each whole step, capped at
    /// `MAX_SUBSTEPS`. Returns the number of steps run.
    pub fn advance(&mut self, dt: f32, mut step: impl FnMut(f32)) -> u32 {
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop the backlog rather than spiral
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Leftover time as a fraction of a step (for render interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / SIM_DT).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_fallback() {
        assert_eq!(Viewport::from_reported(None, None), Viewport::default());
        assert_eq!(
            Viewport::from_reported(Some(0.0), Some(600.0)),
            Viewport::default()
        );
        assert_eq!(
            Viewport::from_reported(Some(-10.0), Some(-10.0)),
            Viewport::default()
        );
        assert_eq!(
            Viewport::from_reported(Some(f64::NAN), Some(480.0)),
            Viewport::default()
        );
        let vp = Viewport::from_reported(Some(1024.0), Some(768.0));
        assert_eq!(vp.width, 1024.0);
        assert_eq!(vp.height, 768.0);
    }

    #[test]
    fn frame_clock_sanitizes() {
        let mut clock = FrameClock::new(100.0);
        assert!((clock.frame(0.0, 16.0) - 0.016).abs() < 1e-6);
        assert!((clock.frame(16.0, -5.0) - 0.016).abs() < 1e-6);
        assert_eq!(clock.frame(16.0, f64::NAN), 0.0);
        // Long stalls are clamped
        assert!((clock.frame(5000.0, 4984.0) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn stepper_runs_whole_steps() {
        let mut stepper = FixedStepper::new();
        let mut steps = 0;
        stepper.advance(SIM_DT * 2.5, |_| steps += 1);
        assert_eq!(steps, 2);
        assert!((stepper.alpha() - 0.5).abs() < 1e-3);

        stepper.advance(SIM_DT * 0.6, |_| steps += 1);
        assert_eq!(steps, 3);
    }

    #[test]
    fn stepper_caps_substeps() {
        let mut stepper = FixedStepper::new();
        let ran = stepper.advance(1.0, |_| {});
        assert_eq!(ran, MAX_SUBSTEPS);
        assert!(stepper.alpha() <= 1.0);
    }
}
