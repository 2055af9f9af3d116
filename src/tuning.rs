//! Game balance constants
//!
//! Every gameplay number lives here so a run can be reproduced from
//! `(seed, tuning, viewport, inputs)`. Tuning is static for a run: there is
//! no difficulty progression.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON could not be parsed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Vertical velocity set by a jump (px/s, negative = up)
    pub jump_impulse: f32,
    /// Rotation applied on jump (degrees, negative = nose up)
    pub flap_angle: f32,
    /// Maximum nose-down rotation (degrees)
    pub dive_angle: f32,
    /// Rotation rate scale (degrees/s at velocity == gravity)
    pub angular_velocity: f32,
    /// Start position as a fraction of the viewport
    pub player_start_x: f32,
    pub player_start_y: f32,
    /// Drawn size; the ceiling clamp uses this
    pub player_display_size: f32,
    /// Collision box size (smaller than the sprite)
    pub player_hitbox_size: f32,

    // === Obstacles ===
    pub pipe_width: f32,
    /// Vertical opening between upper and lower obstacle
    pub gap_size: f32,
    /// Gap center is kept this many gap sizes away from either edge
    pub gap_margin: f32,
    pub spawn_interval_ms: f32,
    /// Horizontal scroll velocity (px/s, negative = leftward)
    pub scroll_speed: f32,
    pub score_zone_width: f32,

    // === Run start ===
    /// Physics time before collisions and scoring are armed
    pub collision_grace_ms: f32,
    /// Automatic first jump; `None` disables it
    pub opening_jump_ms: Option<f32>,

    // === Ambience ===
    pub cloud_interval_ms: f32,
    pub cloud_speed: f32,
    pub cloud_width: f32,
    /// Clouds spawn in the top fraction of the viewport
    pub cloud_band: f32,

    // === Frame driver ===
    /// Longest frame delta accepted from the host
    pub max_frame_delta_ms: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 800.0,
            jump_impulse: -300.0,
            flap_angle: -20.0,
            dive_angle: 90.0,
            angular_velocity: 200.0,
            player_start_x: 1.0 / 3.0,
            player_start_y: 0.6,
            player_display_size: 40.0,
            player_hitbox_size: 30.0,

            pipe_width: 80.0,
            gap_size: 150.0,
            gap_margin: 0.7,
            spawn_interval_ms: 1500.0,
            scroll_speed: -150.0,
            score_zone_width: 5.0,

            collision_grace_ms: 100.0,
            opening_jump_ms: Some(200.0),

            cloud_interval_ms: 3000.0,
            cloud_speed: -40.0,
            cloud_width: 120.0,
            cloud_band: 0.4,

            max_frame_delta_ms: 100.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every field the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("gravity", self.gravity),
            ("angular_velocity", self.angular_velocity),
            ("player_display_size", self.player_display_size),
            ("player_hitbox_size", self.player_hitbox_size),
            ("pipe_width", self.pipe_width),
            ("gap_size", self.gap_size),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("score_zone_width", self.score_zone_width),
            ("cloud_interval_ms", self.cloud_interval_ms),
            ("cloud_width", self.cloud_width),
            ("max_frame_delta_ms", self.max_frame_delta_ms),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a positive number",
                });
            }
        }

        if !self.jump_impulse.is_finite() || self.jump_impulse >= 0.0 {
            return Err(TuningError::Invalid {
                field: "jump_impulse",
                reason: "must be negative (upward)",
            });
        }
        if !self.scroll_speed.is_finite() || self.scroll_speed >= 0.0 {
            return Err(TuningError::Invalid {
                field: "scroll_speed",
                reason: "must be negative (leftward)",
            });
        }
        if !self.cloud_speed.is_finite() || self.cloud_speed >= 0.0 {
            return Err(TuningError::Invalid {
                field: "cloud_speed",
                reason: "must be negative (leftward)",
            });
        }
        if !(self.flap_angle.is_finite() && self.dive_angle.is_finite())
            || self.flap_angle >= self.dive_angle
        {
            return Err(TuningError::Invalid {
                field: "flap_angle",
                reason: "must be below dive_angle",
            });
        }
        for (field, value) in [
            ("player_start_x", self.player_start_x),
            ("player_start_y", self.player_start_y),
            ("cloud_band", self.cloud_band),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be a fraction in [0, 1]",
                });
            }
        }
        if !(0.5..=5.0).contains(&self.gap_margin) {
            return Err(TuningError::Invalid {
                field: "gap_margin",
                reason: "must keep the gap inside the viewport (0.5..=5)",
            });
        }
        if !self.collision_grace_ms.is_finite() || self.collision_grace_ms < 0.0 {
            return Err(TuningError::Invalid {
                field: "collision_grace_ms",
                reason: "must be zero or positive",
            });
        }
        if self
            .opening_jump_ms
            .is_some_and(|ms| !ms.is_finite() || ms < 0.0)
        {
            return Err(TuningError::Invalid {
                field: "opening_jump_ms",
                reason: "must be zero or positive",
            });
        }
        Ok(())
    }

    /// Return a copy that is safe to simulate with, falling back to defaults
    pub fn sanitized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Horizontal distance between consecutive spawns (px)
    pub fn spawn_spacing(&self) -> f32 {
        crate::ms_to_secs(self.spawn_interval_ms) * self.scroll_speed.abs()
    }

    /// Obstacles and zones left of this x are recycled
    pub fn recycle_threshold(&self) -> f32 {
        -(self.pipe_width + self.score_zone_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let tuning = Tuning::from_json(r#"{ "gravity": 700.0, "jump_impulse": -320.0 }"#).unwrap();
        assert_eq!(tuning.gravity, 700.0);
        assert_eq!(tuning.jump_impulse, -320.0);
        assert_eq!(tuning.gap_size, Tuning::default().gap_size);
    }

    #[test]
    fn rejects_upward_gravity_sign_errors() {
        let err = Tuning::from_json(r#"{ "jump_impulse": 300.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "jump_impulse",
                ..
            }
        ));

        let err = Tuning::from_json(r#"{ "scroll_speed": 150.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::Invalid {
                field: "scroll_speed",
                ..
            }
        ));
    }

    #[test]
    fn rejects_garbage_json() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn sanitized_falls_back_to_defaults() {
        let broken = Tuning {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert_eq!(broken.sanitized(), Tuning::default());
    }

    #[test]
    fn recycle_threshold_clears_pipe_and_zone() {
        let tuning = Tuning::default();
        assert_eq!(tuning.recycle_threshold(), -85.0);
        assert!((tuning.spawn_spacing() - 225.0).abs() < 1e-3);
    }
}
