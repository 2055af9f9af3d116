//! Read-only frame snapshot for the presentation layer
//!
//! The renderer never touches `GameState` directly; it draws whatever the
//! latest `FrameView` says.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{GamePhase, GameState, ObstacleKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSprite {
    pub pos: Vec2,
    /// Degrees, negative = nose up
    pub rotation: f32,
    pub size: f32,
    pub tinted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSprite {
    pub kind: ObstacleKind,
    pub bounds: Rect,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSprite {
    pub pos: Vec2,
    pub scale: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub player: PlayerSprite,
    pub obstacles: Vec<ObstacleSprite>,
    pub clouds: Vec<CloudSprite>,
    pub score_text: String,
    pub best_text: String,
    pub pause_indicator_visible: bool,
    pub pause_button_label: &'static str,
}

/// Build the view for the current state
pub fn snapshot(state: &GameState) -> FrameView {
    FrameView {
        phase: state.phase,
        player: PlayerSprite {
            pos: state.player.pos,
            rotation: state.player.rotation,
            size: state.player.display_size,
            tinted: state.player.tinted,
        },
        obstacles: state
            .obstacles
            .iter_active()
            .map(|(_, o)| ObstacleSprite {
                kind: o.kind,
                bounds: o.bounds(),
                visible: o.visible,
            })
            .collect(),
        clouds: state
            .clouds
            .iter_active()
            .map(|(_, c)| CloudSprite {
                pos: c.pos,
                scale: c.scale,
            })
            .collect(),
        score_text: format!("Score: {}", state.score),
        best_text: format!("Best: {}", state.best_score),
        pause_indicator_visible: state.pause_indicator,
        pause_button_label: if state.pause_indicator {
            "Resume"
        } else {
            "Pause"
        },
    }
}
