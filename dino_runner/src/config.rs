//! Game configuration, loaded from TOML.
//!
//! Every section and field has a default, so an empty file (or none at all)
//! gives the stock game.

use std::path::Path;

use pose_gesture::{CaptureConfig, GestureError};
use serde::Deserialize;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// RunnerError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error(transparent)]
    Gesture(#[from] GestureError),

    #[error("window error: {0}")]
    Window(String),
}

// ════════════════════════════════════════════════════════════════════════════
// Sections
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width:  usize,
    pub height: usize,
    pub fps:    u32,
    pub title:  String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width:  1100,
            height: 600,
            fps:    60,
            title:  "Dino Jumper".to_string(),
        }
    }
}

/// Per-tick physics, in pixels.  Negative velocity is upward.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity:           f32,
    pub jump_velocity:     f32,
    /// Releasing the jump pose while rising faster than this clamps the
    /// velocity to it, cutting the jump short.
    pub min_jump_velocity: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig { gravity: 0.6, jump_velocity: -13.0, min_jump_velocity: -4.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedConfig {
    pub start:        f32,
    pub max:          f32,
    pub acceleration: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig { start: 6.0, max: 13.0, acceleration: 0.001 }
    }
}

/// Screen placement.  The offsets are visual corrections for the sprite art.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub avatar_x:             f32,
    pub ground_y:             f32,
    pub sprite_offset:        f32,
    pub duck_ground_offset:   f32,
    pub tall_obstacle_offset: f32,
    pub spawn_x:              f32,
    /// Obstacles whose right edge is left of this are evicted.
    pub despawn_right:        f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            avatar_x:             50.0,
            ground_y:             380.0,
            sprite_offset:        15.0,
            duck_ground_offset:   5.0,
            tall_obstacle_offset: 5.0,
            spawn_x:              1150.0,
            despawn_right:        -100.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Points per tick at the starting speed.
    pub per_tick: f32,
}

impl Default for ScoreConfig {
    fn default() -> Self { ScoreConfig { per_tick: 0.15 } }
}

/// Score distance between palette flips, drawn uniformly from the range.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DayNightConfig {
    pub min_distance: u32,
    pub max_distance: u32,
}

impl Default for DayNightConfig {
    fn default() -> Self { DayNightConfig { min_distance: 400, max_distance: 600 } }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub index: i32,
    pub model: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        CameraConfig {
            index: 0,
            model: "models/movenet_singlepose_lightning.onnx".to_string(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GameConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window:    WindowConfig,
    pub physics:   PhysicsConfig,
    pub speed:     SpeedConfig,
    pub layout:    LayoutConfig,
    pub score:     ScoreConfig,
    pub day_night: DayNightConfig,
    pub capture:   CaptureConfig,
    pub camera:    CameraConfig,
    /// Fixed RNG seed for reproducible obstacle sequences.
    pub seed:      Option<u64>,
}

impl GameConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RunnerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, RunnerError> {
        let cfg: GameConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), RunnerError> {
        self.capture.thresholds.validate()?;

        let invalid = |msg: &str| Err(RunnerError::Invalid(msg.to_string()));
        if self.window.width == 0 || self.window.height == 0 {
            return invalid("window size must be non-zero");
        }
        if self.window.fps == 0 {
            return invalid("window.fps must be positive");
        }
        if !(self.speed.start > 0.0 && self.speed.start <= self.speed.max) {
            return invalid("speed.start must be positive and no greater than speed.max");
        }
        if self.speed.acceleration < 0.0 {
            return invalid("speed.acceleration must not be negative");
        }
        if self.physics.gravity <= 0.0 {
            return invalid("physics.gravity must be positive");
        }
        if self.day_night.min_distance == 0 || self.day_night.min_distance > self.day_night.max_distance {
            return invalid("day_night distances must satisfy 0 < min <= max");
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = GameConfig::from_toml("").unwrap();
        assert_eq!(cfg, GameConfig::default());
        assert_eq!(cfg.window.title, "Dino Jumper");
        assert_eq!(cfg.speed.start, 6.0);
        assert_eq!(cfg.capture.thresholds.duck, 0.7);
        assert!(cfg.seed.is_none());
    }

    #[test]
    fn sample_file_matches_defaults() {
        let cfg = GameConfig::from_toml(include_str!("../dino_runner.toml")).unwrap();
        assert_eq!(cfg, GameConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = GameConfig::from_toml(
            r#"
            seed = 42

            [speed]
            max = 20.0

            [capture.thresholds]
            jump = 0.35
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.speed.max, 20.0);
        assert_eq!(cfg.speed.start, 6.0);
        assert_eq!(cfg.capture.thresholds.jump, 0.35);
        assert_eq!(cfg.capture.thresholds.reset, 0.3);
        assert!(cfg.capture.mirror);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let r = GameConfig::from_toml("[capture.thresholds]\njump = 0.8\nduck = 0.6\n");
        assert!(matches!(r, Err(RunnerError::Gesture(GestureError::ThresholdOrder { .. }))));
    }

    #[test]
    fn bad_speed_is_rejected() {
        let r = GameConfig::from_toml("[speed]\nstart = 15.0\nmax = 13.0\n");
        assert!(matches!(r, Err(RunnerError::Invalid(_))));
    }

    #[test]
    fn syntax_error_is_a_parse_error() {
        assert!(matches!(GameConfig::from_toml("[window"), Err(RunnerError::Parse(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let r = GameConfig::load("/nonexistent/dino_runner.toml");
        assert!(matches!(r, Err(RunnerError::Io { .. })));
    }
}
