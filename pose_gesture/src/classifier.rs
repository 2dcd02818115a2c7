//! Pose → gesture levels.
//!
//! Pure and stateless: one observation in, three booleans out.  Rising-edge
//! triggers are derived later by [`crate::trigger::EdgeTrigger`].

use serde::Deserialize;

use crate::error::GestureError;
use crate::landmark::{LandmarkName, PoseObservation};

// ════════════════════════════════════════════════════════════════════════════
// GestureThresholds
// ════════════════════════════════════════════════════════════════════════════

/// Normalized-Y cut lines.  Y grows downwards, so "above the line" means a
/// *smaller* value.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GestureThresholds {
    /// Nose above this line = jumping.
    pub jump:           f32,
    /// Nose below this line = ducking.
    pub duck:           f32,
    /// A wrist above this line = hand raised (reset gesture).
    pub reset:          f32,
    /// Landmarks scored below this are treated as missing.
    pub min_confidence: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        GestureThresholds {
            jump:           0.4,
            duck:           0.7,
            reset:          0.3,
            min_confidence: 0.3,
        }
    }
}

impl GestureThresholds {
    /// Every line must be inside the image and the jump band must sit
    /// above the duck band.
    pub fn validate(&self) -> Result<(), GestureError> {
        for (name, value) in [
            ("jump", self.jump),
            ("duck", self.duck),
            ("reset", self.reset),
            ("min_confidence", self.min_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GestureError::ThresholdOutOfRange { name, value });
            }
        }
        if self.jump >= self.duck {
            return Err(GestureError::ThresholdOrder { jump: self.jump, duck: self.duck });
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// InputMode / GestureLevels
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Playing: jump / duck drive the avatar.
    #[default]
    Normal,
    /// Game over: a raised hand restarts the run.
    AwaitingReset,
}

/// Instantaneous gesture state for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GestureLevels {
    pub jumping:     bool,
    pub ducking:     bool,
    pub hand_raised: bool,
}

impl GestureLevels {
    pub fn is_neutral(&self) -> bool { !self.jumping && !self.ducking }

    /// Overlay caption for the body state.
    pub fn label(&self) -> &'static str {
        if self.jumping {
            "JUMPING"
        } else if self.ducking {
            "DUCKING"
        } else {
            "NEUTRAL"
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// classify
// ════════════════════════════════════════════════════════════════════════════

/// Classify one observation.
///
/// No observation, or a missing nose / wrist, simply reads as `false`.
/// Jump and duck are exclusive because `jump < duck`; hand-raise is only
/// evaluated while awaiting a reset.
pub fn classify(
    observation: Option<&PoseObservation>,
    thresholds:  &GestureThresholds,
    mode:        InputMode,
) -> GestureLevels {
    let Some(obs) = observation else {
        return GestureLevels::default();
    };
    let min = thresholds.min_confidence;

    let mut levels = GestureLevels::default();

    if let Some(nose) = obs.confident(LandmarkName::Nose, min) {
        if nose.y < thresholds.jump {
            levels.jumping = true;
        } else if nose.y > thresholds.duck {
            levels.ducking = true;
        }
    }

    if mode == InputMode::AwaitingReset {
        let above = |name| {
            obs.confident(name, min)
                .map_or(false, |w| w.y < thresholds.reset)
        };
        levels.hand_raised = above(LandmarkName::LeftWrist) || above(LandmarkName::RightWrist);
    }

    levels
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::Landmark;

    fn nose_at(y: f32) -> PoseObservation {
        PoseObservation::new().with(LandmarkName::Nose, 0.5, y)
    }

    fn run(obs: &PoseObservation, mode: InputMode) -> GestureLevels {
        classify(Some(obs), &GestureThresholds::default(), mode)
    }

    #[test]
    fn defaults_are_valid() {
        assert!(GestureThresholds::default().validate().is_ok());
    }

    #[test]
    fn nose_above_jump_line_is_jumping() {
        let l = run(&nose_at(0.35), InputMode::Normal);
        assert!(l.jumping);
        assert!(!l.ducking);
    }

    #[test]
    fn nose_below_duck_line_is_ducking() {
        let l = run(&nose_at(0.75), InputMode::Normal);
        assert!(!l.jumping);
        assert!(l.ducking);
    }

    #[test]
    fn nose_between_lines_is_neutral() {
        let l = run(&nose_at(0.55), InputMode::Normal);
        assert!(l.is_neutral());
        assert_eq!(l.label(), "NEUTRAL");
    }

    #[test]
    fn lines_themselves_are_neutral() {
        assert!(run(&nose_at(0.4), InputMode::Normal).is_neutral());
        assert!(run(&nose_at(0.7), InputMode::Normal).is_neutral());
    }

    #[test]
    fn no_observation_is_neutral() {
        let l = classify(None, &GestureThresholds::default(), InputMode::AwaitingReset);
        assert_eq!(l, GestureLevels::default());
    }

    #[test]
    fn missing_nose_is_neutral() {
        let obs = PoseObservation::new().with(LandmarkName::LeftWrist, 0.5, 0.1);
        assert!(run(&obs, InputMode::Normal).is_neutral());
    }

    #[test]
    fn hand_raise_ignored_in_normal_mode() {
        let obs = nose_at(0.55)
            .with(LandmarkName::LeftWrist, 0.3, 0.1)
            .with(LandmarkName::RightWrist, 0.7, 0.1);
        assert!(!run(&obs, InputMode::Normal).hand_raised);
    }

    #[test]
    fn left_wrist_raises_hand_when_awaiting_reset() {
        let obs = nose_at(0.55)
            .with(LandmarkName::LeftWrist, 0.3, 0.2)
            .with(LandmarkName::RightWrist, 0.7, 0.8);
        assert!(run(&obs, InputMode::AwaitingReset).hand_raised);
    }

    #[test]
    fn right_wrist_alone_is_enough() {
        let obs = nose_at(0.55).with(LandmarkName::RightWrist, 0.7, 0.05);
        assert!(run(&obs, InputMode::AwaitingReset).hand_raised);
    }

    #[test]
    fn awaiting_reset_still_reports_body_state() {
        let obs = nose_at(0.2).with(LandmarkName::LeftWrist, 0.3, 0.6);
        let l = run(&obs, InputMode::AwaitingReset);
        assert!(l.jumping);
        assert!(!l.hand_raised);
    }

    #[test]
    fn low_confidence_nose_is_ignored() {
        let mut obs = PoseObservation::new();
        obs.set(LandmarkName::Nose, Landmark { x: 0.5, y: 0.1, confidence: 0.05 });
        assert!(run(&obs, InputMode::Normal).is_neutral());
    }

    #[test]
    fn inverted_bands_are_rejected() {
        let t = GestureThresholds { jump: 0.7, duck: 0.4, ..Default::default() };
        assert!(matches!(t.validate(), Err(GestureError::ThresholdOrder { .. })));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let t = GestureThresholds { reset: 1.5, ..Default::default() };
        assert!(matches!(
            t.validate(),
            Err(GestureError::ThresholdOutOfRange { name: "reset", .. })
        ));
    }
}
