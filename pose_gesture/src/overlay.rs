//! Debug annotations burned into the camera preview.

use crate::classifier::{GestureLevels, GestureThresholds, InputMode};
use crate::frame::{rgb, Frame};
use crate::landmark::{PoseObservation, SKELETON};

const JUMP_LINE:   u32 = 0xFF00FF00;  // green
const DUCK_LINE:   u32 = 0xFFFF0000;  // red
const RESET_LINE:  u32 = 0xFFFF00FF;  // magenta
const TEXT_NORMAL: u32 = 0xFFFFFFFF;
const BONE:        u32 = 0xFFE0E0E0;
const JOINT:       u32 = 0xFFFF5050;

/// The most recent camera image plus what was read from it.
#[derive(Clone, Debug)]
pub struct DisplayFrame {
    pub image:    Frame,
    pub levels:   GestureLevels,
    pub mode:     InputMode,
    /// Whether a body was found in this frame.
    pub detected: bool,
    /// Capture-cycle counter, starting at 1.
    pub sequence: u64,
}

/// Draw threshold lines, state caption and skeleton onto `image`.
///
/// `observation` must already be in the same orientation as `image`.
pub fn annotate(
    mut image:   Frame,
    observation: Option<&PoseObservation>,
    levels:      GestureLevels,
    mode:        InputMode,
    thresholds:  &GestureThresholds,
    sequence:    u64,
) -> DisplayFrame {
    let h = image.height() as f32;
    let line_y = |t: f32| (h * t) as isize;

    match mode {
        InputMode::AwaitingReset => {
            image.draw_hline(line_y(thresholds.reset), 2, RESET_LINE);
        }
        InputMode::Normal => {
            image.draw_hline(line_y(thresholds.jump), 2, JUMP_LINE);
            image.draw_hline(line_y(thresholds.duck), 2, DUCK_LINE);
        }
    }

    if let Some(obs) = observation {
        draw_skeleton(&mut image, obs, thresholds.min_confidence);

        let caption_color = if levels.jumping {
            JUMP_LINE
        } else if levels.ducking {
            DUCK_LINE
        } else {
            TEXT_NORMAL
        };
        image.draw_text(levels.label(), 6, 6, 3, caption_color);

        if levels.hand_raised {
            image.draw_text("HAND RAISED - RESET", 6, 30, 2, RESET_LINE);
        }
    } else {
        image.draw_text("NO BODY", 6, 6, 3, rgb(160, 160, 160));
    }

    DisplayFrame {
        image,
        levels,
        mode,
        detected: observation.is_some(),
        sequence,
    }
}

fn draw_skeleton(image: &mut Frame, obs: &PoseObservation, min_confidence: f32) {
    let w = image.width() as f32;
    let h = image.height() as f32;
    let px = |x: f32, y: f32| ((x * w) as isize, (y * h) as isize);

    for (a, b) in SKELETON {
        if let (Some(la), Some(lb)) = (obs.confident(a, min_confidence), obs.confident(b, min_confidence)) {
            image.draw_line(px(la.x, la.y), px(lb.x, lb.y), 2, BONE);
        }
    }
    for (_, l) in obs.iter().filter(|(_, l)| l.confidence >= min_confidence) {
        let (x, y) = px(l.x, l.y);
        image.fill_disc(x, y, 3, JOINT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::LandmarkName;

    fn blank() -> Frame { Frame::new(100, 100, 0xFF000000) }

    #[test]
    fn normal_mode_draws_jump_and_duck_lines() {
        let t = GestureThresholds::default();
        let d = annotate(blank(), None, GestureLevels::default(), InputMode::Normal, &t, 1);
        assert_eq!(d.image.pixel(50, 40), Some(JUMP_LINE));
        assert_eq!(d.image.pixel(50, 70), Some(DUCK_LINE));
        assert_eq!(d.image.pixel(50, 30), Some(0xFF000000));
        assert!(!d.detected);
    }

    #[test]
    fn reset_mode_draws_only_reset_line() {
        let t = GestureThresholds::default();
        let d = annotate(blank(), None, GestureLevels::default(), InputMode::AwaitingReset, &t, 1);
        assert_eq!(d.image.pixel(50, 30), Some(RESET_LINE));
        assert_eq!(d.image.pixel(50, 40), Some(0xFF000000));
    }

    #[test]
    fn skeleton_joints_are_drawn() {
        let t = GestureThresholds::default();
        let obs = PoseObservation::new()
            .with(LandmarkName::LeftHip, 0.5, 0.9)
            .with(LandmarkName::RightHip, 0.9, 0.9);
        let d = annotate(blank(), Some(&obs), GestureLevels::default(), InputMode::Normal, &t, 7);
        assert_eq!(d.image.pixel(50, 90), Some(JOINT));
        // bone between the hips
        assert_eq!(d.image.pixel(70, 90), Some(BONE));
        assert!(d.detected);
        assert_eq!(d.sequence, 7);
    }
}
