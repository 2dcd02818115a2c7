//! Keyboard simulation of a camera and a body (always available).
//!
//! The game window forwards key presses as [`SimInput`] over a channel;
//! [`SimPoseEstimator`] turns the held keys into a plausible 17-point body
//! so the whole capture → classify → trigger path runs exactly as it does
//! with real hardware.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use crate::device::{Camera, PoseEstimator};
use crate::error::CaptureError;
use crate::frame::{blend, Frame};
use crate::landmark::{Landmark, LandmarkName, PoseObservation};

// ════════════════════════════════════════════════════════════════════════════
// SimInput
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the game window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimInput {
    KeyDown(SimKey),
    KeyUp(SimKey),
}

/// Simulated body movements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimKey {
    /// Stretch up so the head crosses the jump line.    (Up / Space)
    LeanUp,
    /// Crouch so the head drops below the duck line.    (Down)
    Crouch,
    /// Raise the left hand above the head.              (H)
    RaiseHand,
    /// Toggle leaving the camera's field of view.       (P)
    StepAway,
}

// ════════════════════════════════════════════════════════════════════════════
// SimCamera
// ════════════════════════════════════════════════════════════════════════════

const BACKDROP: u32 = 0xFF202838;
const FLOOR:    u32 = 0xFF4A4A58;

/// Synthetic camera producing an empty room at a steady frame rate.
pub struct SimCamera {
    width:    usize,
    height:   usize,
    interval: Duration,
    last:     Option<Instant>,
}

impl SimCamera {
    pub fn new(width: usize, height: usize, fps: u32) -> Self {
        SimCamera {
            width,
            height,
            interval: Duration::from_secs(1) / fps.max(1),
            last:     None,
        }
    }

    fn backdrop(&self) -> Frame {
        let mut f = Frame::new(self.width, self.height, BACKDROP);
        let floor_top = self.height * 3 / 4;
        for row in floor_top..self.height {
            let t = (row - floor_top) as f32 / (self.height - floor_top).max(1) as f32;
            f.fill_rect(0, row as isize, self.width, 1, blend(BACKDROP, FLOOR, t));
        }
        f
    }
}

impl Default for SimCamera {
    fn default() -> Self { SimCamera::new(320, 240, 30) }
}

impl Camera for SimCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        // Pace like a real device.
        if let Some(last) = self.last {
            if let Some(wait) = self.interval.checked_sub(last.elapsed()) {
                thread::sleep(wait);
            }
        }
        self.last = Some(Instant::now());
        Ok(self.backdrop())
    }

    fn describe(&self) -> String {
        format!("simulated camera {}x{}", self.width, self.height)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimPoseEstimator
// ════════════════════════════════════════════════════════════════════════════

const STANDING_NOSE_Y: f32 = 0.55;
const LEANING_NOSE_Y:  f32 = 0.30;
const CROUCHED_NOSE_Y: f32 = 0.80;

/// Estimator that ignores the image and reports the keyboard-driven body.
pub struct SimPoseEstimator {
    rx:        Receiver<SimInput>,
    // Held-key counts; several keys may drive one movement.
    lean_up:   u32,
    crouch:    u32,
    hand_up:   u32,
    away:      bool,
    connected: bool,
}

impl SimPoseEstimator {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimPoseEstimator {
            rx,
            lean_up:   0,
            crouch:    0,
            hand_up:   0,
            away:      false,
            connected: true,
        }
    }

    fn drain(&mut self) {
        if !self.connected { return; }
        loop {
            match self.rx.try_recv() {
                Ok(SimInput::KeyDown(SimKey::LeanUp))    => self.lean_up += 1,
                Ok(SimInput::KeyUp(SimKey::LeanUp))      => self.lean_up = self.lean_up.saturating_sub(1),
                Ok(SimInput::KeyDown(SimKey::Crouch))    => self.crouch += 1,
                Ok(SimInput::KeyUp(SimKey::Crouch))      => self.crouch = self.crouch.saturating_sub(1),
                Ok(SimInput::KeyDown(SimKey::RaiseHand)) => self.hand_up += 1,
                Ok(SimInput::KeyUp(SimKey::RaiseHand))   => self.hand_up = self.hand_up.saturating_sub(1),
                Ok(SimInput::KeyDown(SimKey::StepAway))  => self.away = !self.away,
                Ok(SimInput::KeyUp(SimKey::StepAway))    => {}
                Err(TryRecvError::Empty)                 => break,
                Err(TryRecvError::Disconnected)          => {
                    self.connected = false;
                    break;
                }
            }
        }
    }

    fn nose_y(&self) -> f32 {
        if self.lean_up > 0 {
            LEANING_NOSE_Y
        } else if self.crouch > 0 {
            CROUCHED_NOSE_Y
        } else {
            STANDING_NOSE_Y
        }
    }

    /// A front-facing body hanging from the nose position.
    fn body(&self) -> PoseObservation {
        use LandmarkName::*;

        let n = self.nose_y();
        // Crouching folds the legs; hips stay roughly where they are.
        let leg = if self.crouch > 0 { 0.06 } else { 0.14 };
        let y = |v: f32| v.clamp(0.01, 0.99);

        let mut obs = PoseObservation::new();
        let mut put = |name, x: f32, v: f32| {
            obs.set(name, Landmark { x, y: y(v), confidence: 0.9 });
        };

        put(Nose,          0.50, n);
        put(LeftEye,       0.48, n - 0.03);
        put(RightEye,      0.52, n - 0.03);
        put(LeftEar,       0.46, n - 0.02);
        put(RightEar,      0.54, n - 0.02);
        put(LeftShoulder,  0.42, n + 0.12);
        put(RightShoulder, 0.58, n + 0.12);
        put(RightElbow,    0.64, n + 0.24);
        put(RightWrist,    0.66, n + 0.34);
        if self.hand_up > 0 {
            put(LeftElbow, 0.38, n - 0.10);
            put(LeftWrist, 0.36, n - 0.30);
        } else {
            put(LeftElbow, 0.36, n + 0.24);
            put(LeftWrist, 0.34, n + 0.34);
        }
        put(LeftHip,       0.45, n + 0.38);
        put(RightHip,      0.55, n + 0.38);
        put(LeftKnee,      0.44, n + 0.38 + leg);
        put(RightKnee,     0.56, n + 0.38 + leg);
        put(LeftAnkle,     0.44, n + 0.38 + 2.0 * leg);
        put(RightAnkle,    0.56, n + 0.38 + 2.0 * leg);
        obs
    }
}

impl PoseEstimator for SimPoseEstimator {
    fn estimate(&mut self, _frame: &Frame) -> Result<Option<PoseObservation>, CaptureError> {
        self.drain();
        if self.away {
            return Ok(None);
        }
        Ok(Some(self.body()))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, GestureThresholds, InputMode};
    use std::sync::mpsc;

    fn rig() -> (mpsc::Sender<SimInput>, SimPoseEstimator, Frame) {
        let (tx, rx) = mpsc::channel();
        (tx, SimPoseEstimator::new(rx), Frame::new(1, 1, 0))
    }

    fn levels(est: &mut SimPoseEstimator, frame: &Frame, mode: InputMode) -> crate::classifier::GestureLevels {
        let obs = est.estimate(frame).unwrap();
        classify(obs.as_ref(), &GestureThresholds::default(), mode)
    }

    #[test]
    fn standing_is_neutral() {
        let (_tx, mut est, f) = rig();
        assert!(levels(&mut est, &f, InputMode::Normal).is_neutral());
    }

    #[test]
    fn lean_up_jumps_until_released() {
        let (tx, mut est, f) = rig();
        tx.send(SimInput::KeyDown(SimKey::LeanUp)).unwrap();
        assert!(levels(&mut est, &f, InputMode::Normal).jumping);
        tx.send(SimInput::KeyUp(SimKey::LeanUp)).unwrap();
        assert!(levels(&mut est, &f, InputMode::Normal).is_neutral());
    }

    #[test]
    fn lean_holds_while_any_bound_key_is_down() {
        let (tx, mut est, f) = rig();
        // Up and Space both lean.
        tx.send(SimInput::KeyDown(SimKey::LeanUp)).unwrap();
        tx.send(SimInput::KeyDown(SimKey::LeanUp)).unwrap();
        tx.send(SimInput::KeyUp(SimKey::LeanUp)).unwrap();
        assert!(levels(&mut est, &f, InputMode::Normal).jumping);
        tx.send(SimInput::KeyUp(SimKey::LeanUp)).unwrap();
        assert!(levels(&mut est, &f, InputMode::Normal).is_neutral());
        // A stray release never goes negative.
        tx.send(SimInput::KeyUp(SimKey::LeanUp)).unwrap();
        tx.send(SimInput::KeyDown(SimKey::LeanUp)).unwrap();
        assert!(levels(&mut est, &f, InputMode::Normal).jumping);
    }

    #[test]
    fn crouch_ducks() {
        let (tx, mut est, f) = rig();
        tx.send(SimInput::KeyDown(SimKey::Crouch)).unwrap();
        assert!(levels(&mut est, &f, InputMode::Normal).ducking);
    }

    #[test]
    fn raised_hand_crosses_reset_line() {
        let (tx, mut est, f) = rig();
        tx.send(SimInput::KeyDown(SimKey::RaiseHand)).unwrap();
        assert!(levels(&mut est, &f, InputMode::AwaitingReset).hand_raised);
    }

    #[test]
    fn step_away_toggles_detection() {
        let (tx, mut est, f) = rig();
        tx.send(SimInput::KeyDown(SimKey::StepAway)).unwrap();
        assert!(est.estimate(&f).unwrap().is_none());
        tx.send(SimInput::KeyDown(SimKey::StepAway)).unwrap();
        assert!(est.estimate(&f).unwrap().is_some());
    }

    #[test]
    fn closed_channel_keeps_last_state() {
        let (tx, mut est, f) = rig();
        tx.send(SimInput::KeyDown(SimKey::Crouch)).unwrap();
        drop(tx);
        assert!(levels(&mut est, &f, InputMode::Normal).ducking);
        assert!(levels(&mut est, &f, InputMode::Normal).ducking);
    }

    #[test]
    fn camera_frames_have_requested_size() {
        let mut cam = SimCamera::new(64, 48, 1000);
        let f = cam.read_frame().unwrap();
        assert_eq!((f.width(), f.height()), (64, 48));
        assert_eq!(f.pixel(0, 0), Some(BACKDROP));
    }
}
