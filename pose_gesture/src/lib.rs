//! # pose_gesture
//!
//! Turns a live stream of body-pose landmarks into discrete game inputs.
//!
//! A capture thread reads camera frames, runs a pose estimator, classifies
//! the pose against three horizontal threshold lines and publishes the
//! result.  A game loop running on its own fixed tick polls that result
//! without ever waiting on the camera.
//!
//! ## Gesture → input mapping
//!
//! | Pose | Condition | Input |
//! |---|---|---|
//! | Nose above the jump line | `nose.y < jump` | jump held; rising edge = jump pressed |
//! | Nose below the duck line | `nose.y > duck` | duck held |
//! | Either wrist above the reset line | `wrist.y < reset`, awaiting reset only | rising edge = restart |
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: [`sim`] fakes a camera and a body driven
//!   by keyboard events.
//! * `camera` — **Hardware mode**: [`hw`] reads a webcam through OpenCV and
//!   estimates poses with a MoveNet ONNX model.

pub mod error;
pub mod landmark;
pub mod classifier;
pub mod trigger;
pub mod font;
pub mod frame;
pub mod overlay;
pub mod device;
pub mod source;
pub mod sim;
#[cfg(feature = "camera")]
pub mod hw;

pub use classifier::{classify, GestureLevels, GestureThresholds, InputMode};
pub use device::{Camera, PoseEstimator};
pub use error::{CaptureError, GestureError};
pub use frame::Frame;
pub use landmark::{Landmark, LandmarkName, PoseObservation};
pub use overlay::DisplayFrame;
pub use source::{CaptureConfig, GestureInput, GestureInputSource};
pub use trigger::EdgeTrigger;
