//! Error types.

use thiserror::Error;

/// Errors raised while configuring or starting gesture input.
///
/// Nothing in the running capture loop produces one of these; see
/// [`CaptureError`] for the per-frame failures that are retried instead.
#[derive(Debug, Error)]
pub enum GestureError {
    #[error("gesture threshold `{name}` = {value} is outside [0, 1]")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("jump threshold {jump} must lie above (be smaller than) duck threshold {duck}")]
    ThresholdOrder { jump: f32, duck: f32 },

    #[error("failed to spawn capture thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("camera unavailable: {0}")]
    Camera(String),

    #[error("pose model unavailable: {0}")]
    Model(String),
}

/// A single failed capture cycle.  Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The device has no frame for us yet.
    #[error("frame not ready")]
    NotReady,

    #[error("camera read failed: {0}")]
    Device(String),

    #[error("pose estimation failed: {0}")]
    Estimator(String),
}
