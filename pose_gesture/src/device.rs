//! Seams to the two external collaborators: the camera and the pose model.
//!
//! Both run on the capture thread only, hence `Send` but not `Sync`.

use crate::error::CaptureError;
use crate::frame::Frame;
use crate::landmark::PoseObservation;

/// A source of sequential images.
///
/// Dropping the camera releases the underlying device.
pub trait Camera: Send {
    /// Next frame.  [`CaptureError::NotReady`] and
    /// [`CaptureError::Device`] are both retried by the caller.
    fn read_frame(&mut self) -> Result<Frame, CaptureError>;

    /// Human-readable name for logs.
    fn describe(&self) -> String;
}

/// Body-pose estimator.
pub trait PoseEstimator: Send {
    /// `Ok(None)` means no body was detected, which is not an error.
    fn estimate(&mut self, frame: &Frame) -> Result<Option<PoseObservation>, CaptureError>;
}

impl<C: Camera + ?Sized> Camera for Box<C> {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> { (**self).read_frame() }
    fn describe(&self) -> String { (**self).describe() }
}

impl<E: PoseEstimator + ?Sized> PoseEstimator for Box<E> {
    fn estimate(&mut self, frame: &Frame) -> Result<Option<PoseObservation>, CaptureError> {
        (**self).estimate(frame)
    }
}
