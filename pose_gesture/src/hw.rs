//! Real hardware: OpenCV webcam + MoveNet pose model (feature = "camera").
//!
//! Requires the OpenCV libraries and the ONNX Runtime shared library
//! installed on the system.

use log::info;
use ndarray::Array4;
use opencv::core::{Mat, CV_8UC3};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Tensor;

use crate::device::{Camera, PoseEstimator};
use crate::error::{CaptureError, GestureError};
use crate::frame::Frame;
use crate::landmark::{LandmarkName, PoseObservation, LANDMARK_COUNT};

// ════════════════════════════════════════════════════════════════════════════
// OpenCvCamera
// ════════════════════════════════════════════════════════════════════════════

/// Webcam opened through OpenCV's `VideoCapture`.
pub struct OpenCvCamera {
    index:   i32,
    capture: VideoCapture,
}

impl OpenCvCamera {
    pub fn open(index: i32) -> Result<Self, GestureError> {
        let cv = |e: opencv::Error| GestureError::Camera(e.to_string());

        info!("[camera] opening device {}", index);
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY).map_err(cv)?;
        if !capture.is_opened().map_err(cv)? {
            return Err(GestureError::Camera(format!("device {} could not be opened", index)));
        }
        // Keep latency down: always read the newest frame.
        capture.set(CAP_PROP_BUFFERSIZE, 1.0).map_err(cv)?;
        Ok(OpenCvCamera { index, capture })
    }
}

impl Camera for OpenCvCamera {
    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let dev = |e: opencv::Error| CaptureError::Device(e.to_string());

        let mut mat = Mat::default();
        if !self.capture.read(&mut mat).map_err(dev)? {
            return Err(CaptureError::NotReady);
        }
        let (w, h) = (mat.cols().max(0) as usize, mat.rows().max(0) as usize);
        if w == 0 || h == 0 {
            return Err(CaptureError::NotReady);
        }

        if mat.typ() != CV_8UC3 {
            return Err(CaptureError::Device(format!("unexpected pixel type {}", mat.typ())));
        }
        // 8-bit BGR rows, `step` bytes apart.
        let step = mat.step1(0).map_err(dev)?;
        let data = mat.data_bytes().map_err(dev)?;
        let mut pixels = Vec::with_capacity(w * h);
        for row in 0..h {
            let line = data.get(row * step..row * step + w * 3)
                .ok_or_else(|| CaptureError::Device("short frame buffer".to_string()))?;
            pixels.extend(line.chunks_exact(3).map(|bgr| {
                0xFF00_0000 | (bgr[2] as u32) << 16 | (bgr[1] as u32) << 8 | bgr[0] as u32
            }));
        }
        Frame::from_pixels(w, h, pixels)
            .ok_or_else(|| CaptureError::Device("frame size mismatch".to_string()))
    }

    fn describe(&self) -> String {
        format!("OpenCV camera {}", self.index)
    }
}

impl Drop for OpenCvCamera {
    fn drop(&mut self) {
        let _ = self.capture.release();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MoveNetEstimator
// ════════════════════════════════════════════════════════════════════════════

const MOVENET_SIZE: usize = 192;

/// MoveNet single-pose ONNX model.
///
/// Input `[1, 192, 192, 3]` RGB as f32 in 0–255; output `[1, 1, 17, 3]`
/// (or `[1, 17, 3]`) as (y, x, score) per keypoint in COCO order.  Any other
/// output shape is a per-frame estimator error.
pub struct MoveNetEstimator {
    session:        Session,
    input_name:     String,
    output_name:    String,
    min_confidence: f32,
}

impl MoveNetEstimator {
    pub fn load(model_path: &str, min_confidence: f32) -> Result<Self, GestureError> {
        let model = |e: ort::Error| GestureError::Model(e.to_string());

        info!("[pose] loading {}", model_path);
        let session = Session::builder()
            .map_err(model)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(model)?
            .commit_from_file(model_path)
            .map_err(model)?;

        let input_name = session.inputs.first()
            .map(|i| i.name.clone())
            .ok_or_else(|| GestureError::Model("model has no inputs".to_string()))?;
        let output_name = session.outputs.first()
            .map(|o| o.name.clone())
            .ok_or_else(|| GestureError::Model("model has no outputs".to_string()))?;

        Ok(MoveNetEstimator { session, input_name, output_name, min_confidence })
    }

    /// Nearest-neighbour resample into the model's NHWC input.
    fn preprocess(frame: &Frame) -> Array4<f32> {
        let mut input = Array4::<f32>::zeros((1, MOVENET_SIZE, MOVENET_SIZE, 3));
        let (fw, fh) = (frame.width(), frame.height());
        let px = frame.pixels();
        for y in 0..MOVENET_SIZE {
            let sy = y * fh / MOVENET_SIZE;
            for x in 0..MOVENET_SIZE {
                let sx = x * fw / MOVENET_SIZE;
                let c = px[sy * fw + sx];
                input[[0, y, x, 0]] = ((c >> 16) & 0xFF) as f32;
                input[[0, y, x, 1]] = ((c >> 8) & 0xFF) as f32;
                input[[0, y, x, 2]] = (c & 0xFF) as f32;
            }
        }
        input
    }
}

impl PoseEstimator for MoveNetEstimator {
    fn estimate(&mut self, frame: &Frame) -> Result<Option<PoseObservation>, CaptureError> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(None);
        }
        let est = |e: ort::Error| CaptureError::Estimator(e.to_string());

        let tensor = Tensor::from_array(Self::preprocess(frame)).map_err(est)?;
        let outputs = self.session
            .run(ort::inputs![self.input_name.as_str() => tensor])
            .map_err(est)?;
        let out: ndarray::ArrayViewD<f32> = outputs[self.output_name.as_str()]
            .try_extract_array()
            .map_err(est)?;

        let values: Vec<f32> = out.iter().copied().take(LANDMARK_COUNT * 3).collect();
        let obs = PoseObservation::from_keypoint_rows(out.shape(), &values).ok_or_else(|| {
            CaptureError::Estimator(format!("unexpected output shape {:?}", out.shape()))
        })?;

        // MoveNet always returns 17 points; call it "no body" when the head
        // and shoulders are all guesses.
        let anchors = [LandmarkName::Nose, LandmarkName::LeftShoulder, LandmarkName::RightShoulder];
        if anchors.iter().all(|&a| obs.confident(a, self.min_confidence).is_none()) {
            return Ok(None);
        }
        Ok(Some(obs))
    }
}
