//! Named body landmarks in normalized image coordinates.

// ════════════════════════════════════════════════════════════════════════════
// LandmarkName
// ════════════════════════════════════════════════════════════════════════════

/// The 17 COCO body keypoints, in the order pose models emit them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkName {
    Nose          = 0,
    LeftEye       = 1,
    RightEye      = 2,
    LeftEar       = 3,
    RightEar      = 4,
    LeftShoulder  = 5,
    RightShoulder = 6,
    LeftElbow     = 7,
    RightElbow    = 8,
    LeftWrist     = 9,
    RightWrist    = 10,
    LeftHip       = 11,
    RightHip      = 12,
    LeftKnee      = 13,
    RightKnee     = 14,
    LeftAnkle     = 15,
    RightAnkle    = 16,
}

pub const LANDMARK_COUNT: usize = 17;

impl LandmarkName {
    pub const ALL: [LandmarkName; LANDMARK_COUNT] = [
        LandmarkName::Nose,
        LandmarkName::LeftEye,
        LandmarkName::RightEye,
        LandmarkName::LeftEar,
        LandmarkName::RightEar,
        LandmarkName::LeftShoulder,
        LandmarkName::RightShoulder,
        LandmarkName::LeftElbow,
        LandmarkName::RightElbow,
        LandmarkName::LeftWrist,
        LandmarkName::RightWrist,
        LandmarkName::LeftHip,
        LandmarkName::RightHip,
        LandmarkName::LeftKnee,
        LandmarkName::RightKnee,
        LandmarkName::LeftAnkle,
        LandmarkName::RightAnkle,
    ];

    pub fn index(self) -> usize { self as usize }

    /// Left/right counterpart, used when the image is mirrored.
    pub fn mirror(self) -> Self {
        use LandmarkName::*;
        match self {
            Nose          => Nose,
            LeftEye       => RightEye,
            RightEye      => LeftEye,
            LeftEar       => RightEar,
            RightEar      => LeftEar,
            LeftShoulder  => RightShoulder,
            RightShoulder => LeftShoulder,
            LeftElbow     => RightElbow,
            RightElbow    => LeftElbow,
            LeftWrist     => RightWrist,
            RightWrist    => LeftWrist,
            LeftHip       => RightHip,
            RightHip      => LeftHip,
            LeftKnee      => RightKnee,
            RightKnee     => LeftKnee,
            LeftAnkle     => RightAnkle,
            RightAnkle    => LeftAnkle,
        }
    }
}

/// Bones drawn by the overlay.
pub const SKELETON: [(LandmarkName, LandmarkName); 16] = {
    use LandmarkName::*;
    [
        (LeftEar, LeftEye),
        (LeftEye, Nose),
        (Nose, RightEye),
        (RightEye, RightEar),
        (LeftShoulder, RightShoulder),
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (LeftShoulder, LeftHip),
        (RightShoulder, RightHip),
        (LeftHip, RightHip),
        (LeftHip, LeftKnee),
        (LeftKnee, LeftAnkle),
        (RightHip, RightKnee),
        (RightKnee, RightAnkle),
    ]
};

// ════════════════════════════════════════════════════════════════════════════
// Landmark / PoseObservation
// ════════════════════════════════════════════════════════════════════════════

/// One keypoint.  `x`, `y` are in [0, 1] with y growing downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Landmark {
    pub x:          f32,
    pub y:          f32,
    pub confidence: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Landmark { x, y, confidence: 1.0 }
    }
}

/// Landmarks of the single body seen in one camera frame.
///
/// Absent entries are keypoints the estimator could not place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseObservation {
    points: [Option<Landmark>; LANDMARK_COUNT],
}

impl PoseObservation {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, name: LandmarkName) -> Option<Landmark> {
        self.points[name.index()]
    }

    pub fn set(&mut self, name: LandmarkName, landmark: Landmark) {
        self.points[name.index()] = Some(landmark);
    }

    /// Builder-style `set` with full confidence.
    pub fn with(mut self, name: LandmarkName, x: f32, y: f32) -> Self {
        self.set(name, Landmark::new(x, y));
        self
    }

    /// Landmark only if it clears `min_confidence`.
    pub fn confident(&self, name: LandmarkName, min_confidence: f32) -> Option<Landmark> {
        self.get(name).filter(|l| l.confidence >= min_confidence)
    }

    pub fn iter(&self) -> impl Iterator<Item = (LandmarkName, Landmark)> + '_ {
        LandmarkName::ALL
            .iter()
            .filter_map(move |&n| self.get(n).map(|l| (n, l)))
    }

    pub fn len(&self) -> usize { self.points.iter().flatten().count() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Decode a `[.., 17, 3]` keypoint tensor of (y, x, score) rows, taking
    /// the first pose.  `values` is the tensor in logical order.
    ///
    /// Returns `None` for any other shape.
    pub fn from_keypoint_rows(shape: &[usize], values: &[f32]) -> Option<Self> {
        match shape {
            [.., LANDMARK_COUNT, 3] if shape.iter().all(|&d| d > 0) => {}
            _ => return None,
        }
        let rows = values.get(..LANDMARK_COUNT * 3)?;
        let mut obs = PoseObservation::new();
        for (name, row) in LandmarkName::ALL.iter().zip(rows.chunks_exact(3)) {
            obs.set(*name, Landmark { y: row[0], x: row[1], confidence: row[2] });
        }
        Some(obs)
    }

    /// Selfie view: x → 1 − x, left and right swapped.
    pub fn mirrored(&self) -> Self {
        let mut out = PoseObservation::new();
        for (name, l) in self.iter() {
            out.set(name.mirror(), Landmark { x: 1.0 - l.x, ..l });
        }
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_model_order() {
        for (i, name) in LandmarkName::ALL.iter().enumerate() {
            assert_eq!(name.index(), i);
        }
    }

    #[test]
    fn mirror_is_an_involution() {
        for name in LandmarkName::ALL {
            assert_eq!(name.mirror().mirror(), name);
        }
    }

    #[test]
    fn mirrored_swaps_sides_and_flips_x() {
        let obs = PoseObservation::new().with(LandmarkName::LeftWrist, 0.2, 0.5);
        let m = obs.mirrored();
        assert!(m.get(LandmarkName::LeftWrist).is_none());
        let r = m.get(LandmarkName::RightWrist).unwrap();
        assert!((r.x - 0.8).abs() < 1e-6);
        assert_eq!(r.y, 0.5);
    }

    #[test]
    fn confident_filters_low_scores() {
        let mut obs = PoseObservation::new();
        obs.set(LandmarkName::Nose, Landmark { x: 0.5, y: 0.5, confidence: 0.1 });
        assert!(obs.confident(LandmarkName::Nose, 0.3).is_none());
        assert!(obs.confident(LandmarkName::Nose, 0.05).is_some());
    }

    fn keypoint_rows() -> Vec<f32> {
        (0..LANDMARK_COUNT).flat_map(|i| [0.1 + i as f32 * 0.01, 0.5, 0.9]).collect()
    }

    #[test]
    fn keypoint_rows_decode_single_pose_layouts() {
        let values = keypoint_rows();
        for shape in [&[1, 1, 17, 3][..], &[1, 17, 3][..], &[17, 3][..]] {
            let obs = PoseObservation::from_keypoint_rows(shape, &values).unwrap();
            assert_eq!(obs.len(), LANDMARK_COUNT);
            let ankle = obs.get(LandmarkName::RightAnkle).unwrap();
            assert!((ankle.y - 0.26).abs() < 1e-6);
            assert_eq!(ankle.x, 0.5);
            assert_eq!(ankle.confidence, 0.9);
        }
    }

    #[test]
    fn keypoint_rows_reject_other_shapes() {
        let values = keypoint_rows();
        assert!(PoseObservation::from_keypoint_rows(&[1, 6, 56], &vec![0.0; 336]).is_none());
        assert!(PoseObservation::from_keypoint_rows(&[1, 17, 2], &values).is_none());
        assert!(PoseObservation::from_keypoint_rows(&[0, 17, 3], &[]).is_none());
        assert!(PoseObservation::from_keypoint_rows(&[1, 17, 3], &values[..30]).is_none());
    }

    #[test]
    fn len_counts_present_points() {
        let obs = PoseObservation::new()
            .with(LandmarkName::Nose, 0.5, 0.5)
            .with(LandmarkName::LeftHip, 0.4, 0.8);
        assert_eq!(obs.len(), 2);
        assert!(PoseObservation::new().is_empty());
    }
}
