//! Keypoints and poses as delivered by the pose model
//!
//! Coordinates are image pixels with y growing downward. The index layout
//! is the model's contract and must not change.

use serde::{Deserialize, Serialize};

// ============================================================================
// LANDMARK INDICES (BlazePose / MediaPipe Pose - 33 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// One anatomical landmark for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Relative depth, only present for 3D models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f32>,
    /// Detection confidence in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, score: f32) -> Self {
        Self {
            x,
            y,
            score: Some(score),
            ..Self::default()
        }
    }

    /// Position as a tuple for the geometry helpers
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    /// Missing scores count as zero confidence
    pub fn confidence(&self) -> f32 {
        self.score.unwrap_or(0.0)
    }
}

/// All keypoints of one detected body in one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>, score: Option<f32>) -> Self {
        Self { score, keypoints }
    }

    /// Overall score, or the mean keypoint score when the model omits it
    pub fn confidence(&self) -> f32 {
        if let Some(score) = self.score {
            return score;
        }
        if self.keypoints.is_empty() {
            return 0.0;
        }
        let total: f32 = self.keypoints.iter().map(Keypoint::confidence).sum();
        total / self.keypoints.len() as f32
    }

    /// Keypoint by layout index
    pub fn get(&self, index: usize) -> Option<&Keypoint> {
        self.keypoints.get(index)
    }
}

/// Pick the most confident pose; `None` when empty or below `floor`
pub fn select_pose(poses: Vec<Pose>, floor: f32) -> Option<Pose> {
    poses
        .into_iter()
        .max_by(|a, b| a.confidence().total_cmp(&b.confidence()))
        .filter(|pose| pose.confidence() >= floor)
}

/// Parse the estimator's JSON output (`Pose[]`)
pub fn poses_from_json(json: &str) -> Result<Vec<Pose>, serde_json::Error> {
    serde_json::from_str(json)
}
