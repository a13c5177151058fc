//! Session configuration
//!
//! Parsed from JSON handed over by the page. Every field has a default so
//! an empty object (or no config at all) gives a working session.
//! Per-exercise thresholds are not configured here; they live next to
//! each detector.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Frame processing cap; faster frames are dropped
    pub target_fps: f64,

    /// Poses below this overall confidence count as lost tracking
    pub pose_confidence_floor: f32,

    /// How long lost tracking is tolerated before the pipeline restarts
    pub tracking_grace_ms: f64,

    /// Retries after the first failed acquisition
    pub max_retries: u32,

    /// First retry delay; doubles on each further attempt
    pub retry_base_delay_ms: f64,

    pub camera: CameraConfig,

    pub overlay: OverlayConfig,
}

/// Camera constraints passed to `getUserMedia`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub max_frame_rate: u32,
    /// "user" (front) or "environment" (rear)
    pub facing_mode: String,
}

/// Debug overlay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlayConfig {
    /// Id of the canvas laid over the video element
    pub canvas_id: String,

    /// How long "Rep!" stays in the readout after a count
    pub rep_flash_ms: f64,

    /// Keypoints at or below this score are not drawn
    pub keypoint_min_score: f32,

    /// Skeleton lines need both endpoints above this score
    pub line_min_score: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            target_fps: 30.0,
            pose_confidence_floor: 0.3,
            tracking_grace_ms: 5000.0,
            max_retries: 3,
            retry_base_delay_ms: 1000.0,
            camera: CameraConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            ideal_width: 640,
            ideal_height: 480,
            max_frame_rate: 30,
            facing_mode: "user".to_string(),
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            canvas_id: "pose-canvas".to_string(),
            rep_flash_ms: 600.0,
            keypoint_min_score: 0.2,
            line_min_score: 0.3,
        }
    }
}

impl SessionConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Milliseconds between processed frames
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }

    /// Reject values that would stall or disable the pipeline
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            return Err(invalid("targetFps", "must be a positive number"));
        }
        if !(0.0..=1.0).contains(&self.pose_confidence_floor) {
            return Err(invalid("poseConfidenceFloor", "must be within [0, 1]"));
        }
        if !(self.tracking_grace_ms.is_finite() && self.tracking_grace_ms >= 0.0) {
            return Err(invalid("trackingGraceMs", "must be a non-negative number"));
        }
        if !(self.retry_base_delay_ms.is_finite() && self.retry_base_delay_ms >= 0.0) {
            return Err(invalid("retryBaseDelayMs", "must be a non-negative number"));
        }
        if self.camera.max_frame_rate == 0 {
            return Err(invalid("camera.maxFrameRate", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.overlay.keypoint_min_score)
            || !(0.0..=1.0).contains(&self.overlay.line_min_score)
        {
            return Err(invalid("overlay", "score thresholds must be within [0, 1]"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
