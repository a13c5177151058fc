//! Pose module - keypoint layout and per-frame pose data
//!
//! Re-exports only. All logic in submodules.

mod landmarks;

pub use landmarks::{
    poses_from_json,
    select_pose,
    Keypoint,
    Pose,
    // Layout
    LANDMARK_COUNT, NOSE,
    LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
};
