//! Handles the session owns exclusively: the camera stream and the pose model
//!
//! The browser implementations live in `bridge`; tests use fakes.

/// A live camera stream
pub trait CameraStream {
    /// Stop every track. Must be safe to call more than once.
    fn stop_tracks(&mut self);

    /// Tracks not yet stopped
    fn live_tracks(&self) -> usize;
}

/// A loaded pose-estimation model
pub trait PoseModel {
    /// Free model memory. Must be safe to call more than once.
    fn dispose(&mut self);
}

/// Camera and model acquired together
pub struct Pipeline {
    pub camera: Box<dyn CameraStream>,
    pub model: Box<dyn PoseModel>,
}

impl Pipeline {
    pub fn new(camera: Box<dyn CameraStream>, model: Box<dyn PoseModel>) -> Self {
        Self { camera, model }
    }

    /// Model first so no estimation can read a stopped stream
    pub fn release(mut self) {
        self.model.dispose();
        self.camera.stop_tracks();
    }
}
