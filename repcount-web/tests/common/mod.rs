//! Synthetic poses and a session harness shared by the scenario tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use repcount_web::pose::{
    LANDMARK_COUNT, LEFT_ANKLE, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ANKLE,
    RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};
use repcount_web::session::{
    CameraStream, FrameOutcome, Pipeline, PoseModel, ProgressLog, SessionController,
};
use repcount_web::{ExerciseKind, Keypoint, Pose, SessionConfig};

/// Frame spacing; just over the default 30 fps throttle interval
pub const FRAME_MS: f64 = 40.0;

// ============================================================================
// POSES
// ============================================================================

pub fn keypoints(score: f32) -> Vec<Keypoint> {
    vec![Keypoint::new(0.0, 0.0, score); LANDMARK_COUNT]
}

fn set(kps: &mut [Keypoint], index: usize, x: f32, y: f32) {
    kps[index].x = x;
    kps[index].y = y;
}

/// Both knees at `knee_deg`: hip 100px above the knee, ankle 100px away
pub fn squat_pose(knee_deg: f32) -> Pose {
    let mut kps = keypoints(0.9);
    let theta = knee_deg.to_radians();
    for (hip, knee, ankle, x) in [
        (LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, 260.0),
        (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, 140.0),
    ] {
        set(&mut kps, hip, x, 300.0);
        set(&mut kps, knee, x, 400.0);
        set(&mut kps, ankle, x + 100.0 * theta.sin(), 400.0 - 100.0 * theta.cos());
    }
    Pose::new(kps, Some(0.9))
}

/// Wrists and ankles both spread to `spread` shoulder widths
pub fn jack_pose(spread: f32) -> Pose {
    let mut kps = keypoints(0.9);
    set(&mut kps, LEFT_SHOULDER, 250.0, 200.0);
    set(&mut kps, RIGHT_SHOULDER, 150.0, 200.0);
    set(&mut kps, LEFT_WRIST, 200.0 + spread * 50.0, 150.0);
    set(&mut kps, RIGHT_WRIST, 200.0 - spread * 50.0, 150.0);
    set(&mut kps, LEFT_ANKLE, 200.0 + spread * 50.0, 500.0);
    set(&mut kps, RIGHT_ANKLE, 200.0 - spread * 50.0, 500.0);
    Pose::new(kps, Some(0.9))
}

/// Body mostly hidden: every score 0.1
pub fn occluded_pose() -> Pose {
    Pose::new(keypoints(0.1), Some(0.1))
}

// ============================================================================
// SESSION HARNESS
// ============================================================================

#[derive(Clone, Default)]
pub struct Probe {
    pub live_tracks: Rc<Cell<usize>>,
    pub disposals: Rc<Cell<u32>>,
}

struct TestCamera(Probe);
struct TestModel(Probe);

impl CameraStream for TestCamera {
    fn stop_tracks(&mut self) {
        self.0.live_tracks.set(0);
    }
    fn live_tracks(&self) -> usize {
        self.0.live_tracks.get()
    }
}

impl PoseModel for TestModel {
    fn dispose(&mut self) {
        self.0.disposals.set(self.0.disposals.get() + 1);
    }
}

impl Probe {
    pub fn pipeline(&self) -> Pipeline {
        self.live_tracks.set(1);
        Pipeline::new(
            Box::new(TestCamera(self.clone())),
            Box::new(TestModel(self.clone())),
        )
    }
}

/// A running session fed one frame every `FRAME_MS`
pub struct Harness {
    pub session: SessionController,
    pub log: Rc<RefCell<ProgressLog>>,
    pub probe: Probe,
    pub now_ms: f64,
}

impl Harness {
    pub fn running(kind: ExerciseKind) -> Self {
        let log = Rc::new(RefCell::new(ProgressLog::new()));
        let mut session =
            SessionController::new(SessionConfig::default(), kind, Box::new(Rc::clone(&log)));
        let probe = Probe::default();

        session.activate();
        let ticket = session.poll_acquisition(0.0).expect("acquisition due");
        assert!(session.acquisition_succeeded(ticket, probe.pipeline()));

        Self {
            session,
            log,
            probe,
            now_ms: 0.0,
        }
    }

    /// Process one frame whose estimator returned `poses`
    pub fn step(&mut self, poses: Vec<Pose>) -> FrameOutcome {
        let ticket = self
            .session
            .begin_frame(self.now_ms)
            .expect("frame admitted");
        self.now_ms += FRAME_MS;
        self.session.complete_frame(ticket, poses)
    }

    pub fn hold(&mut self, pose: &Pose, frames: usize) -> Vec<FrameOutcome> {
        (0..frames).map(|_| self.step(vec![pose.clone()])).collect()
    }

    pub fn reps(&self) -> u32 {
        self.session.state().rep_count
    }
}

/// Cumulative counts carried by the rep events among `outcomes`
pub fn events(outcomes: &[FrameOutcome]) -> Vec<u32> {
    outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            FrameOutcome::Tracked { event: Some(event), .. } => Some(event.cumulative_reps),
            _ => None,
        })
        .collect()
}
