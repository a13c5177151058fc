//! End-to-end counting through the session controller

mod common;

use common::{events, jack_pose, keypoints, occluded_pose, squat_pose, Harness};
use repcount_web::detectors::detect;
use repcount_web::pose::{LEFT_KNEE, RIGHT_KNEE};
use repcount_web::session::{FrameOutcome, SessionStatus};
use repcount_web::{DetectorState, ExerciseKind, Frame, Phase};

#[test]
fn squat_counts_once_at_second_standing() {
    let mut harness = Harness::running(ExerciseKind::Squat);
    let mut outcomes = Vec::new();

    outcomes.extend(harness.hold(&squat_pose(170.0), 5));
    outcomes.extend(harness.hold(&squat_pose(100.0), 5));
    assert!(events(&outcomes).is_empty());

    let standing = harness.hold(&squat_pose(170.0), 5);
    // first frame back up carries the event
    assert!(matches!(
        &standing[0],
        FrameOutcome::Tracked { event: Some(e), .. } if e.cumulative_reps == 1
    ));
    outcomes.extend(standing);

    assert_eq!(events(&outcomes), vec![1]);
    assert_eq!(harness.reps(), 1);

    let log = harness.log.borrow();
    assert_eq!(log.len(), 1);
    assert_eq!(log.entries()[0].exercise_type, ExerciseKind::Squat);
    assert_eq!(log.entries()[0].reps, 1);
}

#[test]
fn jumping_jack_flicker_counts_once() {
    let mut harness = Harness::running(ExerciseKind::JumpingJack);
    let mut outcomes = Vec::new();
    for spread in [0.5, 0.5, 1.8, 1.8, 1.8, 1.8, 0.4] {
        outcomes.push(harness.step(vec![jack_pose(spread)]));
    }
    assert_eq!(events(&outcomes), vec![1]);
    assert_eq!(harness.session.state().phase, Phase::Closed);
}

#[test]
fn occlusion_keeps_count_and_phase() {
    let mut harness = Harness::running(ExerciseKind::Squat);

    harness.hold(&squat_pose(170.0), 5);
    harness.hold(&squat_pose(100.0), 10);
    harness.hold(&squat_pose(170.0), 10);
    assert_eq!(harness.reps(), 1);
    let before = harness.session.state();

    let hidden = harness.hold(&occluded_pose(), 50);
    assert!(hidden
        .iter()
        .all(|outcome| matches!(outcome, FrameOutcome::TrackingLost { .. })));
    assert_eq!(harness.session.state(), before);
    assert_eq!(harness.session.status(), &SessionStatus::Running);

    harness.hold(&squat_pose(100.0), 10);
    harness.hold(&squat_pose(170.0), 10);
    assert_eq!(harness.reps(), 2);
    assert_eq!(harness.log.borrow().len(), 2);
}

#[test]
fn hidden_knees_hold_count_while_pose_is_tracked() {
    let mut harness = Harness::running(ExerciseKind::Squat);

    harness.hold(&squat_pose(170.0), 5);
    harness.hold(&squat_pose(100.0), 10);
    harness.hold(&squat_pose(170.0), 10);
    assert_eq!(harness.reps(), 1);
    let before = harness.session.state();

    // Rest of the body stays confident, so the pose clears the floor
    let mut knees_hidden = squat_pose(100.0);
    knees_hidden.keypoints[LEFT_KNEE].score = Some(0.1);
    knees_hidden.keypoints[RIGHT_KNEE].score = Some(0.1);

    let gated = harness.hold(&knees_hidden, 50);
    assert!(gated
        .iter()
        .all(|outcome| matches!(outcome, FrameOutcome::Tracked { event: None, .. })));
    assert_eq!(harness.session.state(), before);

    harness.hold(&squat_pose(100.0), 10);
    harness.hold(&squat_pose(170.0), 10);
    assert_eq!(harness.reps(), 2);
    assert_eq!(harness.log.borrow().len(), 2);
}

#[test]
fn empty_estimator_output_is_tracking_loss() {
    let mut harness = Harness::running(ExerciseKind::Pushup);
    assert!(matches!(
        harness.step(vec![]),
        FrameOutcome::TrackingLost { .. }
    ));
}

#[test]
fn most_confident_pose_drives_the_detector() {
    let mut harness = Harness::running(ExerciseKind::Squat);
    let mut faint_deep = squat_pose(100.0);
    faint_deep.score = Some(0.4);

    harness.step(vec![faint_deep, squat_pose(170.0)]);
    assert_eq!(harness.session.state().phase, Phase::Up);
}

#[test]
fn switching_exercise_resets_state() {
    let mut harness = Harness::running(ExerciseKind::Squat);
    harness.hold(&squat_pose(100.0), 3);
    harness.hold(&squat_pose(170.0), 3);
    assert_eq!(harness.reps(), 1);

    assert!(harness.session.select_exercise(ExerciseKind::JumpingJack));
    assert_eq!(
        harness.session.state(),
        DetectorState::initial(ExerciseKind::JumpingJack)
    );
    assert!(!harness.session.has_pipeline());
    assert_eq!(harness.probe.live_tracks.get(), 0);
    assert_eq!(harness.session.status(), &SessionStatus::Pending { attempt: 1 });
}

#[test]
fn teardown_twice_is_harmless() {
    let mut harness = Harness::running(ExerciseKind::HighKnees);
    harness.session.deactivate();
    harness.session.deactivate();

    assert_eq!(harness.session.status(), &SessionStatus::Idle);
    assert_eq!(harness.probe.live_tracks.get(), 0);
    assert_eq!(harness.probe.disposals.get(), 1);
}

#[test]
fn low_confidence_frame_changes_nothing_for_any_exercise() {
    let faint = keypoints(0.1);
    for kind in ExerciseKind::ALL {
        let state = DetectorState {
            rep_count: 7,
            last_rep_ms: Some(100.0),
            ..DetectorState::initial(kind)
        };
        assert_eq!(detect(&Frame::new(&faint, 5000.0), state), state, "{kind}");
    }
}

#[test]
fn truncated_pose_changes_nothing() {
    let short = keypoints(0.9)[..17].to_vec();
    for kind in ExerciseKind::ALL {
        let state = DetectorState::initial(kind);
        assert_eq!(detect(&Frame::new(&short, 0.0), state), state, "{kind}");
    }
}
