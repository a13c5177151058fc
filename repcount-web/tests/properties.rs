//! Counting invariants over random keypoint streams

use proptest::prelude::*;

use repcount_web::detectors::detect;
use repcount_web::pose::LANDMARK_COUNT;
use repcount_web::{DetectorState, ExerciseKind, Frame, Keypoint};

fn any_keypoint() -> impl Strategy<Value = Keypoint> {
    (0.0f32..640.0, 0.0f32..480.0, 0.0f32..1.0).prop_map(|(x, y, s)| Keypoint::new(x, y, s))
}

fn any_body() -> impl Strategy<Value = Vec<Keypoint>> {
    prop::collection::vec(any_keypoint(), LANDMARK_COUNT)
}

fn any_kind() -> impl Strategy<Value = ExerciseKind> {
    prop::sample::select(ExerciseKind::ALL.to_vec())
}

/// Frames with strictly increasing timestamps, 1..200ms apart
fn any_stream() -> impl Strategy<Value = Vec<(Vec<Keypoint>, f64)>> {
    prop::collection::vec((any_body(), 1.0f64..200.0), 1..40).prop_map(|frames| {
        let mut now = 0.0;
        frames
            .into_iter()
            .map(|(kps, gap)| {
                now += gap;
                (kps, now)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn count_never_decreases_and_steps_by_one(kind in any_kind(), frames in any_stream()) {
        let mut state = DetectorState::initial(kind);
        for (kps, now) in &frames {
            let next = detect(&Frame::new(kps, *now), state);
            prop_assert!(next.rep_count == state.rep_count || next.rep_count == state.rep_count + 1);
            prop_assert_eq!(next.exercise, kind);
            state = next;
        }
    }

    #[test]
    fn rep_only_on_rest_to_peak_edge(kind in any_kind(), frames in any_stream()) {
        let (rest, peak) = kind.phases();
        let mut state = DetectorState::initial(kind);
        for (kps, now) in &frames {
            let next = detect(&Frame::new(kps, *now), state);
            if next.rep_count > state.rep_count {
                prop_assert_eq!(state.phase, rest);
                prop_assert_eq!(next.phase, peak);
                prop_assert_eq!(next.last_rep_ms, Some(*now));
            }
            state = next;
        }
    }

    #[test]
    fn holding_one_posture_counts_at_most_once(
        kind in any_kind(),
        kps in any_body(),
        repeats in 2usize..30,
    ) {
        let start = DetectorState::initial(kind);
        let mut state = start;
        for i in 0..repeats {
            state = detect(&Frame::new(&kps, i as f64 * 500.0), state);
        }
        prop_assert!(state.rep_count <= start.rep_count + 1);
    }

    #[test]
    fn reps_respect_cooldown(kind in any_kind(), frames in any_stream()) {
        let mut state = DetectorState::initial(kind);
        let mut rep_times = Vec::new();
        for (kps, now) in &frames {
            let next = detect(&Frame::new(kps, *now), state);
            if next.rep_count > state.rep_count {
                rep_times.push(*now);
            }
            state = next;
        }
        // shortest cooldown of any exercise
        for pair in rep_times.windows(2) {
            prop_assert!(pair[1] - pair[0] >= 400.0);
        }
    }
}
