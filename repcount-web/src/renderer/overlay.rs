//! Text readout shown over the video
//!
//! Returned as a string; the page puts it into an HTML element.

use std::fmt::Write;

use crate::config::OverlayConfig;
use crate::detectors::{readout, DetectorState};
use crate::pose::Pose;

/// True while the "Rep!" flash should show
pub fn rep_flash_active(state: &DetectorState, now_ms: f64, flash_ms: f64) -> bool {
    state
        .last_rep_ms
        .is_some_and(|at| now_ms >= at && now_ms - at < flash_ms)
}

/// Exercise name and reps, phase, the driving metric(s), and the flash
pub fn overlay_text(
    state: &DetectorState,
    pose: Option<&Pose>,
    now_ms: f64,
    overlay: &OverlayConfig,
) -> String {
    let mut text = format!(
        "{}: {}\nPhase: {}",
        state.exercise.display_name(),
        state.rep_count,
        state.phase
    );

    match pose {
        Some(pose) => {
            for line in readout(state.exercise, &pose.keypoints) {
                // Writing to a String cannot fail
                let _ = write!(text, "\n{line}");
            }
        }
        None => text.push_str("\nNo pose"),
    }

    if rep_flash_active(state, now_ms, overlay.rep_flash_ms) {
        text.push_str("\nRep!");
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{ExerciseKind, Phase};

    fn counted(at: f64) -> DetectorState {
        DetectorState {
            phase: Phase::Open,
            rep_count: 4,
            last_rep_ms: Some(at),
            ..DetectorState::initial(ExerciseKind::JumpingJack)
        }
    }

    #[test]
    fn test_header_lines() {
        let state = DetectorState::initial(ExerciseKind::Squat);
        let text = overlay_text(&state, None, 0.0, &OverlayConfig::default());
        assert_eq!(text, "Squats: 0\nPhase: up\nNo pose");
    }

    #[test]
    fn test_flash_window() {
        let config = OverlayConfig::default();
        assert!(overlay_text(&counted(1000.0), None, 1200.0, &config).ends_with("Rep!"));
        assert!(!overlay_text(&counted(1000.0), None, 1600.0, &config).contains("Rep!"));
        assert!(!rep_flash_active(&counted(1000.0), 900.0, 600.0));
    }

    #[test]
    fn test_metric_lines_follow_exercise() {
        let pose = Pose::new(vec![crate::pose::Keypoint::new(0.0, 0.0, 0.9); 33], None);
        let text = overlay_text(&counted(0.0), Some(&pose), 5000.0, &OverlayConfig::default());
        assert_eq!(text, "Jumping Jacks: 4\nPhase: open\narms: --\nlegs: --");
    }
}
