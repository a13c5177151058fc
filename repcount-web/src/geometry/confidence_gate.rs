//! Confidence Gate - first line of defense against occlusion
//!
//! A detector only looks at geometry when every joint it needs was
//! detected with enough confidence. Otherwise the frame is skipped.

use crate::pose::Keypoint;

/// Minimum-confidence check over a fixed set of landmark indices
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceGate {
    /// Scores must be strictly above this
    threshold: f32,
}

impl ConfidenceGate {
    pub const fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// True when every `required` keypoint exists and scores above threshold
    ///
    /// Missing indices and missing scores fail the gate.
    pub fn admits(&self, keypoints: &[Keypoint], required: &[usize]) -> bool {
        required.iter().all(|&idx| {
            keypoints
                .get(idx)
                .and_then(|kp| kp.score)
                .is_some_and(|score| score > self.threshold)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(scores: &[Option<f32>]) -> Vec<Keypoint> {
        scores
            .iter()
            .map(|&score| Keypoint {
                score,
                ..Keypoint::default()
            })
            .collect()
    }

    #[test]
    fn test_admits_when_all_above() {
        let gate = ConfidenceGate::new(0.2);
        assert!(gate.admits(&points(&[Some(0.9), Some(0.3)]), &[0, 1]));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let gate = ConfidenceGate::new(0.2);
        assert!(!gate.admits(&points(&[Some(0.2)]), &[0]));
    }

    #[test]
    fn test_missing_score_or_index_rejected() {
        let gate = ConfidenceGate::new(0.2);
        let kps = points(&[Some(0.9), None]);
        assert!(!gate.admits(&kps, &[1]));
        assert!(!gate.admits(&kps, &[0, 5]));
    }

    #[test]
    fn test_only_required_indices_matter() {
        let gate = ConfidenceGate::new(0.5);
        let kps = points(&[Some(0.1), Some(0.8)]);
        assert!(gate.admits(&kps, &[1]));
    }
}
