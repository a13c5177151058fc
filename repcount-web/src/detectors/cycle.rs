//! Shared two-phase cycle logic
//!
//! Every detector reduces its frame to a `Posture` and hands it to
//! `advance`. Only the rest → peak edge counts, so holding a phase for
//! many frames can never count twice.

use log::{debug, info};

use super::state::{DetectorState, Frame};
use crate::geometry::ConfidenceGate;

/// What the current frame looks like for the active exercise
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Posture {
    /// Down / closed / centered
    Rest,
    /// Up / open / bent
    Peak,
    /// Inside the hysteresis band, or an undefined metric
    Between,
}

/// Single-metric thresholds with a hysteresis band between them
#[derive(Clone, Copy, Debug)]
pub struct Band {
    /// Metric strictly below this is the rest posture
    pub rest_below: f32,
    /// Metric strictly above this is the peak posture
    pub peak_above: f32,
}

impl Band {
    pub(crate) fn classify(&self, metric: f32) -> Posture {
        // NaN fails both comparisons
        if metric > self.peak_above {
            Posture::Peak
        } else if metric < self.rest_below {
            Posture::Rest
        } else {
            Posture::Between
        }
    }
}

/// Full tuning for an exercise driven by one metric
#[derive(Clone, Copy, Debug)]
pub struct BandTuning {
    pub gate: ConfidenceGate,
    pub band: Band,
    pub min_rep_interval_ms: f64,
}

impl BandTuning {
    /// Gate, measure, classify, advance
    pub(crate) fn run(
        &self,
        frame: &Frame<'_>,
        state: DetectorState,
        required: &[usize],
        metric: impl FnOnce(&Frame<'_>) -> f32,
    ) -> DetectorState {
        if !self.gate.admits(frame.keypoints, required) {
            return state;
        }
        let posture = self.band.classify(metric(frame));
        advance(state, posture, frame.timestamp_ms, self.min_rep_interval_ms)
    }
}

/// Apply one observed posture to the previous state
pub(crate) fn advance(
    state: DetectorState,
    posture: Posture,
    timestamp_ms: f64,
    min_rep_interval_ms: f64,
) -> DetectorState {
    let (rest, peak) = state.exercise.phases();

    match posture {
        Posture::Peak if state.phase == rest => {
            let too_soon = state
                .last_rep_ms
                .is_some_and(|last| timestamp_ms - last < min_rep_interval_ms);

            if too_soon {
                // Phase follows the body, the count does not
                debug!("{}: cycle faster than {min_rep_interval_ms}ms ignored", state.exercise);
                return DetectorState { phase: peak, ..state };
            }

            let rep_count = state.rep_count + 1;
            info!("{}: rep counted ({rep_count})", state.exercise);
            DetectorState {
                phase: peak,
                rep_count,
                last_rep_ms: Some(timestamp_ms),
                ..state
            }
        }
        Posture::Rest if state.phase == peak => {
            debug!("{}: back to {rest}", state.exercise);
            DetectorState { phase: rest, ..state }
        }
        _ => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{ExerciseKind, Phase};

    fn at_rest() -> DetectorState {
        DetectorState::initial(ExerciseKind::HighKnees)
    }

    #[test]
    fn test_band_classify() {
        let band = Band { rest_below: 90.0, peak_above: 160.0 };
        assert_eq!(band.classify(45.0), Posture::Rest);
        assert_eq!(band.classify(170.0), Posture::Peak);
        assert_eq!(band.classify(120.0), Posture::Between);
        assert_eq!(band.classify(f32::NAN), Posture::Between);
    }

    #[test]
    fn test_rest_to_peak_counts() {
        let next = advance(at_rest(), Posture::Peak, 100.0, 400.0);
        assert_eq!(next.phase, Phase::Up);
        assert_eq!(next.rep_count, 1);
        assert_eq!(next.last_rep_ms, Some(100.0));
    }

    #[test]
    fn test_holding_peak_does_not_recount() {
        let once = advance(at_rest(), Posture::Peak, 100.0, 400.0);
        let twice = advance(once, Posture::Peak, 2000.0, 400.0);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_peak_to_rest_only_changes_phase() {
        let up = advance(at_rest(), Posture::Peak, 100.0, 400.0);
        let down = advance(up, Posture::Rest, 300.0, 400.0);
        assert_eq!(down.phase, Phase::Down);
        assert_eq!(down.rep_count, 1);
    }

    #[test]
    fn test_cooldown_rejects_fast_cycle() {
        let up = advance(at_rest(), Posture::Peak, 100.0, 400.0);
        let down = advance(up, Posture::Rest, 200.0, 400.0);
        let flicker = advance(down, Posture::Peak, 300.0, 400.0);
        assert_eq!(flicker.phase, Phase::Up);
        assert_eq!(flicker.rep_count, 1);
        assert_eq!(flicker.last_rep_ms, Some(100.0));

        let down = advance(flicker, Posture::Rest, 400.0, 400.0);
        let real = advance(down, Posture::Peak, 600.0, 400.0);
        assert_eq!(real.rep_count, 2);
    }

    #[test]
    fn test_between_is_noop() {
        let state = at_rest();
        assert_eq!(advance(state, Posture::Between, 100.0, 400.0), state);
    }
}
