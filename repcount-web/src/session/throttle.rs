//! Frame rate cap
//!
//! Pose estimation is the bottleneck. Frames that arrive before the
//! interval has elapsed are dropped, never queued.

#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval_ms: f64,
    last_admitted_ms: Option<f64>,
}

impl FrameThrottle {
    pub fn new(target_fps: f64) -> Self {
        Self {
            interval_ms: 1000.0 / target_fps,
            last_admitted_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// True (and the frame is consumed) when enough time has passed
    pub fn admit(&mut self, now_ms: f64) -> bool {
        let due = self
            .last_admitted_ms
            .map_or(true, |last| now_ms - last >= self.interval_ms);
        if due {
            self.last_admitted_ms = Some(now_ms);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_admitted_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_always_admitted() {
        let mut throttle = FrameThrottle::new(30.0);
        assert!(throttle.admit(12345.0));
    }

    #[test]
    fn test_drops_early_frames() {
        let mut throttle = FrameThrottle::new(20.0); // 50ms
        assert!(throttle.admit(0.0));
        assert!(!throttle.admit(16.0));
        assert!(!throttle.admit(49.0));
        assert!(throttle.admit(50.0));
        // dropped frames do not push the next slot back
        assert!(!throttle.admit(66.0));
        assert!(throttle.admit(100.0));
    }

    #[test]
    fn test_reset_readmits_immediately() {
        let mut throttle = FrameThrottle::new(30.0);
        assert!(throttle.admit(0.0));
        throttle.reset();
        assert!(throttle.admit(1.0));
    }
}
