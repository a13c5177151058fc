//! Retry backoff and tracking-loss grace window

// ============================================================================
// RETRY POLICY
// ============================================================================

/// Bounded exponential backoff for camera / model acquisition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay_ms: f64,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay_ms: f64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
        }
    }

    /// Delay before the next attempt after `failed_attempt` (1-based)
    /// failed, or `None` once the retries are used up
    pub fn delay_after(&self, failed_attempt: u32) -> Option<f64> {
        if failed_attempt == 0 || failed_attempt > self.max_retries {
            return None;
        }
        let exponent = (failed_attempt - 1).min(30) as i32;
        Some(self.base_delay_ms * 2f64.powi(exponent))
    }
}

// ============================================================================
// TRACKING MONITOR
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackingVerdict {
    /// Lost for this long, still within the grace window
    Tolerated { lost_for_ms: f64 },
    /// Grace window exceeded; tear down and reacquire
    Expired,
}

/// Tracks how long no usable pose has been seen
#[derive(Debug, Clone)]
pub struct TrackingMonitor {
    grace_ms: f64,
    lost_since_ms: Option<f64>,
}

impl TrackingMonitor {
    pub fn new(grace_ms: f64) -> Self {
        Self {
            grace_ms,
            lost_since_ms: None,
        }
    }

    pub fn is_lost(&self) -> bool {
        self.lost_since_ms.is_some()
    }

    /// Frame had a usable pose
    pub fn found(&mut self) {
        self.lost_since_ms = None;
    }

    /// Frame had no usable pose
    pub fn lost(&mut self, now_ms: f64) -> TrackingVerdict {
        let since = *self.lost_since_ms.get_or_insert(now_ms);
        let lost_for_ms = now_ms - since;
        if lost_for_ms > self.grace_ms {
            self.lost_since_ms = None;
            TrackingVerdict::Expired
        } else {
            TrackingVerdict::Tolerated { lost_for_ms }
        }
    }

    pub fn reset(&mut self) {
        self.lost_since_ms = None;
    }
}
