use std::time::{Duration, Instant};

pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60 * 60 * 1000;

/// Fixed-interval refresh timer: due immediately, then once per interval.
#[derive(Debug, Clone)]
pub struct RefreshSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RefreshSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_due.map_or(true, |due| now >= due)
    }

    /// Records a tick. The next one is an interval from `now`, whether or not
    /// this tick actually started a fetch.
    pub fn mark_fired(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
            .unwrap_or(Duration::ZERO)
    }
}
