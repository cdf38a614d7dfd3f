use std::time::{Duration, Instant};

/// A trailing-edge debouncer that tracks when an action should fire
/// after a period of inactivity.
///
/// The debouncer never spawns timers itself; the owner polls it from its
/// event loop. Every method has an `_at` twin taking an explicit `Instant`
/// so callers (and tests) can drive time deterministically.
#[derive(Debug, Clone)]
pub struct Debouncer {
    /// The quiet period to wait after the last event before firing
    delay: Duration,
    /// When the last event occurred
    last_event: Option<Instant>,
    /// Whether we have a pending trigger
    pending: bool,
}

impl Debouncer {
    /// Create a new debouncer with the specified delay in milliseconds
    pub fn new(delay_ms: u64) -> Self {
        Self::with_delay(Duration::from_millis(delay_ms))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            last_event: None,
            pending: false,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Register that an event occurred, restarting the quiet period
    pub fn trigger(&mut self) {
        self.trigger_at(Instant::now());
    }

    pub fn trigger_at(&mut self, now: Instant) {
        self.last_event = Some(now);
        self.pending = true;
    }

    /// Returns true exactly once per quiet period, after it has elapsed
    pub fn should_execute(&mut self) -> bool {
        self.should_execute_at(Instant::now())
    }

    pub fn should_execute_at(&mut self, now: Instant) -> bool {
        if !self.pending {
            return false;
        }

        if let Some(last) = self.last_event {
            if now.saturating_duration_since(last) >= self.delay {
                self.pending = false;
                self.last_event = None;
                return true;
            }
        }
        false
    }

    /// Get the time remaining before the action will fire.
    /// Returns None if no action is pending.
    pub fn time_remaining(&self) -> Option<Duration> {
        self.time_remaining_at(Instant::now())
    }

    pub fn time_remaining_at(&self, now: Instant) -> Option<Duration> {
        if !self.pending {
            return None;
        }

        self.last_event
            .map(|last| self.delay.saturating_sub(now.saturating_duration_since(last)))
    }

    /// Reset the debouncer, canceling any pending action
    pub fn reset(&mut self) {
        self.last_event = None;
        self.pending = false;
    }

    /// Check if there's a pending action
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300);

        debouncer.trigger_at(start);
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(299)));
        assert!(debouncer.should_execute_at(start + Duration::from_millis(300)));
        // Only once per trigger
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(900)));
    }

    #[test]
    fn test_retrigger_restarts_timer() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300);

        debouncer.trigger_at(start);
        debouncer.trigger_at(start + Duration::from_millis(200));
        assert!(!debouncer.should_execute_at(start + Duration::from_millis(400)));
        assert!(debouncer.should_execute_at(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_time_remaining_and_reset() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(300);
        assert_eq!(debouncer.time_remaining_at(start), None);

        debouncer.trigger_at(start);
        assert_eq!(
            debouncer.time_remaining_at(start + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert_eq!(
            debouncer.time_remaining_at(start + Duration::from_millis(1000)),
            Some(Duration::ZERO)
        );

        debouncer.reset();
        assert!(!debouncer.is_pending());
        assert!(!debouncer.should_execute_at(start + Duration::from_secs(5)));
    }
}
