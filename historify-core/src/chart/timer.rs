//! Owned, cancellable auto-refresh timer polled from the event loop tick.

use std::time::{Duration, Instant};

pub const REFRESH_INTERVAL: Duration = Duration::from_millis(30_000);

/// Repeating timer. Arming does not start the clock; the first `poll` after
/// arming does, so callers never pass a time except when polling.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    armed: bool,
    next_due: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            armed: false,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        self.armed = true;
        self.next_due = None;
    }

    /// Restart the period if armed; no-op otherwise.
    pub fn rearm(&mut self) {
        if self.armed {
            self.next_due = None;
        }
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.next_due = None;
    }

    /// True when the period has elapsed; reschedules from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.armed {
            return false;
        }
        match self.next_due {
            None => {
                self.next_due = Some(now + self.interval);
                false
            }
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            Some(_) => false,
        }
    }

    /// Time left until the next fire, once the clock has started.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

impl Default for RefreshTimer {
    fn default() -> Self {
        Self::new(REFRESH_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let t0 = Instant::now();
        let mut timer = RefreshTimer::default();
        timer.arm();
        assert!(!timer.poll(t0));
        assert!(!timer.poll(t0 + Duration::from_secs(29)));
        assert!(timer.poll(t0 + Duration::from_secs(30)));
        assert!(!timer.poll(t0 + Duration::from_secs(31)));
        assert!(timer.poll(t0 + Duration::from_secs(60)));
    }

    #[test]
    fn disarmed_never_fires() {
        let t0 = Instant::now();
        let mut timer = RefreshTimer::default();
        assert!(!timer.poll(t0));
        timer.arm();
        timer.poll(t0);
        timer.disarm();
        assert!(!timer.poll(t0 + Duration::from_secs(90)));
        assert!(timer.remaining(t0).is_none());
    }

    #[test]
    fn rearm_restarts_period() {
        let t0 = Instant::now();
        let mut timer = RefreshTimer::default();
        timer.arm();
        timer.poll(t0);
        timer.rearm();
        assert!(!timer.poll(t0 + Duration::from_secs(25)));
        assert!(!timer.poll(t0 + Duration::from_secs(30)));
        assert!(timer.poll(t0 + Duration::from_secs(55)));
    }
}
