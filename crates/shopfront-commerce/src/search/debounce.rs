//! Trailing-edge debouncer driven by an injected clock.

use std::time::{Duration, Instant};

/// Default delay between the last keystroke and the search request.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Holds the latest value until it has been quiet for `delay`.
///
/// Each [`push`](Debouncer::push) restarts the window. Time is passed in
/// by the caller, so the debouncer never sleeps or spawns.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the window at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// When the pending value becomes ready, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at + self.delay)
    }

    /// Take the pending value once the window has elapsed.
    pub fn ready(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Take the pending value regardless of the window.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_fires_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.push("a", t0);

        assert_eq!(d.ready(t0 + ms(499)), None);
        assert_eq!(d.ready(t0 + ms(500)), Some("a"));
        assert!(!d.is_pending());
        assert_eq!(d.ready(t0 + ms(1000)), None);
    }

    #[test]
    fn test_push_restarts_window_and_keeps_latest() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(ms(500));
        d.push("a", t0);
        d.push("ab", t0 + ms(100));
        d.push("abc", t0 + ms(200));

        assert_eq!(d.ready(t0 + ms(600)), None);
        assert_eq!(d.deadline(), Some(t0 + ms(700)));
        assert_eq!(d.ready(t0 + ms(700)), Some("abc"));
    }

    #[test]
    fn test_flush_and_cancel() {
        let t0 = Instant::now();
        let mut d = Debouncer::<&str>::default();
        assert_eq!(d.delay(), DEFAULT_DEBOUNCE);

        d.push("x", t0);
        assert_eq!(d.flush(), Some("x"));

        d.push("y", t0);
        d.cancel();
        assert_eq!(d.ready(t0 + ms(10_000)), None);
    }
}
