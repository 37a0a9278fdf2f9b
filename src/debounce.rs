use std::time::{Duration, Instant};

/// Collapses bursts of events into one: each trigger pushes the deadline out
/// by the full window, and the debouncer fires once after the last trigger
/// has been quiet for that long.
#[derive(Debug)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the debouncer as of `now`
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Returns true exactly once per armed window, when the deadline has passed
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_window() {
        let mut debounce = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();
        debounce.trigger(start);

        assert!(!debounce.fire(start));
        assert!(!debounce.fire(start + Duration::from_millis(299)));
        assert!(debounce.fire(start + Duration::from_millis(300)));
        // Already fired, stays quiet until re-armed
        assert!(!debounce.fire(start + Duration::from_millis(600)));
    }

    #[test]
    fn test_retrigger_supersedes_pending_deadline() {
        let mut debounce = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();
        debounce.trigger(start);
        debounce.trigger(start + Duration::from_millis(200));

        // The first deadline has passed but was superseded
        assert!(!debounce.fire(start + Duration::from_millis(350)));
        assert!(debounce.fire(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_cancel_disarms() {
        let mut debounce = Debouncer::new(Duration::from_millis(100));
        let start = Instant::now();
        debounce.trigger(start);
        assert!(debounce.is_armed());
        debounce.cancel();
        assert!(!debounce.is_armed());
        assert!(!debounce.fire(start + Duration::from_millis(200)));
    }
}
