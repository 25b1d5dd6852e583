//! Trailing-edge debouncing for storage writes.
//!
//! Times are seconds since app start, so tests can drive the debouncer
//! without sleeping.

use std::time::Duration;

/// Fires once after calls stop arriving for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: f64,
    deadline: Option<f64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay: delay.as_secs_f64(),
            deadline: None,
        }
    }

    /// Schedule (or push back) the pending fire.
    pub fn schedule(&mut self, now: f64) {
        self.deadline = Some(now + self.delay);
    }

    /// Time left until the pending fire, for repaint scheduling.
    pub fn remaining(&self, now: f64) -> Option<Duration> {
        self.deadline
            .map(|deadline| Duration::from_secs_f64((deadline - now).max(0.0)))
    }

    /// Returns `true` exactly once when the deadline has passed.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the pending fire, returning whether one was pending.
    pub fn take(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));
        debouncer.schedule(0.0);
        assert!(!debouncer.poll(0.5));
        assert!(debouncer.poll(1.0));
        assert!(!debouncer.poll(2.0));
    }

    #[test]
    fn test_reschedule_pushes_deadline_back() {
        let mut debouncer = Debouncer::new(Duration::from_millis(1000));
        debouncer.schedule(0.0);
        debouncer.schedule(0.8);
        assert!(!debouncer.poll(1.2));
        assert!(debouncer.poll(1.9));
    }

    #[test]
    fn test_remaining_and_take() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        assert_eq!(debouncer.remaining(0.0), None);
        debouncer.schedule(1.0);
        assert_eq!(debouncer.remaining(1.25), Some(Duration::from_millis(250)));
        assert_eq!(debouncer.remaining(3.0), Some(Duration::ZERO));
        assert!(debouncer.take());
        assert_eq!(debouncer.remaining(3.0), None);
        assert!(!debouncer.take());
    }
}
