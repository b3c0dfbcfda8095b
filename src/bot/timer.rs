//! Deadline timer for the flee window
//!
//! Replaces a scheduled callback: the owner compares the deadline against its
//! clock every tick. Arming while armed replaces the pending deadline.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FleeTimer {
    deadline: Option<f64>,
}

impl FleeTimer {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Start a fresh window of `duration` seconds from `now`
    pub fn arm(&mut self, now: f64, duration: f32) {
        self.deadline = Some(now + f64::from(duration));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[inline]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns true once when `now` reaches the deadline, then disarms
    pub fn poll(&mut self, now: f64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Seconds left in the window (None when disarmed)
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.deadline.map(|deadline| (deadline - now).max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_at_deadline() {
        let mut timer = FleeTimer::new();
        timer.arm(0.0, 1.0);
        assert!(!timer.poll(0.5));
        assert!(timer.poll(1.0));
        assert!(!timer.is_armed());
        assert!(!timer.poll(2.0));
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let mut timer = FleeTimer::new();
        timer.arm(0.0, 1.0);
        timer.arm(0.5, 1.0);
        assert!(!timer.poll(1.2));
        assert_eq!(timer.remaining(1.2).map(|r| (r * 10.0).round()), Some(3.0));
        assert!(timer.poll(1.5));
    }

    #[test]
    fn test_cancel_disarms() {
        let mut timer = FleeTimer::new();
        timer.arm(0.0, 1.0);
        timer.cancel();
        assert!(!timer.poll(5.0));
        assert_eq!(timer.remaining(5.0), None);
    }

    #[test]
    fn test_zero_duration_fires_next_poll() {
        let mut timer = FleeTimer::new();
        timer.arm(2.0, 0.0);
        assert!(timer.poll(2.0));
    }
}
