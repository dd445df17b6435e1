// SPDX-License-Identifier: MPL-2.0
//! Deadline-based timers owned by the player loop.
//!
//! The loop never spawns a task per timer. Each timer is a deadline; the
//! session sleeps until the earliest one and then calls `tick`. Scheduling
//! replaces any pending deadline, so there is never more than one
//! outstanding instance per timer.

use std::time::Duration;
use tokio::time::Instant;

/// A single-shot timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShotTimer {
    deadline: Option<Instant>,
}

impl OneShotTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)starts the timer to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true exactly once when the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A value shown for a limited time, e.g. a volume overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Flash<T> {
    value: Option<T>,
    timer: OneShotTimer,
}

impl<T> Default for Flash<T> {
    fn default() -> Self {
        Self {
            value: None,
            timer: OneShotTimer::new(),
        }
    }
}

impl<T> Flash<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `value` for `duration`, replacing anything already shown.
    pub fn show(&mut self, now: Instant, value: T, duration: Duration) {
        self.value = Some(value);
        self.timer.schedule(now, duration);
    }

    pub fn cancel(&mut self) {
        self.value = None;
        self.timer.cancel();
    }

    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.value.is_some()
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Hides the value once its time is up. Returns true if it was hidden.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.timer.fire_if_due(now) {
            self.value = None;
            true
        } else {
            false
        }
    }
}

/// Earliest of a set of optional deadlines.
#[must_use]
pub fn earliest(deadlines: impl IntoIterator<Item = Option<Instant>>) -> Option<Instant> {
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIDE: Duration = Duration::from_millis(5000);

    #[test]
    fn rescheduling_leaves_one_pending_deadline() {
        let t0 = Instant::now();
        let mut timer = OneShotTimer::new();
        timer.schedule(t0, HIDE);
        timer.schedule(t0 + Duration::from_millis(2000), HIDE);

        assert!(!timer.fire_if_due(t0 + Duration::from_millis(5000)));
        assert!(timer.fire_if_due(t0 + Duration::from_millis(7000)));
        assert!(!timer.fire_if_due(t0 + Duration::from_millis(9000)));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let t0 = Instant::now();
        let mut timer = OneShotTimer::new();
        timer.schedule(t0, HIDE);
        timer.cancel();
        assert!(!timer.is_pending());
        assert!(!timer.fire_if_due(t0 + HIDE * 2));
    }

    #[test]
    fn flash_hides_after_duration() {
        let t0 = Instant::now();
        let mut flash = Flash::new();
        flash.show(t0, 42u8, Duration::from_millis(1000));
        assert_eq!(flash.value(), Some(&42));

        assert!(!flash.tick(t0 + Duration::from_millis(999)));
        assert!(flash.tick(t0 + Duration::from_millis(1000)));
        assert!(!flash.is_visible());
    }

    #[test]
    fn earliest_skips_idle_timers() {
        let t0 = Instant::now();
        let later = t0 + HIDE;
        assert_eq!(earliest([None, Some(later), Some(t0)]), Some(t0));
        assert_eq!(earliest([None, None]), None);
    }
}
