// SPDX-License-Identifier: MPL-2.0
//! Slider position tracking.
//!
//! The session polls the engine every [`PROGRESS_TICK_MS`] while the tracker
//! runs. Start and stop are idempotent, so there is at most one sampling
//! loop. While the user drags the slider, samples are ignored and the
//! slider follows the finger instead.
//!
//! [`PROGRESS_TICK_MS`]: crate::config::PROGRESS_TICK_MS

use crate::domain::video::Progress;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressTracker {
    running: bool,
    scrubbing: bool,
    position_ms: u64,
    progress: Progress,
}

impl ProgressTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts sampling. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        !std::mem::replace(&mut self.running, true)
    }

    /// Stops sampling. Returns false if it was not running.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn is_scrubbing(&self) -> bool {
        self.scrubbing
    }

    #[must_use]
    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Records an engine sample. Ignored while stopped or scrubbing.
    ///
    /// Returns true if the displayed values changed.
    pub fn sample(&mut self, position_ms: u64, duration_ms: u64) -> bool {
        if !self.running || self.scrubbing {
            return false;
        }
        self.set(position_ms, duration_ms)
    }

    /// Re-syncs the slider to the engine outside the sampling loop.
    pub fn resync(&mut self, position_ms: u64, duration_ms: u64) {
        self.set(position_ms, duration_ms);
    }

    /// Slider back to zero.
    pub fn reset(&mut self) {
        self.position_ms = 0;
        self.progress = Progress::ZERO;
    }

    pub fn scrub_start(&mut self) {
        self.scrubbing = true;
    }

    /// Moves the slider to `value` and shows the matching time.
    pub fn scrub_change(&mut self, value: Progress, duration_ms: u64) {
        self.progress = value;
        self.position_ms = value.apply_to(duration_ms);
    }

    /// Ends the drag and returns the position to seek to.
    pub fn scrub_finish(&mut self, duration_ms: u64) -> u64 {
        self.scrubbing = false;
        self.position_ms = self.progress.apply_to(duration_ms);
        self.position_ms
    }

    fn set(&mut self, position_ms: u64, duration_ms: u64) -> bool {
        let progress = Progress::of(position_ms, duration_ms);
        let changed = self.position_ms != position_ms || self.progress != progress;
        self.position_ms = position_ms;
        self.progress = progress;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;

    #[test]
    fn start_and_stop_are_idempotent() {
        let mut tracker = ProgressTracker::new();
        assert!(tracker.start());
        assert!(!tracker.start());
        assert!(tracker.stop());
        assert!(!tracker.stop());
    }

    #[test]
    fn samples_need_a_running_tracker() {
        let mut tracker = ProgressTracker::new();
        assert!(!tracker.sample(1_000, 10_000));
        tracker.start();
        assert!(tracker.sample(1_000, 10_000));
        assert_abs_diff_eq!(tracker.progress().value(), 0.1, epsilon = 1e-6);
    }

    #[test]
    fn scrubbing_suppresses_samples() {
        let mut tracker = ProgressTracker::new();
        tracker.start();
        tracker.scrub_start();
        tracker.scrub_change(Progress::new(0.5), 10_000);
        assert!(!tracker.sample(9_000, 10_000));
        assert_eq!(tracker.position_ms(), 5_000);

        assert_eq!(tracker.scrub_finish(10_000), 5_000);
        assert!(tracker.sample(5_100, 10_000));
    }

    #[test]
    fn zero_duration_keeps_progress_at_zero() {
        let mut tracker = ProgressTracker::new();
        tracker.resync(4_000, 0);
        assert_eq!(tracker.progress(), Progress::ZERO);
        assert_eq!(tracker.position_ms(), 4_000);
    }
}
