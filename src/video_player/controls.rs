// SPDX-License-Identifier: MPL-2.0
//! Player controls visibility with auto-hide.

use super::timer::OneShotTimer;
use std::time::Duration;
use tokio::time::Instant;

/// Visible/hidden state of the player controls.
///
/// While visible and playing, a single hide deadline is pending; every
/// interaction pushes it back. While paused no deadline is kept and the
/// controls stay up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsVisibility {
    visible: bool,
    hide_timer: OneShotTimer,
    timeout: Duration,
}

impl ControlsVisibility {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            visible: false,
            hide_timer: OneShotTimer::new(),
            timeout,
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn hide_deadline(&self) -> Option<Instant> {
        self.hide_timer.deadline()
    }

    /// Shows the controls and restarts the hide countdown.
    pub fn show(&mut self, now: Instant, paused: bool) {
        self.visible = true;
        self.reschedule(now, paused);
    }

    /// Hides immediately. Returns true if the controls were visible.
    pub fn hide(&mut self) -> bool {
        self.hide_timer.cancel();
        std::mem::replace(&mut self.visible, false)
    }

    /// Tap on the surface: show when hidden, hide when shown.
    ///
    /// Returns the new visibility.
    pub fn toggle(&mut self, now: Instant, paused: bool) -> bool {
        if self.visible {
            self.hide();
        } else {
            self.show(now, paused);
        }
        self.visible
    }

    /// Any interaction with visible controls postpones the hide.
    pub fn touch(&mut self, now: Instant, paused: bool) {
        if self.visible {
            self.reschedule(now, paused);
        }
    }

    /// Pausing suspends auto-hide; resuming restarts it.
    pub fn on_paused_changed(&mut self, now: Instant, paused: bool) {
        if self.visible {
            self.reschedule(now, paused);
        }
    }

    /// Returns true when the controls were auto-hidden by this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.hide_timer.fire_if_due(now) {
            self.visible = false;
            true
        } else {
            false
        }
    }

    fn reschedule(&mut self, now: Instant, paused: bool) {
        if paused {
            self.hide_timer.cancel();
        } else {
            self.hide_timer.schedule(now, self.timeout);
        }
    }
}
