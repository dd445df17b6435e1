// SPDX-License-Identifier: MPL-2.0
//! Touch gestures on the video surface: double-tap seek and vertical
//! volume/brightness drags.

use crate::config::{DRAG_BAND_BOTTOM, DRAG_BAND_TOP};
use crate::domain::video::{Progress, SeekStep};

/// Which way a double-tap seek goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    Backward,
    Forward,
}

impl SeekDirection {
    /// Left half seeks backward, right half forward.
    #[must_use]
    pub fn from_tap(x_fraction: f32) -> Self {
        if x_fraction < 0.5 {
            SeekDirection::Backward
        } else {
            SeekDirection::Forward
        }
    }
}

/// Computes the target of a step seek, clamped to `[0, duration]`.
///
/// Returns `None` when the position is already at the boundary in that
/// direction, in which case nothing should happen.
#[must_use]
pub fn step_seek_target(
    position_ms: u64,
    duration_ms: u64,
    step: SeekStep,
    direction: SeekDirection,
) -> Option<u64> {
    let position = position_ms.min(duration_ms);
    let target = match direction {
        SeekDirection::Backward => position.saturating_sub(step.as_millis()),
        SeekDirection::Forward => position.saturating_add(step.as_millis()).min(duration_ms),
    };
    (target != position).then_some(target)
}

/// Transient "seeking" indicator shown after a double tap.
///
/// Cleared when the engine next reports ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeekFlash {
    active: Option<SeekDirection>,
}

impl SeekFlash {
    pub fn set(&mut self, direction: SeekDirection) {
        self.active = Some(direction);
    }

    #[must_use]
    pub fn active(&self) -> Option<SeekDirection> {
        self.active
    }

    /// Clears the flash. Returns true if one was showing.
    pub fn clear(&mut self) -> bool {
        self.active.take().is_some()
    }
}

/// What a vertical drag adjusts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragTarget {
    Volume,
    Brightness,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveDrag {
    target: DragTarget,
    progress: Progress,
}

/// Vertical drag on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct DragGesture {
    active: Option<ActiveDrag>,
    track_height_px: f32,
}

impl DragGesture {
    #[must_use]
    pub fn new(track_height_px: f32) -> Self {
        Self {
            active: None,
            track_height_px,
        }
    }

    /// Target a drag starting at this point would adjust.
    ///
    /// Drags starting outside the middle band of the surface are ignored so
    /// they do not fight the system edge gestures.
    #[must_use]
    pub fn target_at(x_fraction: f32, y_fraction: f32) -> Option<DragTarget> {
        if !(DRAG_BAND_TOP..=DRAG_BAND_BOTTOM).contains(&y_fraction) {
            return None;
        }
        Some(if x_fraction < 0.5 {
            DragTarget::Volume
        } else {
            DragTarget::Brightness
        })
    }

    /// Starts a drag seeded with the current system value.
    pub fn begin(&mut self, target: DragTarget, seed: Progress) {
        self.active = Some(ActiveDrag {
            target,
            progress: seed,
        });
    }

    #[must_use]
    pub fn active_target(&self) -> Option<DragTarget> {
        self.active.map(|drag| drag.target)
    }

    #[must_use]
    pub fn progress(&self) -> Option<Progress> {
        self.active.map(|drag| drag.progress)
    }

    /// Applies a vertical movement; dragging up (negative `delta_y_px`) raises the value.
    ///
    /// Returns the new value to apply, or `None` when no drag is active.
    pub fn update(&mut self, delta_y_px: f32) -> Option<(DragTarget, Progress)> {
        let drag = self.active.as_mut()?;
        let change = -delta_y_px / self.track_height_px;
        drag.progress = Progress::new(drag.progress.value() + change);
        Some((drag.target, drag.progress))
    }

    /// Ends the drag and returns its last value.
    pub fn end(&mut self) -> Option<(DragTarget, Progress)> {
        self.active
            .take()
            .map(|drag| (drag.target, drag.progress))
    }
}
