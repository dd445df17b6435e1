// SPDX-License-Identifier: MPL-2.0
//! Video playback newtypes.
//!
//! This module provides type-safe wrappers for playback values,
//! ensuring they are always within valid ranges.

// =============================================================================
// PlaybackSpeed
// =============================================================================

/// Playback speed bounds (0.25x to 2.0x).
pub mod speed_bounds {
    /// Minimum playback speed.
    pub const MIN: f32 = 0.25;
    /// Maximum playback speed.
    pub const MAX: f32 = 2.0;
    /// Default playback speed (1.0 = normal speed).
    pub const DEFAULT: f32 = 1.0;
}

/// Playback speed value, guaranteed to be within valid range (0.25x - 2.0x).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSpeed(f32);

impl PlaybackSpeed {
    /// Creates a new playback speed, clamping to valid range.
    ///
    /// Non-finite values fall back to the default speed.
    #[must_use]
    pub fn new(speed: f32) -> Self {
        if !speed.is_finite() {
            return Self::default();
        }
        Self(speed.clamp(speed_bounds::MIN, speed_bounds::MAX))
    }

    /// Returns the speed value as f32.
    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns true if this is normal speed.
    #[must_use]
    pub fn is_normal(self) -> bool {
        (self.0 - speed_bounds::DEFAULT).abs() < 0.001
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(speed_bounds::DEFAULT)
    }
}

// =============================================================================
// SeekStep
// =============================================================================

/// Double-tap / button seek step bounds in seconds.
pub mod seek_step_bounds {
    /// Minimum seek step.
    pub const MIN: u32 = 1;
    /// Maximum seek step.
    pub const MAX: u32 = 60;
    /// Default seek step.
    pub const DEFAULT: u32 = 10;
}

/// Relative seek step in whole seconds, clamped to 1–60 s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeekStep(u32);

impl SeekStep {
    /// Creates a new seek step, clamping to valid range.
    #[must_use]
    pub fn new(secs: u32) -> Self {
        Self(secs.clamp(seek_step_bounds::MIN, seek_step_bounds::MAX))
    }

    #[must_use]
    pub fn secs(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_millis(self) -> u64 {
        u64::from(self.0) * 1000
    }
}

impl Default for SeekStep {
    fn default() -> Self {
        Self(seek_step_bounds::DEFAULT)
    }
}

// =============================================================================
// Progress
// =============================================================================

/// A fraction in `[0, 1]`: slider position, volume level, brightness.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Progress(f32);

impl Progress {
    pub const ZERO: Self = Self(0.0);
    pub const FULL: Self = Self(1.0);

    /// Creates a new progress value, clamping to `[0, 1]`.
    ///
    /// `NaN` maps to zero so a zero-length track height cannot poison state.
    #[must_use]
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Builds the progress of `position` within `duration`.
    #[must_use]
    pub fn of(position_ms: u64, duration_ms: u64) -> Self {
        if duration_ms == 0 {
            return Self::ZERO;
        }
        Self::new(position_ms as f32 / duration_ms as f32)
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }

    /// Returns the value as a whole percentage (truncated).
    #[must_use]
    pub fn percent(self) -> u8 {
        (self.0 * 100.0) as u8
    }

    /// Scales a duration by this fraction.
    #[must_use]
    pub fn apply_to(self, duration_ms: u64) -> u64 {
        (f64::from(self.0) * duration_ms as f64) as u64
    }
}

// =============================================================================
// AspectRatio
// =============================================================================

/// Aspect ratio bounds accepted by the Picture-in-Picture window.
pub mod aspect_bounds {
    /// Tallest accepted ratio (1 : 2.39).
    pub const MIN: f32 = 1.0 / 2.39;
    /// Widest accepted ratio (2.39 : 1).
    pub const MAX: f32 = 2.39;
    /// Fallback used when the video dimensions are unknown.
    pub const DEFAULT: f32 = 16.0 / 9.0;
}

/// Width/height ratio clamped to what a PiP request accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectRatio(f32);

impl AspectRatio {
    /// Builds a ratio from pixel dimensions, clamped to the PiP range.
    #[must_use]
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            return Self::default();
        }
        Self((width as f32 / height as f32).clamp(aspect_bounds::MIN, aspect_bounds::MAX))
    }

    #[must_use]
    pub fn value(self) -> f32 {
        self.0
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self(aspect_bounds::DEFAULT)
    }
}
