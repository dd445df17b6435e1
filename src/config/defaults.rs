// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used across the application. Constants are organized by category.
//!
//! # Categories
//!
//! - **Controls**: Player controls auto-hide timeout
//! - **Seek**: Double-tap / button seek step
//! - **Gestures**: Vertical drag band and overlay flash windows
//! - **Progress**: Playback position sampling interval
//! - **Audio**: Loudness gain bounds
//! - **Picture-in-Picture**: Accepted aspect ratios
//! - **Thumbnails**: Decode bound and cache capacity

use crate::domain::video::newtypes::{aspect_bounds, seek_step_bounds, speed_bounds};

// ==========================================================================
// Controls Defaults
// ==========================================================================

/// Default quiescent interval before player controls hide (in milliseconds).
pub const DEFAULT_CONTROLS_TIMEOUT_MS: u64 = 5000;

/// Minimum controls timeout (in milliseconds).
pub const MIN_CONTROLS_TIMEOUT_MS: u64 = 1000;

/// Maximum controls timeout (in milliseconds).
pub const MAX_CONTROLS_TIMEOUT_MS: u64 = 30_000;

// ==========================================================================
// Seek Defaults
// ==========================================================================

/// Default relative seek step (in seconds).
pub const DEFAULT_SEEK_STEP_SECS: u32 = seek_step_bounds::DEFAULT;

/// Minimum seek step (in seconds).
pub const MIN_SEEK_STEP_SECS: u32 = seek_step_bounds::MIN;

/// Maximum seek step (in seconds).
pub const MAX_SEEK_STEP_SECS: u32 = seek_step_bounds::MAX;

// ==========================================================================
// Playback Speed Defaults
// ==========================================================================

/// Default playback speed.
pub const DEFAULT_PLAYBACK_SPEED: f32 = speed_bounds::DEFAULT;

/// Minimum playback speed.
pub const MIN_PLAYBACK_SPEED: f32 = speed_bounds::MIN;

/// Maximum playback speed.
pub const MAX_PLAYBACK_SPEED: f32 = speed_bounds::MAX;

// ==========================================================================
// Gesture Defaults
// ==========================================================================

/// Top edge of the band where a vertical drag may start (fraction of height).
pub const DRAG_BAND_TOP: f32 = 0.40;

/// Bottom edge of the band where a vertical drag may start (fraction of height).
pub const DRAG_BAND_BOTTOM: f32 = 0.70;

/// Default vertical distance (in pixels) that maps to the full `[0, 1]` range.
pub const DEFAULT_DRAG_TRACK_HEIGHT_PX: f32 = 400.0;

/// Minimum drag track height (in pixels).
pub const MIN_DRAG_TRACK_HEIGHT_PX: f32 = 50.0;

/// How long the drag overlay stays visible after the finger lifts (in milliseconds).
pub const POST_DRAG_FLASH_MS: u64 = 1000;

/// Default hardware volume-key overlay window (in milliseconds).
pub const DEFAULT_VOLUME_FLASH_MS: u64 = 3000;

/// Minimum volume-key overlay window (in milliseconds).
pub const MIN_VOLUME_FLASH_MS: u64 = 500;

/// Maximum volume-key overlay window (in milliseconds).
pub const MAX_VOLUME_FLASH_MS: u64 = 10_000;

// ==========================================================================
// Progress Defaults
// ==========================================================================

/// Interval of the cooperative playback position sampler (in milliseconds).
pub const PROGRESS_TICK_MS: u64 = 33;

// ==========================================================================
// Audio Defaults
// ==========================================================================

/// Minimum loudness enhancer gain (in millibels).
pub const MIN_LOUDNESS_GAIN_MB: i32 = 0;

/// Maximum loudness enhancer gain (in millibels).
pub const MAX_LOUDNESS_GAIN_MB: i32 = 1500;

// ==========================================================================
// Picture-in-Picture Defaults
// ==========================================================================

/// Narrowest aspect ratio accepted by a PiP request.
pub const MIN_PIP_ASPECT: f32 = aspect_bounds::MIN;

/// Widest aspect ratio accepted by a PiP request.
pub const MAX_PIP_ASPECT: f32 = aspect_bounds::MAX;

// ==========================================================================
// Thumbnail Defaults
// ==========================================================================

/// Longest edge of a decoded thumbnail (in pixels).
pub const THUMBNAIL_MAX_EDGE_PX: u32 = 300;

/// Number of decoded thumbnails kept in memory.
pub const THUMBNAIL_CACHE_CAPACITY: usize = 256;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Controls timeout validation
    assert!(MIN_CONTROLS_TIMEOUT_MS > 0);
    assert!(MAX_CONTROLS_TIMEOUT_MS >= MIN_CONTROLS_TIMEOUT_MS);
    assert!(DEFAULT_CONTROLS_TIMEOUT_MS >= MIN_CONTROLS_TIMEOUT_MS);
    assert!(DEFAULT_CONTROLS_TIMEOUT_MS <= MAX_CONTROLS_TIMEOUT_MS);

    // Seek step validation
    assert!(MIN_SEEK_STEP_SECS > 0);
    assert!(DEFAULT_SEEK_STEP_SECS >= MIN_SEEK_STEP_SECS);
    assert!(DEFAULT_SEEK_STEP_SECS <= MAX_SEEK_STEP_SECS);

    // Speed validation
    assert!(MIN_PLAYBACK_SPEED > 0.0);
    assert!(DEFAULT_PLAYBACK_SPEED >= MIN_PLAYBACK_SPEED);
    assert!(DEFAULT_PLAYBACK_SPEED <= MAX_PLAYBACK_SPEED);

    // Gesture validation
    assert!(DRAG_BAND_TOP >= 0.0);
    assert!(DRAG_BAND_TOP < DRAG_BAND_BOTTOM);
    assert!(DRAG_BAND_BOTTOM <= 1.0);
    assert!(MIN_DRAG_TRACK_HEIGHT_PX > 0.0);
    assert!(DEFAULT_DRAG_TRACK_HEIGHT_PX >= MIN_DRAG_TRACK_HEIGHT_PX);
    assert!(POST_DRAG_FLASH_MS > 0);
    assert!(MIN_VOLUME_FLASH_MS > 0);
    assert!(DEFAULT_VOLUME_FLASH_MS >= MIN_VOLUME_FLASH_MS);
    assert!(DEFAULT_VOLUME_FLASH_MS <= MAX_VOLUME_FLASH_MS);

    // Progress sampling validation
    assert!(PROGRESS_TICK_MS > 0);

    // Loudness validation
    assert!(MIN_LOUDNESS_GAIN_MB >= 0);
    assert!(MAX_LOUDNESS_GAIN_MB > MIN_LOUDNESS_GAIN_MB);

    // PiP validation
    assert!(MIN_PIP_ASPECT > 0.0);
    assert!(MIN_PIP_ASPECT < 1.0);
    assert!(MAX_PIP_ASPECT > 1.0);

    // Thumbnail validation
    assert!(THUMBNAIL_MAX_EDGE_PX > 0);
    assert!(THUMBNAIL_CACHE_CAPACITY > 0);
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controls_timeout_defaults_are_valid() {
        assert_eq!(DEFAULT_CONTROLS_TIMEOUT_MS, 5000);
        assert!(DEFAULT_CONTROLS_TIMEOUT_MS >= MIN_CONTROLS_TIMEOUT_MS);
        assert!(DEFAULT_CONTROLS_TIMEOUT_MS <= MAX_CONTROLS_TIMEOUT_MS);
    }

    #[test]
    fn seek_step_defaults_match_domain_bounds() {
        assert_eq!(DEFAULT_SEEK_STEP_SECS, 10);
        assert_eq!(MIN_SEEK_STEP_SECS, seek_step_bounds::MIN);
        assert_eq!(MAX_SEEK_STEP_SECS, seek_step_bounds::MAX);
    }

    #[test]
    fn gesture_defaults_are_valid() {
        assert_eq!(DEFAULT_VOLUME_FLASH_MS, 3000);
        assert!(POST_DRAG_FLASH_MS < DEFAULT_VOLUME_FLASH_MS);
        assert!(DRAG_BAND_TOP < DRAG_BAND_BOTTOM);
    }

    #[test]
    fn progress_tick_is_roughly_thirty_hertz() {
        assert_eq!(PROGRESS_TICK_MS, 33);
    }

    #[test]
    fn pip_aspect_range_is_reciprocal() {
        assert!((MIN_PIP_ASPECT * MAX_PIP_ASPECT - 1.0).abs() < 1e-6);
    }
}
