// SPDX-License-Identifier: MPL-2.0
//! Video playback domain types.
//!
//! This module contains playback value objects and enums that are
//! independent of any presentation or infrastructure concerns.

pub mod newtypes;
pub mod playback;
pub mod repeat;

// Re-export commonly used types
pub use newtypes::{AspectRatio, PlaybackSpeed, Progress, SeekStep};
pub use playback::PlaybackState;
pub use repeat::{EngineRepeat, RepeatMode};
