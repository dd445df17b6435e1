// SPDX-License-Identifier: MPL-2.0
//! Playback state of the player screen.
//!
//! States are coarse: finer modes (controls visible, orientation lock,
//! audio-only, Picture-in-Picture) are orthogonal flags kept alongside.

/// Represents the current playback state of the active item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// The playlist is being resolved and the engine prepared.
    #[default]
    Loading,
    /// The engine holds no prepared media.
    Idle,
    /// The engine is waiting for data (initial load or after a seek).
    Buffering,
    /// Media is playing.
    Playing,
    /// Media is ready but not playing.
    Paused,
    /// The end of the playlist was reached.
    Ended,
    /// The engine reported an unrecoverable error for the item.
    Error,
}

impl PlaybackState {
    /// Returns true if media is currently playing.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if media is paused.
    #[must_use]
    pub fn is_paused(self) -> bool {
        matches!(self, Self::Paused)
    }

    /// Returns true while the player is still loading the playlist.
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true if the item failed to play.
    #[must_use]
    pub fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }

    /// Returns true if playback is running or about to run.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Playing | Self::Buffering)
    }
}
