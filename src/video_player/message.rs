// SPDX-License-Identifier: MPL-2.0
//! Inputs of the player state machine.

use crate::application::port::SurfaceRect;
use crate::domain::media::{MediaUri, SubtitleFile, TrackId};
use crate::domain::video::{PlaybackSpeed, Progress, RepeatMode};

/// Remote playback controls (Picture-in-Picture actions).
///
/// May arrive at any time, including right before teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    Play,
    Pause,
    Close,
}

/// User and lifecycle input for the player.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerMessage {
    /// Single tap on the video surface.
    SurfaceTapped,
    /// Double tap; `x_fraction` is the horizontal tap position in `[0, 1]`.
    DoubleTapped { x_fraction: f32 },
    /// Vertical drag started at a point given as surface fractions.
    DragStarted { x_fraction: f32, y_fraction: f32 },
    /// Vertical drag moved by `delta_y_px` since the last update.
    DragMoved { delta_y_px: f32 },
    DragEnded,

    TogglePlayPause,
    SeekForward,
    SeekBackward,
    NextItem,
    PreviousItem,

    ScrubStarted,
    ScrubChanged(Progress),
    ScrubFinished,

    SetRepeatMode(RepeatMode),
    SetSpeed(PlaybackSpeed),
    ToggleMute,
    /// Loudness boost in millibels.
    SetLoudnessGain(i32),
    ToggleAudioOnly,
    SetSubtitlesEnabled(bool),
    SelectAudioTrack(TrackId),
    SelectSubtitleTrack(TrackId),
    /// Attach a local subtitle file to the current item.
    SelectLocalSubtitle(MediaUri),
    /// The list of subtitle files on the device changed.
    SubtitleFilesChanged(Vec<SubtitleFile>),

    RotatePressed,
    ToggleOrientationLock,
    /// Raw rotation sensor angle in degrees; negative when unknown.
    DeviceRotated { degrees: i32 },

    /// The video surface was laid out at these window bounds.
    SurfaceLaidOut(SurfaceRect),
    /// The user is leaving the app (home button, recents).
    UserLeaveHint,
    PipModeChanged(bool),
    /// The screen is no longer visible.
    Backgrounded,
    /// The screen became visible again.
    Resumed,
    Control(ControlSignal),
}
