// SPDX-License-Identifier: MPL-2.0
//! Host window / system port definition.
//!
//! Everything the player needs from the surrounding platform that is not the
//! media engine itself: system volume, window brightness, Picture-in-Picture,
//! screen orientation, and user-facing notices.

use crate::domain::media::MediaUri;
use crate::domain::video::{AspectRatio, Progress};
use crate::error::VideoError;

/// Orientation requested from the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenOrientation {
    /// Let the device sensor decide.
    #[default]
    FollowSensor,
    Landscape,
    Portrait,
}

/// Video surface bounds in window pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl SurfaceRect {
    #[must_use]
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left).max(0) as u32
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).max(0) as u32
    }
}

/// The single remote action offered in the PiP window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipAction {
    Play,
    Pause,
}

/// Snapshot of Picture-in-Picture parameters.
///
/// The action set is not reactive; it must be rebuilt and resubmitted
/// whenever the playing state changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipParams {
    pub source_rect: Option<SurfaceRect>,
    pub aspect: AspectRatio,
    pub action: PipAction,
}

/// User-facing notices raised by the player.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The current item cannot be played.
    PlaybackFailed(VideoError),
    /// No external application can open the item.
    NoExternalViewer,
}

impl Notice {
    /// Localization key the host shows for this notice.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            Notice::PlaybackFailed(error) => error.message_key(),
            Notice::NoExternalViewer => "error-no-external-viewer",
        }
    }
}

/// Port for the platform hosting the player screen.
pub trait PlayerHost: Send {
    fn system_volume(&self) -> Progress;
    fn set_system_volume(&mut self, level: Progress);

    fn brightness(&self) -> Progress;
    fn set_brightness(&mut self, level: Progress);

    /// Requests Picture-in-Picture mode. Returns false if the platform refused.
    fn enter_pip(&mut self, params: &PipParams) -> bool;

    /// Replaces the parameters of the active PiP window.
    fn update_pip(&mut self, params: &PipParams);

    fn request_orientation(&mut self, orientation: ScreenOrientation);

    /// Whether the window is currently laid out in landscape.
    fn screen_is_landscape(&self) -> bool;
    fn set_keep_screen_on(&mut self, keep_on: bool);

    /// Hides (`true`) or shows the system bars.
    fn set_immersive(&mut self, immersive: bool);

    fn notify(&mut self, notice: Notice);

    /// Offers the item to an external viewer. Returns false if none can handle `mime_type`.
    fn open_external(&mut self, uri: &MediaUri, mime_type: &str) -> bool;

    /// Closes the player screen.
    fn finish(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn PlayerHost) {}

    #[test]
    fn notices_map_to_message_keys() {
        assert_eq!(
            Notice::PlaybackFailed(VideoError::CorruptedFile).message_key(),
            "error-play-video-corrupted"
        );
        assert_eq!(
            Notice::PlaybackFailed(VideoError::from_message("moov atom not found")).message_key(),
            "error-play-video-io"
        );
        assert_eq!(Notice::NoExternalViewer.message_key(), "error-no-external-viewer");
    }

    #[test]
    fn surface_rect_dimensions_never_go_negative() {
        let rect = SurfaceRect::new(10, 20, 1930, 1100);
        assert_eq!(rect.width(), 1920);
        assert_eq!(rect.height(), 1080);

        let inverted = SurfaceRect::new(100, 100, 0, 0);
        assert_eq!(inverted.width(), 0);
        assert_eq!(inverted.height(), 0);
    }
}
