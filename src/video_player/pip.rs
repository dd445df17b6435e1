// SPDX-License-Identifier: MPL-2.0
//! Picture-in-Picture parameters.
//!
//! The platform takes a snapshot of the parameters, including the single
//! play/pause action. Whenever the playing state changes while in PiP the
//! parameters must be rebuilt and resubmitted.

use crate::application::port::{PipAction, PipParams, SurfaceRect};
use crate::domain::video::AspectRatio;

/// Tracks the PiP window and the inputs of its parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipController {
    active: bool,
    surface: Option<SurfaceRect>,
    video_size: (u32, u32),
}

impl PipController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Records the on-screen bounds of the video surface.
    pub fn set_surface(&mut self, surface: SurfaceRect) {
        self.surface = Some(surface);
    }

    pub fn set_video_size(&mut self, width: u32, height: u32) {
        self.video_size = (width, height);
    }

    /// Builds parameters for the current state.
    ///
    /// The action offered is the opposite of what is happening now.
    #[must_use]
    pub fn params(&self, is_playing: bool) -> PipParams {
        let (width, height) = self.video_size;
        PipParams {
            source_rect: self.surface,
            aspect: AspectRatio::from_dimensions(width, height),
            action: if is_playing {
                PipAction::Pause
            } else {
                PipAction::Play
            },
        }
    }
}
