// SPDX-License-Identifier: MPL-2.0
//! Video probing port definition.
//!
//! Catalog adapters that read plain files need container metadata and a
//! preview frame; this port keeps the decoder library out of the catalog.

use crate::domain::media::Thumbnail;
use crate::error::VideoError;
use std::path::Path;

/// Container-level facts about a video file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbedVideo {
    pub width: u32,
    pub height: u32,
    pub duration_ms: u64,
}

/// Port for reading video metadata and preview frames.
pub trait VideoProbe: Send + Sync {
    /// Reads dimensions and duration without decoding frames.
    ///
    /// # Errors
    ///
    /// Returns a [`VideoError`] if the file cannot be opened or has no video stream.
    fn probe(&self, path: &Path) -> Result<ProbedVideo, VideoError>;

    /// Decodes the first frame, scaled so its longest edge is at most `max_edge`.
    ///
    /// # Errors
    ///
    /// Returns a [`VideoError`] if no frame can be decoded.
    fn thumbnail(&self, path: &Path, max_edge: u32) -> Result<Thumbnail, VideoError>;
}
