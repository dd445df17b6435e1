// SPDX-License-Identifier: MPL-2.0
//! Library and media descriptors.

pub mod playlist;
pub mod tracks;
pub mod types;

pub use playlist::PlaylistContext;
pub use tracks::{AudioTrack, SubtitleTrack, TrackFormat, TrackGroup, TrackId, TrackKind};
pub use types::{
    detect_subtitle_mime, is_subtitle_file, GroupKey, MediaUri, SubtitleFile, Thumbnail, VideoId,
    VideoRecord, ROOT_GROUP_NAME, SUBTITLE_EXTENSIONS, UNKNOWN_GROUP_NAME,
};
