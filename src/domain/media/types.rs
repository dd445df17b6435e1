// SPDX-License-Identifier: MPL-2.0
//! Core library types for the domain layer.
//!
//! These types represent pure data without any presentation dependencies.

use super::tracks::{AudioTrack, SubtitleTrack};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Display name used for videos stored directly in a library root.
pub const ROOT_GROUP_NAME: &str = "Root";

/// Group key and display name used when a video has no parent folder.
pub const UNKNOWN_GROUP_NAME: &str = "Unknown";

/// Catalog identity of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VideoId(u64);

impl VideoId {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content locator of a media item.
///
/// Preference keys are derived from the locator, so two records with the
/// same locator share resume position, audio track and subtitle choices.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaUri(String);

impl MediaUri {
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Builds a `file://` locator for a local path.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the local path for `file://` locators.
    #[must_use]
    pub fn to_path(&self) -> Option<PathBuf> {
        self.0.strip_prefix("file://").map(PathBuf::from)
    }

    /// Returns the last path segment of the locator.
    #[must_use]
    pub fn last_segment(&self) -> Option<&str> {
        self.0.rsplit('/').next().filter(|s| !s.is_empty())
    }
}

impl fmt::Display for MediaUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Folder grouping key (the parent directory of a video).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey(String);

impl GroupKey {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Derives the group key of a file: its parent directory, or
    /// [`UNKNOWN_GROUP_NAME`] when there is none.
    #[must_use]
    pub fn for_path(path: &Path) -> Self {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                Self(parent.to_string_lossy().into_owned())
            }
            _ => Self(UNKNOWN_GROUP_NAME.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decoded thumbnail in RGBA format.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba: Arc<Vec<u8>>,
}

impl Thumbnail {
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba: Arc::new(rgba),
        }
    }
}

/// A video known to the media catalog.
///
/// Created by a catalog query and replaced wholesale on the next one. The
/// track lists start empty and are filled in by the player once the media
/// engine has opened the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub id: VideoId,
    pub uri: MediaUri,
    pub path: PathBuf,
    /// File name including extension.
    pub display_name: String,
    /// File name without extension.
    pub title: String,
    /// Folder-derived display name ("Root" for library roots).
    pub group_name: String,
    pub width: u32,
    pub height: u32,
    pub duration_ms: u64,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
    /// Seconds since the Unix epoch.
    pub date_added_secs: i64,
    pub thumbnail: Option<Thumbnail>,
    pub audio_tracks: Vec<AudioTrack>,
    pub subtitle_tracks: Vec<SubtitleTrack>,
}

impl VideoRecord {
    /// Creates a record with only identity fields set.
    #[must_use]
    pub fn new(id: VideoId, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let title = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let group_name = path
            .parent()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNKNOWN_GROUP_NAME.to_string());

        Self {
            id,
            uri: MediaUri::from_path(&path),
            path,
            display_name,
            title,
            group_name,
            width: 0,
            height: 0,
            duration_ms: 0,
            size_bytes: 0,
            mime_type: None,
            date_added_secs: 0,
            thumbnail: None,
            audio_tracks: Vec::new(),
            subtitle_tracks: Vec::new(),
        }
    }

    /// Returns the folder this video is grouped under.
    #[must_use]
    pub fn group_key(&self) -> GroupKey {
        GroupKey::for_path(&self.path)
    }

    /// Returns the file extension (without the dot), if any.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.path.extension().and_then(|e| e.to_str())
    }

    /// Returns the width/height ratio, if both dimensions are known.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f32 / self.height as f32)
    }
}

/// Subtitle file extensions discovered on disk.
pub const SUBTITLE_EXTENSIONS: &[&str] = &[
    "srt", "vtt", "ssa", "ass", "ttml", "xml", "stl", "dfxp", "sbv", "sub", "lrc",
];

/// Returns true if the path has a known subtitle extension.
#[must_use]
pub fn is_subtitle_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            SUBTITLE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Maps a subtitle file name to the mime type the media engine expects.
///
/// SSA and ASS share a mime type; MicroDVD and lyrics files are reported
/// as unknown text since the engine cannot parse them on their own.
#[must_use]
pub fn detect_subtitle_mime(file_name: &str) -> &'static str {
    let lower = file_name.to_lowercase();
    let ext = lower.rsplit('.').next().unwrap_or_default();
    match ext {
        "srt" => "application/x-subrip",
        "vtt" => "text/vtt",
        "ssa" | "ass" => "text/x-ssa",
        "ttml" | "dfxp" | "xml" => "application/ttml+xml",
        _ => "text/x-unknown",
    }
}

/// A subtitle file that can be attached to a video at source-construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleFile {
    pub id: u64,
    pub uri: MediaUri,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
}
