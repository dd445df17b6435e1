// SPDX-License-Identifier: MPL-2.0
//! Read-side queries over a catalog snapshot: folder grouping and playlist
//! resolution.
//!
//! All functions are pure; they take the current list of [`VideoRecord`]s
//! and never talk to the catalog themselves.

use crate::domain::media::{
    GroupKey, PlaylistContext, VideoId, VideoRecord, ROOT_GROUP_NAME, UNKNOWN_GROUP_NAME,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Videos grouped by parent folder.
pub type GroupedVideos = BTreeMap<GroupKey, Vec<VideoRecord>>;

/// Orders videos by date added, newest first. Ties keep catalog order.
pub fn sort_newest_first(videos: &mut [VideoRecord]) {
    videos.sort_by(|a, b| b.date_added_secs.cmp(&a.date_added_secs));
}

/// Returns the display name of a folder group.
///
/// Folders that are one of the library `roots` are shown as
/// [`ROOT_GROUP_NAME`]; videos without a parent fall under
/// [`UNKNOWN_GROUP_NAME`].
#[must_use]
pub fn group_display_name(key: &GroupKey, roots: &[PathBuf]) -> String {
    if key.as_str() == UNKNOWN_GROUP_NAME {
        return UNKNOWN_GROUP_NAME.to_string();
    }
    let folder = Path::new(key.as_str());
    if folder.parent().is_none() || roots.iter().any(|root| root.as_path() == folder) {
        return ROOT_GROUP_NAME.to_string();
    }
    folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| ROOT_GROUP_NAME.to_string())
}

/// Groups videos by parent folder, normalizing each record's
/// `group_name` to the folder's display name. Order within a group
/// follows the input order.
#[must_use]
pub fn group_by_folder(videos: &[VideoRecord], roots: &[PathBuf]) -> GroupedVideos {
    let mut grouped = GroupedVideos::new();
    for video in videos {
        let key = video.group_key();
        let mut video = video.clone();
        video.group_name = group_display_name(&key, roots);
        grouped.entry(key).or_default().push(video);
    }
    grouped
}

/// Returns the videos of one folder (or every video when `group` is `None`),
/// in catalog order.
#[must_use]
pub fn videos_in_group(videos: &[VideoRecord], group: Option<&GroupKey>) -> Vec<VideoRecord> {
    match group {
        Some(key) => videos
            .iter()
            .filter(|v| &v.group_key() == key)
            .cloned()
            .collect(),
        None => videos.to_vec(),
    }
}

/// Builds the play queue for a selection.
///
/// A video that no longer exists falls back to the first item of the
/// group. Returns `None` only when the group itself is empty.
#[must_use]
pub fn resolve_playlist(
    videos: &[VideoRecord],
    group: Option<&GroupKey>,
    id: VideoId,
) -> Option<PlaylistContext> {
    let items = videos_in_group(videos, group);
    let index = items.iter().position(|v| v.id == id).unwrap_or_else(|| {
        log::info!("video {id} not in playlist, starting from the first item");
        0
    });
    PlaylistContext::new(items, index)
}
