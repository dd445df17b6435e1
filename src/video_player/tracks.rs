// SPDX-License-Identifier: MPL-2.0
//! Track selection and source construction helpers.
//!
//! In-stream tracks are switched with a lightweight [`TrackSelection`]
//! update. Local subtitle files are bound when a [`MediaSource`] is built,
//! so attaching one means rebuilding every source of the play queue.

use crate::application::port::{MediaSource, TrackSelection};
use crate::domain::media::{
    detect_subtitle_mime, MediaUri, SubtitleFile, TrackGroup, TrackId, TrackKind, VideoRecord,
};

/// Overrides the audio track, leaving subtitle overrides alone.
#[must_use]
pub fn with_audio_track(mut selection: TrackSelection, id: TrackId) -> TrackSelection {
    selection.set_override(TrackKind::Audio, id);
    selection
}

/// Overrides the in-stream subtitle track, leaving audio overrides alone.
#[must_use]
pub fn with_subtitle_track(mut selection: TrackSelection, id: TrackId) -> TrackSelection {
    selection.set_override(TrackKind::Text, id);
    selection
}

#[must_use]
pub fn with_subtitles_enabled(mut selection: TrackSelection, enabled: bool) -> TrackSelection {
    selection.set_text_disabled(!enabled);
    selection
}

/// Selection after a local subtitle file was attached: the attachment
/// becomes the default text track.
#[must_use]
pub fn with_local_subtitle(mut selection: TrackSelection) -> TrackSelection {
    selection.clear_overrides(TrackKind::Text);
    selection.set_text_disabled(false);
    selection
}

/// True if `groups` still contain a track of `kind` at `id`.
#[must_use]
pub fn has_track(groups: &[TrackGroup], kind: TrackKind, id: TrackId) -> bool {
    groups
        .get(id.group)
        .is_some_and(|group| group.kind == kind && id.index < group.formats.len())
}

/// Resolves a subtitle locator against the known files.
///
/// A locator that is not (or no longer) listed still yields a usable
/// attachment, named after its last path segment.
#[must_use]
pub fn subtitle_for_uri(uri: &MediaUri, known: &[SubtitleFile]) -> SubtitleFile {
    if let Some(file) = known.iter().find(|file| &file.uri == uri) {
        return file.clone();
    }
    let name = uri.last_segment().unwrap_or_default().to_string();
    SubtitleFile {
        id: 0,
        uri: uri.clone(),
        mime_type: detect_subtitle_mime(&name).to_string(),
        name,
        size_bytes: 0,
    }
}

/// Builds one source per item, attaching whatever subtitle `attachment`
/// returns for it.
#[must_use]
pub fn build_sources(
    items: &[VideoRecord],
    mut attachment: impl FnMut(&VideoRecord) -> Option<SubtitleFile>,
) -> Vec<MediaSource> {
    items
        .iter()
        .map(|record| {
            let source = MediaSource::new(record.uri.clone(), record.mime_type.clone());
            match attachment(record) {
                Some(subtitle) => source.with_subtitle(subtitle),
                None => source,
            }
        })
        .collect()
}
