// SPDX-License-Identifier: MPL-2.0
//! Media engine port definition.
//!
//! The engine decodes and renders; the player drives it through the
//! [`MediaEngine`] command interface and reacts to the closed set of
//! [`EngineEvent`]s it emits. Events are delivered in emission order on the
//! same loop that handles user input.
//!
//! # Design Notes
//!
//! - The engine is **stateful** and exclusively owned by one player session
//! - Subtitle files are bound to a [`MediaSource`] at construction time, so
//!   attaching one means rebuilding the sources
//! - Track selection is expressed as per-kind overrides in a [`TrackSelection`]

use crate::domain::media::{MediaUri, SubtitleFile, TrackGroup, TrackId, TrackKind};
use crate::domain::video::{EngineRepeat, PlaybackSpeed, Progress};
use crate::error::VideoError;

/// Coarse engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Buffering,
    Ready,
    Ended,
}

/// Why the engine moved to another playlist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReason {
    /// The previous item played to its end.
    Auto,
    /// The same item restarted because of repeat-one.
    Repeat,
    /// An explicit seek to another item.
    Seek,
    /// The source list was replaced.
    PlaylistChanged,
}

/// Events emitted by the media engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    StateChanged(EngineState),
    IsPlayingChanged(bool),
    /// Track groups of the current item, reported once the stream is open.
    TracksChanged(Vec<TrackGroup>),
    ItemTransitioned {
        index: usize,
        reason: TransitionReason,
    },
    /// System media volume changed (hardware keys or another app).
    VolumeChanged { level: Progress },
    Error(VideoError),
}

/// One playable item plus its side-loaded subtitle attachments.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSource {
    pub uri: MediaUri,
    pub mime_type: Option<String>,
    pub subtitles: Vec<SubtitleFile>,
}

impl MediaSource {
    #[must_use]
    pub fn new(uri: MediaUri, mime_type: Option<String>) -> Self {
        Self {
            uri,
            mime_type,
            subtitles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: SubtitleFile) -> Self {
        self.subtitles.push(subtitle);
        self
    }
}

/// Active track-selection parameters.
///
/// Holds at most one override per track kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackSelection {
    overrides: Vec<(TrackKind, TrackId)>,
    text_disabled: bool,
}

impl TrackSelection {
    /// Replaces the override for `kind`, leaving other kinds untouched.
    pub fn set_override(&mut self, kind: TrackKind, id: TrackId) {
        self.clear_overrides(kind);
        self.overrides.push((kind, id));
    }

    /// Drops the override for `kind`.
    pub fn clear_overrides(&mut self, kind: TrackKind) {
        self.overrides.retain(|(k, _)| *k != kind);
    }

    #[must_use]
    pub fn override_for(&self, kind: TrackKind) -> Option<TrackId> {
        self.overrides
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, id)| *id)
    }

    #[must_use]
    pub fn text_disabled(&self) -> bool {
        self.text_disabled
    }

    pub fn set_text_disabled(&mut self, disabled: bool) {
        self.text_disabled = disabled;
    }
}

/// Port for the platform media engine.
pub trait MediaEngine: Send {
    /// Replaces the source list and positions the engine on `index` at `position_ms`.
    fn set_sources(&mut self, sources: Vec<MediaSource>, index: usize, position_ms: u64);

    fn prepare(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn stop(&mut self);

    /// Frees every engine resource. No other command is valid afterwards.
    fn release(&mut self);

    fn set_play_when_ready(&mut self, play_when_ready: bool);
    fn play_when_ready(&self) -> bool;

    /// Seeks within the current item.
    fn seek_to(&mut self, position_ms: u64);

    /// Seeks to another item.
    fn seek_to_item(&mut self, index: usize, position_ms: u64);

    fn set_speed(&mut self, speed: PlaybackSpeed);
    fn set_repeat(&mut self, repeat: EngineRepeat);
    fn set_shuffle(&mut self, enabled: bool);

    /// Player volume in `[0, 1]`, independent of the system volume.
    fn set_volume(&mut self, volume: f32);

    /// Loudness enhancer target gain in millibels.
    fn set_loudness_gain(&mut self, millibels: i32);

    fn track_selection(&self) -> TrackSelection;
    fn set_track_selection(&mut self, selection: TrackSelection);

    fn position_ms(&self) -> u64;
    fn duration_ms(&self) -> u64;
    fn current_index(&self) -> usize;

    /// Item a "next" press moves to, following the shuffle order and
    /// wrapping under repeat-all. Repeat-one counts as off. `None` at the end.
    fn next_index(&self) -> Option<usize>;

    /// Counterpart of [`next_index`](Self::next_index) for "previous".
    fn previous_index(&self) -> Option<usize>;

    fn state(&self) -> EngineState;
    fn is_playing(&self) -> bool;
    fn current_tracks(&self) -> Vec<TrackGroup>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn MediaEngine) {}

    #[test]
    fn overrides_are_scoped_per_kind() {
        let mut selection = TrackSelection::default();
        selection.set_override(TrackKind::Audio, TrackId::new(1, 0));
        selection.set_override(TrackKind::Text, TrackId::new(2, 1));
        selection.set_override(TrackKind::Audio, TrackId::new(1, 1));

        assert_eq!(
            selection.override_for(TrackKind::Audio),
            Some(TrackId::new(1, 1))
        );
        assert_eq!(
            selection.override_for(TrackKind::Text),
            Some(TrackId::new(2, 1))
        );

        selection.clear_overrides(TrackKind::Text);
        assert_eq!(selection.override_for(TrackKind::Text), None);
        assert!(selection.override_for(TrackKind::Audio).is_some());
    }

    #[test]
    fn source_builder_attaches_subtitles() {
        let subtitle = SubtitleFile {
            id: 1,
            uri: MediaUri::new("file:///s/a.srt"),
            name: "a.srt".into(),
            mime_type: "application/x-subrip".into(),
            size_bytes: 10,
        };
        let source = MediaSource::new(MediaUri::new("file:///v/a.mp4"), None)
            .with_subtitle(subtitle.clone());
        assert_eq!(source.subtitles, vec![subtitle]);
    }
}
