// SPDX-License-Identifier: MPL-2.0
//! Track descriptors reported by a media engine.
//!
//! Engines expose their tracks as a list of groups, each holding one or
//! more formats. A track is addressed by its `(group, index)` pair, which
//! is wrapped in [`TrackId`] so audio and subtitle choices cannot be mixed
//! up positionally.

/// Position of a track inside the engine's track grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId {
    pub group: usize,
    pub index: usize,
}

impl TrackId {
    #[must_use]
    pub fn new(group: usize, index: usize) -> Self {
        Self { group, index }
    }

    /// Encodes the id as `"group:index"` for preference storage.
    #[must_use]
    pub fn to_pref_value(self) -> String {
        format!("{}:{}", self.group, self.index)
    }

    /// Parses a `"group:index"` value; malformed values yield `None`.
    #[must_use]
    pub fn from_pref_value(value: &str) -> Option<Self> {
        let (group, index) = value.split_once(':')?;
        Some(Self {
            group: group.trim().parse().ok()?,
            index: index.trim().parse().ok()?,
        })
    }
}

/// Kind of a track group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackKind {
    Video,
    Audio,
    Text,
}

/// One format inside a track group.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrackFormat {
    pub language: Option<String>,
    pub label: Option<String>,
    pub selected: bool,
}

/// A group of alternative tracks of the same kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackGroup {
    pub kind: TrackKind,
    pub formats: Vec<TrackFormat>,
}

impl TrackGroup {
    #[must_use]
    pub fn new(kind: TrackKind, formats: Vec<TrackFormat>) -> Self {
        Self { kind, formats }
    }
}

fn display_label(format: &TrackFormat, fallback_prefix: &str, index: usize) -> String {
    match (&format.language, &format.label) {
        (Some(language), Some(label)) => format!("{language}_{label}"),
        _ => format!("{fallback_prefix} {}", index + 1),
    }
}

fn collect<T>(
    groups: &[TrackGroup],
    kind: TrackKind,
    mut make: impl FnMut(TrackId, &TrackFormat) -> T,
) -> Vec<T> {
    groups
        .iter()
        .enumerate()
        .filter(|(_, group)| group.kind == kind)
        .flat_map(|(group_index, group)| {
            group
                .formats
                .iter()
                .enumerate()
                .map(move |(index, format)| (TrackId::new(group_index, index), format))
        })
        .map(|(id, format)| make(id, format))
        .collect()
}

/// Audio track descriptor. Equality is by [`TrackId`] only.
#[derive(Debug, Clone, Eq)]
pub struct AudioTrack {
    pub id: TrackId,
    pub language: Option<String>,
    pub label: String,
}

impl PartialEq for AudioTrack {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl AudioTrack {
    /// Lists every audio track in the given groups.
    #[must_use]
    pub fn list(groups: &[TrackGroup]) -> Vec<Self> {
        collect(groups, TrackKind::Audio, |id, format| Self {
            id,
            language: format.language.clone(),
            label: display_label(format, "Audio Track", id.index),
        })
    }

    /// Returns the first selected audio track, if any.
    #[must_use]
    pub fn selected(groups: &[TrackGroup]) -> Option<Self> {
        let selected = collect(groups, TrackKind::Audio, |id, format| {
            format.selected.then(|| Self {
                id,
                language: format.language.clone(),
                label: display_label(format, "Audio Track", id.index),
            })
        });
        selected.into_iter().flatten().next()
    }
}

/// In-stream subtitle track descriptor. Equality is by [`TrackId`] only.
#[derive(Debug, Clone, Eq)]
pub struct SubtitleTrack {
    pub id: TrackId,
    pub language: Option<String>,
    pub label: String,
}

impl PartialEq for SubtitleTrack {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl SubtitleTrack {
    /// Lists every text track in the given groups.
    #[must_use]
    pub fn list(groups: &[TrackGroup]) -> Vec<Self> {
        collect(groups, TrackKind::Text, |id, format| Self {
            id,
            language: format.language.clone(),
            label: display_label(format, "Subtitle", id.index),
        })
    }

    /// Returns the first selected text track, if any.
    #[must_use]
    pub fn selected(groups: &[TrackGroup]) -> Option<Self> {
        let selected = collect(groups, TrackKind::Text, |id, format| {
            format.selected.then(|| Self {
                id,
                language: format.language.clone(),
                label: display_label(format, "Subtitle", id.index),
            })
        });
        selected.into_iter().flatten().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(language: Option<&str>, label: Option<&str>, selected: bool) -> TrackFormat {
        TrackFormat {
            language: language.map(str::to_string),
            label: label.map(str::to_string),
            selected,
        }
    }

    fn sample_groups() -> Vec<TrackGroup> {
        vec![
            TrackGroup::new(TrackKind::Video, vec![format(None, None, true)]),
            TrackGroup::new(
                TrackKind::Audio,
                vec![
                    format(Some("en"), Some("Stereo"), false),
                    format(None, None, true),
                ],
            ),
            TrackGroup::new(TrackKind::Text, vec![format(Some("fr"), Some("Forced"), true)]),
        ]
    }

    #[test]
    fn pref_value_round_trip() {
        let id = TrackId::new(3, 1);
        assert_eq!(TrackId::from_pref_value(&id.to_pref_value()), Some(id));
    }

    #[test]
    fn malformed_pref_values_are_rejected() {
        assert_eq!(TrackId::from_pref_value("3"), None);
        assert_eq!(TrackId::from_pref_value("a:1"), None);
        assert_eq!(TrackId::from_pref_value("1:2:3"), None);
    }

    #[test]
    fn audio_listing_uses_group_positions() {
        let tracks = AudioTrack::list(&sample_groups());
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, TrackId::new(1, 0));
        assert_eq!(tracks[0].label, "en_Stereo");
        assert_eq!(tracks[1].label, "Audio Track 2");
    }

    #[test]
    fn selected_tracks_are_found_per_kind() {
        let groups = sample_groups();
        assert_eq!(
            AudioTrack::selected(&groups).map(|t| t.id),
            Some(TrackId::new(1, 1))
        );
        let subtitle = SubtitleTrack::selected(&groups);
        assert_eq!(subtitle.as_ref().map(|t| t.id), Some(TrackId::new(2, 0)));
        assert_eq!(subtitle.map(|t| t.label), Some("fr_Forced".to_string()));
    }

    #[test]
    fn descriptor_equality_ignores_labels() {
        let a = AudioTrack {
            id: TrackId::new(1, 0),
            language: None,
            label: "one".into(),
        };
        let b = AudioTrack {
            id: TrackId::new(1, 0),
            language: Some("en".into()),
            label: "two".into(),
        };
        assert_eq!(a, b);
    }
}
