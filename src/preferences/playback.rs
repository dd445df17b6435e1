// SPDX-License-Identifier: MPL-2.0
//! Typed playback preferences over a [`PreferenceStore`].
//!
//! Per-video entries use `"<namespace>_<uri>"` keys so two records with the
//! same locator share their resume position and track choices.

use crate::application::port::PreferenceStore;
use crate::domain::media::{MediaUri, TrackId};
use crate::domain::video::{PlaybackSpeed, RepeatMode};
use std::sync::Arc;

const POSITION_PREFIX: &str = "pos_";
const AUDIO_TRACK_PREFIX: &str = "audio_track_";
const SUBTITLE_URI_PREFIX: &str = "subtitle_uri_";

const KEY_AUDIO_ONLY: &str = "is_audio_only";
const KEY_SUBTITLES_ENABLED: &str = "subtitles_enabled";
const KEY_PLAYBACK_MODE: &str = "playback_mode";
const KEY_PLAYBACK_SPEED: &str = "playback_speed";

fn key(prefix: &str, uri: &MediaUri) -> String {
    format!("{prefix}{uri}")
}

/// Resume positions in milliseconds, keyed by video locator.
#[derive(Clone)]
pub struct PlaybackPositions {
    store: Arc<dyn PreferenceStore>,
}

impl PlaybackPositions {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, uri: &MediaUri, position_ms: u64) {
        let value = i64::try_from(position_ms).unwrap_or(i64::MAX);
        self.store.put_i64(&key(POSITION_PREFIX, uri), value);
    }

    /// Returns the saved position, or 0 when none is stored.
    #[must_use]
    pub fn get(&self, uri: &MediaUri) -> u64 {
        self.store
            .get_i64(&key(POSITION_PREFIX, uri))
            .and_then(|ms| u64::try_from(ms).ok())
            .unwrap_or(0)
    }

    pub fn clear(&self, uri: &MediaUri) {
        self.store.remove(&key(POSITION_PREFIX, uri));
    }

    /// Forgets every saved position.
    pub fn clear_all(&self) {
        for k in self.store.keys() {
            if k.starts_with(POSITION_PREFIX) {
                self.store.remove(&k);
            }
        }
    }
}

/// Chosen audio track per video, stored as `"group:index"`.
#[derive(Clone)]
pub struct AudioTrackPrefs {
    store: Arc<dyn PreferenceStore>,
}

impl AudioTrackPrefs {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, uri: &MediaUri, track: TrackId) {
        self.store
            .put_string(&key(AUDIO_TRACK_PREFIX, uri), &track.to_pref_value());
    }

    /// Returns the saved track; malformed values read as absent.
    #[must_use]
    pub fn get(&self, uri: &MediaUri) -> Option<TrackId> {
        let value = self.store.get_string(&key(AUDIO_TRACK_PREFIX, uri))?;
        TrackId::from_pref_value(&value)
    }

    pub fn clear(&self, uri: &MediaUri) {
        self.store.remove(&key(AUDIO_TRACK_PREFIX, uri));
    }
}

/// Side-loaded subtitle file per video.
#[derive(Clone)]
pub struct SubtitlePrefs {
    store: Arc<dyn PreferenceStore>,
}

impl SubtitlePrefs {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, uri: &MediaUri, subtitle: &MediaUri) {
        self.store
            .put_string(&key(SUBTITLE_URI_PREFIX, uri), subtitle.as_str());
    }

    #[must_use]
    pub fn get(&self, uri: &MediaUri) -> Option<MediaUri> {
        self.store
            .get_string(&key(SUBTITLE_URI_PREFIX, uri))
            .map(MediaUri::new)
    }

    pub fn clear(&self, uri: &MediaUri) {
        self.store.remove(&key(SUBTITLE_URI_PREFIX, uri));
    }
}

/// Global player settings.
#[derive(Clone)]
pub struct PlaybackSettingsPrefs {
    store: Arc<dyn PreferenceStore>,
}

impl PlaybackSettingsPrefs {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn audio_only(&self) -> bool {
        self.store.get_bool(KEY_AUDIO_ONLY).unwrap_or(false)
    }

    pub fn set_audio_only(&self, enabled: bool) {
        self.store.put_bool(KEY_AUDIO_ONLY, enabled);
    }

    #[must_use]
    pub fn subtitles_enabled(&self) -> bool {
        self.store.get_bool(KEY_SUBTITLES_ENABLED).unwrap_or(true)
    }

    pub fn set_subtitles_enabled(&self, enabled: bool) {
        self.store.put_bool(KEY_SUBTITLES_ENABLED, enabled);
    }

    /// Stored repeat mode; unknown names fall back to off.
    #[must_use]
    pub fn repeat_mode(&self) -> RepeatMode {
        self.store
            .get_string(KEY_PLAYBACK_MODE)
            .and_then(|name| RepeatMode::from_name(&name))
            .unwrap_or_default()
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) {
        self.store.put_string(KEY_PLAYBACK_MODE, mode.as_str());
    }

    #[must_use]
    pub fn playback_speed(&self) -> PlaybackSpeed {
        self.store
            .get_f64(KEY_PLAYBACK_SPEED)
            .map(|speed| PlaybackSpeed::new(speed as f32))
            .unwrap_or_default()
    }

    pub fn set_playback_speed(&self, speed: PlaybackSpeed) {
        self.store
            .put_f64(KEY_PLAYBACK_SPEED, f64::from(speed.value()));
    }
}

/// Every playback preference the player reads and writes.
#[derive(Clone)]
pub struct PlayerPrefs {
    pub positions: PlaybackPositions,
    pub audio_tracks: AudioTrackPrefs,
    pub subtitles: SubtitlePrefs,
    pub settings: PlaybackSettingsPrefs,
}

impl PlayerPrefs {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self {
            positions: PlaybackPositions::new(store.clone()),
            audio_tracks: AudioTrackPrefs::new(store.clone()),
            subtitles: SubtitlePrefs::new(store.clone()),
            settings: PlaybackSettingsPrefs::new(store),
        }
    }
}
