// SPDX-License-Identifier: MPL-2.0
//! Preference storage and the typed preferences built on it.
//!
//! - [`store`]: in-memory and CBOR-file [`PreferenceStore`](crate::application::port::PreferenceStore)s
//! - [`playback`]: resume positions, track choices and player settings
//! - [`view_mode`]: observable gallery layout

pub mod playback;
pub mod store;
pub mod view_mode;

pub use playback::{
    AudioTrackPrefs, PlaybackPositions, PlaybackSettingsPrefs, PlayerPrefs, SubtitlePrefs,
};
pub use store::{FilePreferences, MemoryPreferences, PrefValue};
pub use view_mode::{ViewMode, ViewModePrefs};
