// SPDX-License-Identifier: MPL-2.0
//! Repeat and shuffle modes.
//!
//! The player exposes four mutually exclusive modes while the media engine
//! only knows a repeat enum and a separate shuffle flag. [`RepeatMode::engine_flags`]
//! is the single place that maps one onto the other.

/// Repeat mode as understood by the media engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineRepeat {
    Off,
    One,
    All,
}

/// User-facing repeat mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatMode {
    #[default]
    Off,
    RepeatOne,
    RepeatAll,
    Shuffle,
}

impl RepeatMode {
    /// All modes in menu order.
    pub const ALL: [RepeatMode; 4] = [
        RepeatMode::Off,
        RepeatMode::RepeatOne,
        RepeatMode::RepeatAll,
        RepeatMode::Shuffle,
    ];

    /// Returns the engine repeat mode and shuffle flag for this mode.
    ///
    /// Shuffle always implies repeat-all; every other mode turns shuffle off.
    #[must_use]
    pub fn engine_flags(self) -> (EngineRepeat, bool) {
        match self {
            Self::Off => (EngineRepeat::Off, false),
            Self::RepeatOne => (EngineRepeat::One, false),
            Self::RepeatAll => (EngineRepeat::All, false),
            Self::Shuffle => (EngineRepeat::All, true),
        }
    }

    /// Stable name used for persistence.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "REPEAT_MODE_OFF",
            Self::RepeatOne => "REPEAT_MODE_ONE",
            Self::RepeatAll => "REPEAT_MODE_ALL",
            Self::Shuffle => "SHUFFLE",
        }
    }

    /// Parses a persisted name; unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == name)
    }
}
