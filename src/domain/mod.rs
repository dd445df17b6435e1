// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core types with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`media`]: Library types ([`VideoRecord`](media::VideoRecord),
//!   [`SubtitleFile`](media::SubtitleFile), [`TrackId`](media::TrackId))
//! - [`video`]: Playback types ([`PlaybackState`](video::PlaybackState),
//!   [`PlaybackSpeed`](video::PlaybackSpeed), [`RepeatMode`](video::RepeatMode))

pub mod media;
pub mod video;
