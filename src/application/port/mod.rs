// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters (or
//! the embedding platform) implement. These traits use only domain types,
//! keeping the gallery and player logic independent of concrete backends.
//!
//! # Available Ports
//!
//! - [`catalog`]: Media catalog queries, mutations and change notifications
//! - [`engine`]: Media engine commands and events
//! - [`host`]: Window/system services used by the player screen
//! - [`preferences`]: Key-value preference storage
//! - [`probe`]: Video metadata and thumbnail extraction
//!
//! # Design Notes
//!
//! - Catalog and preference ports are `Send + Sync`; they are shared behind `Arc`
//! - Engine and host ports are `Send` only; one player session owns them
//! - No `async fn`: blocking calls are moved onto the blocking pool by callers

pub mod catalog;
pub mod engine;
pub mod host;
pub mod preferences;
pub mod probe;

// Re-export main types for convenience
pub use catalog::{CatalogNotifier, CatalogWatch, MediaCatalog};
pub use engine::{
    EngineEvent, EngineState, MediaEngine, MediaSource, TrackSelection, TransitionReason,
};
pub use host::{Notice, PipAction, PipParams, PlayerHost, ScreenOrientation, SurfaceRect};
pub use preferences::PreferenceStore;
pub use probe::{ProbedVideo, VideoProbe};
