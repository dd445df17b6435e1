// SPDX-License-Identifier: MPL-2.0
//! Query services (read-side).
//!
//! These services do not modify state; they derive views from a catalog
//! snapshot.
//!
//! # Available Services
//!
//! - [`library`]: folder grouping and playlist resolution

pub mod library;

pub use library::{
    group_by_folder, group_display_name, resolve_playlist, sort_newest_first, videos_in_group,
    GroupedVideos,
};
