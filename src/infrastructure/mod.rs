// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`:
//!
//! - [`ffmpeg`]: container probing and preview frames via `FFmpeg`
//!   (implements [`VideoProbe`])
//! - [`filesystem`]: directory-backed media catalog (implements [`MediaCatalog`])
//! - [`watcher`]: file system change notifications feeding a [`CatalogWatch`]
//!
//! [`VideoProbe`]: crate::application::port::VideoProbe
//! [`MediaCatalog`]: crate::application::port::MediaCatalog
//! [`CatalogWatch`]: crate::application::port::CatalogWatch

pub mod ffmpeg;
pub mod filesystem;
pub mod watcher;

pub use ffmpeg::FfmpegProbe;
pub use filesystem::FsCatalog;
