// SPDX-License-Identifier: MPL-2.0
//! `flix` is the core of a local video gallery and player.
//!
//! It groups the videos found under a set of library roots by folder,
//! keeps per-tab navigation stacks, and drives a platform media engine
//! through a player state machine with gestures, track selection, resume
//! positions, orientation and Picture-in-Picture handling.
//!
//! Platform services (catalog, engine, host window, preference storage) are
//! reached through the traits in [`application::port`]; the
//! [`infrastructure`] module provides file system and FFmpeg backed ones.

#![doc(html_root_url = "https://docs.rs/flix/0.1.0")]

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod gallery;
pub mod infrastructure;
pub mod navigation;
pub mod preferences;
pub mod video_player;

#[cfg(test)]
pub mod test_utils;
