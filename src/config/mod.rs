// SPDX-License-Identifier: MPL-2.0
//! This module handles the application's configuration, including loading and saving
//! user settings to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use flix::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.library_roots.push(PathBuf::from("/media/videos"));
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

pub mod defaults;

use crate::app::paths;
use crate::domain::video::SeekStep;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use defaults::*;

const CONFIG_FILE: &str = "settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directories scanned by the filesystem catalog.
    pub library_roots: Vec<PathBuf>,
    /// Quiescent interval before player controls hide.
    pub controls_timeout_ms: u64,
    /// Double-tap seek step.
    pub double_tap_seek_secs: u32,
    /// Hardware volume-key overlay window.
    pub volume_flash_ms: u64,
    /// Vertical drag distance mapping to the full volume/brightness range.
    pub drag_track_height_px: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            library_roots: Vec::new(),
            controls_timeout_ms: DEFAULT_CONTROLS_TIMEOUT_MS,
            double_tap_seek_secs: DEFAULT_SEEK_STEP_SECS,
            volume_flash_ms: DEFAULT_VOLUME_FLASH_MS,
            drag_track_height_px: DEFAULT_DRAG_TRACK_HEIGHT_PX,
        }
    }
}

impl Config {
    /// Controls auto-hide interval, clamped to the supported range.
    #[must_use]
    pub fn controls_timeout(&self) -> Duration {
        Duration::from_millis(
            self.controls_timeout_ms
                .clamp(MIN_CONTROLS_TIMEOUT_MS, MAX_CONTROLS_TIMEOUT_MS),
        )
    }

    #[must_use]
    pub fn seek_step(&self) -> SeekStep {
        SeekStep::new(self.double_tap_seek_secs)
    }

    /// Volume-key overlay window, clamped to the supported range.
    #[must_use]
    pub fn volume_flash(&self) -> Duration {
        Duration::from_millis(
            self.volume_flash_ms
                .clamp(MIN_VOLUME_FLASH_MS, MAX_VOLUME_FLASH_MS),
        )
    }

    #[must_use]
    pub fn drag_track_height(&self) -> f32 {
        if self.drag_track_height_px.is_finite() {
            self.drag_track_height_px.max(MIN_DRAG_TRACK_HEIGHT_PX)
        } else {
            DEFAULT_DRAG_TRACK_HEIGHT_PX
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    paths::get_app_config_dir().map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            log::warn!("ignoring invalid settings at {}: {}", path.display(), err);
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
