// SPDX-License-Identifier: MPL-2.0
//! [`PreferenceStore`] implementations.
//!
//! [`MemoryPreferences`] keeps everything in a map and is what tests and
//! embedding hosts with their own persistence use. [`FilePreferences`] adds a
//! CBOR file under the app data directory that is rewritten on every mutation.

use crate::app::paths;
use crate::application::port::PreferenceStore;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Preference file name within the app data directory.
const PREFERENCES_FILE: &str = "preferences.cbor";

/// A stored scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

type PrefMap = BTreeMap<String, PrefValue>;

fn lock(map: &Mutex<PrefMap>) -> MutexGuard<'_, PrefMap> {
    map.lock().unwrap_or_else(PoisonError::into_inner)
}

fn get_bool(map: &PrefMap, key: &str) -> Option<bool> {
    match map.get(key)? {
        PrefValue::Bool(v) => Some(*v),
        _ => None,
    }
}

fn get_i64(map: &PrefMap, key: &str) -> Option<i64> {
    match map.get(key)? {
        PrefValue::Int(v) => Some(*v),
        _ => None,
    }
}

fn get_f64(map: &PrefMap, key: &str) -> Option<f64> {
    match map.get(key)? {
        PrefValue::Float(v) => Some(*v),
        PrefValue::Int(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_string(map: &PrefMap, key: &str) -> Option<String> {
    match map.get(key)? {
        PrefValue::Text(v) => Some(v.clone()),
        _ => None,
    }
}

// =============================================================================
// MemoryPreferences
// =============================================================================

/// In-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<PrefMap>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get_bool(&self, key: &str) -> Option<bool> {
        get_bool(&lock(&self.values), key)
    }

    fn put_bool(&self, key: &str, value: bool) {
        lock(&self.values).insert(key.to_string(), PrefValue::Bool(value));
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        get_i64(&lock(&self.values), key)
    }

    fn put_i64(&self, key: &str, value: i64) {
        lock(&self.values).insert(key.to_string(), PrefValue::Int(value));
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        get_f64(&lock(&self.values), key)
    }

    fn put_f64(&self, key: &str, value: f64) {
        lock(&self.values).insert(key.to_string(), PrefValue::Float(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        get_string(&lock(&self.values), key)
    }

    fn put_string(&self, key: &str, value: &str) {
        lock(&self.values).insert(key.to_string(), PrefValue::Text(value.to_string()));
    }

    fn remove(&self, key: &str) {
        lock(&self.values).remove(key);
    }

    fn keys(&self) -> Vec<String> {
        lock(&self.values).keys().cloned().collect()
    }
}

// =============================================================================
// FilePreferences
// =============================================================================

/// Preference store persisted as CBOR, written through on every mutation.
#[derive(Debug)]
pub struct FilePreferences {
    path: PathBuf,
    values: Mutex<PrefMap>,
}

impl FilePreferences {
    /// Opens the store in the default data directory.
    ///
    /// Returns `None` when no data directory can be resolved.
    pub fn open() -> Option<(Self, Option<String>)> {
        Self::open_in(None)
    }

    /// Opens the store under `base_dir`, or the resolved data dir when `None`.
    ///
    /// A missing file yields an empty store. An unreadable one yields an
    /// empty store plus a warning key; it is overwritten on the next write.
    pub fn open_in(base_dir: Option<PathBuf>) -> Option<(Self, Option<String>)> {
        let mut path = paths::get_app_data_dir_with_override(base_dir)?;
        path.push(PREFERENCES_FILE);
        Some(Self::open_at(path))
    }

    fn open_at(path: PathBuf) -> (Self, Option<String>) {
        let (values, warning) = match Self::read(&path) {
            Ok(values) => (values, None),
            Err(err) => {
                log::warn!("resetting preferences at {}: {}", path.display(), err);
                (
                    PrefMap::new(),
                    Some("notification-preferences-read-error".to_string()),
                )
            }
        };
        (
            Self {
                path,
                values: Mutex::new(values),
            },
            warning,
        )
    }

    fn read(path: &Path) -> Result<PrefMap> {
        if !path.exists() {
            return Ok(PrefMap::new());
        }
        let file = fs::File::open(path)?;
        ciborium::from_reader(BufReader::new(file)).map_err(|e| Error::Preferences(e.to_string()))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current values to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn flush(&self) -> Result<()> {
        let values = lock(&self.values);
        Self::write(&self.path, &values)
    }

    fn write(path: &Path, values: &PrefMap) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        ciborium::into_writer(values, BufWriter::new(file))
            .map_err(|e| Error::Preferences(e.to_string()))
    }

    fn mutate(&self, apply: impl FnOnce(&mut PrefMap)) {
        let mut values = lock(&self.values);
        apply(&mut values);
        if let Err(err) = Self::write(&self.path, &values) {
            log::warn!("failed to save preferences to {}: {}", self.path.display(), err);
        }
    }
}

impl PreferenceStore for FilePreferences {
    fn get_bool(&self, key: &str) -> Option<bool> {
        get_bool(&lock(&self.values), key)
    }

    fn put_bool(&self, key: &str, value: bool) {
        self.mutate(|m| {
            m.insert(key.to_string(), PrefValue::Bool(value));
        });
    }

    fn get_i64(&self, key: &str) -> Option<i64> {
        get_i64(&lock(&self.values), key)
    }

    fn put_i64(&self, key: &str, value: i64) {
        self.mutate(|m| {
            m.insert(key.to_string(), PrefValue::Int(value));
        });
    }

    fn get_f64(&self, key: &str) -> Option<f64> {
        get_f64(&lock(&self.values), key)
    }

    fn put_f64(&self, key: &str, value: f64) {
        self.mutate(|m| {
            m.insert(key.to_string(), PrefValue::Float(value));
        });
    }

    fn get_string(&self, key: &str) -> Option<String> {
        get_string(&lock(&self.values), key)
    }

    fn put_string(&self, key: &str, value: &str) {
        self.mutate(|m| {
            m.insert(key.to_string(), PrefValue::Text(value.to_string()));
        });
    }

    fn remove(&self, key: &str) {
        self.mutate(|m| {
            m.remove(key);
        });
    }

    fn keys(&self) -> Vec<String> {
        lock(&self.values).keys().cloned().collect()
    }
}
