// SPDX-License-Identifier: MPL-2.0
//! Gallery layout preference with change notification.
//!
//! Screens subscribe to a [`tokio::sync::watch`] receiver instead of
//! registering listeners on the store; the subscription ends when the
//! receiver is dropped.

use crate::application::port::PreferenceStore;
use std::sync::Arc;
use tokio::sync::watch;

const KEY_VIEW_MODE: &str = "videos_view_mode";

/// Layout of the flat video list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Grid,
}

impl ViewMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::List => "LIST",
            Self::Grid => "GRID",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "LIST" => Some(Self::List),
            "GRID" => Some(Self::Grid),
            _ => None,
        }
    }
}

/// Persisted, observable [`ViewMode`].
pub struct ViewModePrefs {
    store: Arc<dyn PreferenceStore>,
    sender: watch::Sender<ViewMode>,
}

impl ViewModePrefs {
    /// Loads the stored mode; missing or unknown values read as [`ViewMode::List`].
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let initial = store
            .get_string(KEY_VIEW_MODE)
            .and_then(|name| ViewMode::from_name(&name))
            .unwrap_or_default();
        let (sender, _) = watch::channel(initial);
        Self { store, sender }
    }

    #[must_use]
    pub fn get(&self) -> ViewMode {
        *self.sender.borrow()
    }

    /// Persists `mode` and notifies subscribers if it changed.
    pub fn set(&self, mode: ViewMode) {
        self.store.put_string(KEY_VIEW_MODE, mode.as_str());
        self.sender.send_if_modified(|current| {
            let changed = *current != mode;
            *current = mode;
            changed
        });
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ViewMode> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryPreferences;

    #[test]
    fn defaults_to_list() {
        let prefs = ViewModePrefs::new(Arc::new(MemoryPreferences::new()));
        assert_eq!(prefs.get(), ViewMode::List);
    }

    #[test]
    fn reads_stored_mode() {
        let store: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferences::new());
        store.put_string(KEY_VIEW_MODE, "GRID");
        assert_eq!(ViewModePrefs::new(store).get(), ViewMode::Grid);
    }

    #[test]
    fn set_persists_and_notifies_subscribers() {
        let store: Arc<dyn PreferenceStore> = Arc::new(MemoryPreferences::new());
        let prefs = ViewModePrefs::new(store.clone());
        let mut rx = prefs.subscribe();

        prefs.set(ViewMode::Grid);
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), ViewMode::Grid);
        assert_eq!(store.get_string(KEY_VIEW_MODE), Some("GRID".to_string()));

        prefs.set(ViewMode::Grid);
        assert!(!rx.has_changed().unwrap_or(true));
    }
}
