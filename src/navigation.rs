// SPDX-License-Identifier: MPL-2.0
//! Two-tab navigation with independent back stacks.
//!
//! The "Videos" tab holds the flat list; the "Albums" tab holds the folder
//! list plus any folder views opened from it. Stacks never affect each other.
//! Only the active tab is persisted; stacks restart at their root.

use crate::app::persisted_state::AppState;
use crate::domain::media::{GroupKey, VideoId, VideoRecord};
use std::fmt;

/// Bottom navigation tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Videos,
    Albums,
}

impl Tab {
    /// Token stored in [`AppState`].
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            Tab::Videos => "Videos",
            Tab::Albums => "Albums",
        }
    }

    /// Parses a stored token; anything unknown restores the videos tab.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "Albums" => Tab::Albums,
            _ => Tab::Videos,
        }
    }

    fn root(self) -> Route {
        match self {
            Tab::Videos => Route::Videos,
            Tab::Albums => Route::Albums,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A navigation destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Flat list of every video.
    Videos,
    /// Folder overview.
    Albums,
    /// Videos of one folder.
    Folder { key: GroupKey, name: String },
}

/// An ordered history that always keeps its root entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackStack {
    entries: Vec<Route>,
}

impl BackStack {
    #[must_use]
    pub fn new(root: Route) -> Self {
        Self {
            entries: vec![root],
        }
    }

    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    /// Pops the top entry. Returns false, leaving the stack untouched, at the root.
    pub fn pop(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn top(&self) -> &Route {
        // The root entry is never removed.
        &self.entries[self.entries.len() - 1]
    }

    #[must_use]
    pub fn is_at_root(&self) -> bool {
        self.entries.len() == 1
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }
}

/// Active tab plus one back stack per tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    videos: BackStack,
    albums: BackStack,
    active: Tab,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Tab::Videos)
    }
}

impl Navigator {
    #[must_use]
    pub fn new(active: Tab) -> Self {
        Self {
            videos: BackStack::new(Tab::Videos.root()),
            albums: BackStack::new(Tab::Albums.root()),
            active,
        }
    }

    /// Restores the active tab from persisted state.
    #[must_use]
    pub fn restore(state: &AppState) -> Self {
        let tab = state
            .active_tab
            .as_deref()
            .map(Tab::from_token)
            .unwrap_or_default();
        Self::new(tab)
    }

    /// Writes the active tab into `state`.
    pub fn persist(&self, state: &mut AppState) {
        state.active_tab = Some(self.active.token().to_string());
    }

    #[must_use]
    pub fn active_tab(&self) -> Tab {
        self.active
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active = tab;
    }

    #[must_use]
    pub fn stack(&self, tab: Tab) -> &BackStack {
        match tab {
            Tab::Videos => &self.videos,
            Tab::Albums => &self.albums,
        }
    }

    fn stack_mut(&mut self, tab: Tab) -> &mut BackStack {
        match tab {
            Tab::Videos => &mut self.videos,
            Tab::Albums => &mut self.albums,
        }
    }

    /// Route shown for the active tab.
    #[must_use]
    pub fn current(&self) -> &Route {
        self.stack(self.active).top()
    }

    /// Pushes onto the active tab's stack.
    pub fn push(&mut self, route: Route) {
        let tab = self.active;
        self.stack_mut(tab).push(route);
    }

    /// Opens a folder view in the albums tab and makes it active.
    pub fn open_folder(&mut self, key: GroupKey, name: impl Into<String>) {
        self.active = Tab::Albums;
        self.albums.push(Route::Folder {
            key,
            name: name.into(),
        });
    }

    /// Handles a back press.
    ///
    /// Pops the active stack. When it is already at its root and the albums
    /// tab is active, switches to the videos tab. Returns false when there
    /// was nothing to go back to and the caller should leave the app.
    pub fn back(&mut self) -> bool {
        let tab = self.active;
        if self.stack_mut(tab).pop() {
            return true;
        }
        match tab {
            Tab::Albums => {
                self.active = Tab::Videos;
                true
            }
            Tab::Videos => false,
        }
    }
}

/// What the gallery hands to the player screen.
///
/// Dimensions and duration are informational only; the player re-resolves
/// the record (and the whole playlist) from `group` and `video_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerLaunch {
    pub group: Option<GroupKey>,
    pub video_id: VideoId,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub duration_ms: u64,
}

impl PlayerLaunch {
    /// Builds a launch for `record`, played within `group` (or all videos).
    #[must_use]
    pub fn for_record(record: &VideoRecord, group: Option<GroupKey>) -> Self {
        Self {
            group,
            video_id: record.id,
            title: record.title.clone(),
            width: record.width,
            height: record.height,
            duration_ms: record.duration_ms,
        }
    }
}
