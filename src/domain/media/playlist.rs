// SPDX-License-Identifier: MPL-2.0
//! The play queue handed to the player.

use super::types::VideoRecord;

/// Ordered play queue plus the active item.
///
/// The queue is never empty and the active index is always in bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistContext {
    items: Vec<VideoRecord>,
    index: usize,
}

impl PlaylistContext {
    /// Creates a playlist, clamping `index` into bounds.
    ///
    /// Returns `None` for an empty queue.
    #[must_use]
    pub fn new(items: Vec<VideoRecord>, index: usize) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        let index = index.min(items.len() - 1);
        Some(Self { items, index })
    }

    #[must_use]
    pub fn items(&self) -> &[VideoRecord] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn current(&self) -> &VideoRecord {
        &self.items[self.index]
    }

    pub fn current_mut(&mut self) -> &mut VideoRecord {
        &mut self.items[self.index]
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&VideoRecord> {
        self.items.get(index)
    }

    /// Moves the active item. Out-of-range indices are rejected.
    pub fn set_index(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.index = index;
            true
        } else {
            false
        }
    }
}
