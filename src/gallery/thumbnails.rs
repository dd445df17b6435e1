// SPDX-License-Identifier: MPL-2.0
//! LRU cache of decoded thumbnails.
//!
//! Loads run on the blocking pool. A missing thumbnail is not cached so a
//! later request can pick up one that appeared in the meantime.

use super::run_catalog;
use crate::application::port::MediaCatalog;
use crate::config::THUMBNAIL_CACHE_CAPACITY;
use crate::domain::media::{Thumbnail, VideoId};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, PoisonError};

/// Thread-safe thumbnail cache keyed by video id.
pub struct ThumbnailCache {
    entries: Mutex<LruCache<VideoId, Thumbnail>>,
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new(THUMBNAIL_CACHE_CAPACITY)
    }
}

impl ThumbnailCache {
    /// Creates a cache holding at most `capacity` thumbnails (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    #[must_use]
    pub fn get(&self, id: VideoId) -> Option<Thumbnail> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn insert(&self, id: VideoId, thumbnail: Thumbnail) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .put(id, thumbnail);
    }

    /// Drops every cached thumbnail.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached thumbnail or loads it from the catalog.
    pub async fn get_or_load(
        &self,
        catalog: &Arc<dyn MediaCatalog>,
        id: VideoId,
    ) -> Option<Thumbnail> {
        if let Some(hit) = self.get(id) {
            return Some(hit);
        }
        let loaded = run_catalog(catalog, move |catalog| Ok(catalog.load_thumbnail(id)))
            .await
            .ok()
            .flatten()?;
        self.insert(id, loaded.clone());
        Some(loaded)
    }
}
