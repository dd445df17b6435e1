// SPDX-License-Identifier: MPL-2.0
//! Gallery state: the current video list and its folder grouping.
//!
//! Both are published through [`tokio::sync::watch`] channels. A refresh is
//! always a full replace of the list; there is no incremental diffing.
//! Refreshes may overlap; each is numbered when it starts and a result is
//! dropped if a later-started refresh has already been published.

use super::consent::{perform, Mutation, MutationOutcome};
use super::run_catalog;
use crate::application::port::{CatalogWatch, MediaCatalog};
use crate::application::query::{group_by_folder, sort_newest_first, GroupedVideos};
use crate::domain::media::{VideoId, VideoRecord};
use crate::error::CatalogError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Owns the gallery's reactive video list.
pub struct GalleryState {
    catalog: Arc<dyn MediaCatalog>,
    roots: Vec<PathBuf>,
    videos: watch::Sender<Arc<Vec<VideoRecord>>>,
    grouped: watch::Sender<Arc<GroupedVideos>>,
    fetch_generation: AtomicU64,
    /// Generation of the refresh currently on display.
    published: Mutex<u64>,
}

impl GalleryState {
    /// Creates an empty gallery over `catalog`.
    ///
    /// `roots` are the library roots; folders equal to one of them are
    /// labelled as the root group.
    pub fn new(catalog: Arc<dyn MediaCatalog>, roots: Vec<PathBuf>) -> Self {
        let (videos, _) = watch::channel(Arc::new(Vec::new()));
        let (grouped, _) = watch::channel(Arc::new(GroupedVideos::new()));
        Self {
            catalog,
            roots,
            videos,
            grouped,
            fetch_generation: AtomicU64::new(0),
            published: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn MediaCatalog> {
        &self.catalog
    }

    /// Subscribes to the flat video list (newest first).
    #[must_use]
    pub fn videos(&self) -> watch::Receiver<Arc<Vec<VideoRecord>>> {
        self.videos.subscribe()
    }

    /// Subscribes to the folder grouping.
    #[must_use]
    pub fn grouped(&self) -> watch::Receiver<Arc<GroupedVideos>> {
        self.grouped.subscribe()
    }

    /// Returns the current list without subscribing.
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<VideoRecord>> {
        self.videos.borrow().clone()
    }

    /// Queries the catalog and replaces the current list.
    ///
    /// On failure the previous list is kept. When a refresh that started
    /// later has already been published, this result is discarded.
    ///
    /// # Errors
    ///
    /// Returns the catalog error, e.g. [`CatalogError::PermissionDenied`].
    pub async fn fetch_all(&self) -> Result<usize, CatalogError> {
        let generation = self.fetch_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut videos = run_catalog(&self.catalog, |catalog| catalog.query_videos()).await?;
        sort_newest_first(&mut videos);
        let grouped = group_by_folder(&videos, &self.roots);
        let count = videos.len();

        let mut published = self.published.lock().unwrap_or_else(PoisonError::into_inner);
        if generation < *published {
            log::debug!("dropping stale gallery refresh #{generation}");
            return Ok(count);
        }
        *published = generation;
        log::debug!("gallery refreshed: {} videos in {} folders", count, grouped.len());
        self.videos.send_replace(Arc::new(videos));
        self.grouped.send_replace(Arc::new(grouped));
        Ok(count)
    }

    /// Re-fetches on every catalog change until the returned listener is dropped.
    pub fn listen_for_changes(self: &Arc<Self>, mut watch: CatalogWatch) -> ChangeListener {
        let gallery = Arc::clone(self);
        let handle = tokio::spawn(async move {
            while watch.changed().await {
                if let Err(err) = gallery.fetch_all().await {
                    log::warn!("refresh after catalog change failed: {}", err);
                }
            }
            log::debug!("catalog change stream closed");
        });
        ChangeListener { handle }
    }

    /// Renames a video, keeping its extension.
    pub async fn rename_video(&self, id: VideoId, new_name: &str) -> MutationOutcome {
        perform(
            &self.catalog,
            Mutation::Rename {
                id,
                new_name: new_name.to_string(),
            },
        )
        .await
    }

    pub async fn delete_video(&self, id: VideoId) -> MutationOutcome {
        perform(&self.catalog, Mutation::Delete { id }).await
    }
}

/// Background change subscription; aborted on drop.
#[derive(Debug)]
pub struct ChangeListener {
    handle: JoinHandle<()>,
}

impl ChangeListener {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ChangeListener {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
