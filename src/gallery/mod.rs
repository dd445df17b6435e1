// SPDX-License-Identifier: MPL-2.0
//! Gallery: the reactive video list, consent-gated mutations, storage
//! permission gating and thumbnails.
//!
//! Catalog calls are blocking and always run on tokio's blocking pool; their
//! results are published back through `watch` channels.

pub mod consent;
pub mod permission;
pub mod state;
pub mod thumbnails;

pub use consent::{Mutation, MutationOutcome, PendingConsent};
pub use permission::{PermissionGate, PermissionPrompt};
pub use state::{ChangeListener, GalleryState};
pub use thumbnails::ThumbnailCache;

use crate::application::port::MediaCatalog;
use crate::error::CatalogError;
use std::sync::Arc;

/// Runs a blocking catalog operation on the blocking pool.
pub(crate) async fn run_catalog<T, F>(catalog: &Arc<dyn MediaCatalog>, op: F) -> Result<T, CatalogError>
where
    T: Send + 'static,
    F: FnOnce(&dyn MediaCatalog) -> Result<T, CatalogError> + Send + 'static,
{
    let catalog = Arc::clone(catalog);
    tokio::task::spawn_blocking(move || op(catalog.as_ref()))
        .await
        .map_err(|e| CatalogError::Io(format!("catalog task failed: {e}")))?
}
