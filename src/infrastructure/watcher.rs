// SPDX-License-Identifier: MPL-2.0
//! File system change notifications for library roots.

use crate::application::port::{CatalogNotifier, CatalogWatch};
use crate::error::CatalogError;
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecursiveMode, Watcher};
use std::path::PathBuf;

/// Returns true for events that can change the catalog's contents.
///
/// Content writes to an existing file do not add or remove entries and are
/// ignored; renames, creations and removals are not.
#[must_use]
pub fn is_library_change(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}

fn forward(notifier: &CatalogNotifier, result: notify::Result<Event>) {
    match result {
        Ok(event) if is_library_change(&event) => {
            log::debug!("library change: {:?} {:?}", event.kind, event.paths);
            notifier.notify();
        }
        Ok(_) => {}
        Err(e) => log::warn!("file watcher error: {}", e),
    }
}

/// Watches every existing root recursively.
///
/// Roots that do not exist are skipped with a warning. The returned watch
/// owns the watcher; dropping it stops the notifications.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the platform watcher cannot be created.
pub fn watch_roots(roots: &[PathBuf]) -> Result<CatalogWatch, CatalogError> {
    let (notifier, watch) = CatalogWatch::channel();
    let mut watcher = notify::recommended_watcher(move |result| forward(&notifier, result))
        .map_err(|e| CatalogError::Io(format!("cannot create file watcher: {e}")))?;

    for root in roots {
        if let Err(e) = watcher.watch(root, RecursiveMode::Recursive) {
            log::warn!("cannot watch {}: {}", root.display(), e);
        }
    }

    Ok(watch.with_source(watcher))
}
