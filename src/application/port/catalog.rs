// SPDX-License-Identifier: MPL-2.0
//! Media catalog port definition.
//!
//! The catalog enumerates videos and subtitle files, decodes thumbnails and
//! performs the two mutating operations the gallery offers (rename, delete).
//! Mutations may be rejected with [`CatalogError::ConsentRequired`]; the caller
//! then runs the consent flow and calls [`MediaCatalog::grant`] before
//! retrying the identical operation.
//!
//! # Design Notes
//!
//! - Methods are blocking; callers move them onto a blocking pool
//! - Change notifications are pushed through a [`CatalogWatch`]; dropping
//!   the watch ends the subscription

use crate::domain::media::{MediaUri, SubtitleFile, Thumbnail, VideoId, VideoRecord};
use crate::error::{CatalogError, GrantToken};
use tokio::sync::mpsc;

/// Port for the media catalog.
pub trait MediaCatalog: Send + Sync {
    /// Lists every video, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::PermissionDenied`] when the library cannot be read at all.
    fn query_videos(&self) -> Result<Vec<VideoRecord>, CatalogError>;

    /// Lists every subtitle file known to the catalog.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`MediaCatalog::query_videos`].
    fn query_subtitles(&self) -> Result<Vec<SubtitleFile>, CatalogError>;

    /// Looks up one subtitle file by locator.
    fn subtitle_by_uri(&self, uri: &MediaUri) -> Option<SubtitleFile> {
        self.query_subtitles()
            .ok()?
            .into_iter()
            .find(|subtitle| &subtitle.uri == uri)
    }

    /// Decodes the thumbnail of a video. Absence is not an error.
    fn load_thumbnail(&self, id: VideoId) -> Option<Thumbnail>;

    /// Renames a video, keeping its original extension.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ConsentRequired`] when the write needs one-time consent.
    fn rename(&self, id: VideoId, new_name: &str) -> Result<(), CatalogError>;

    /// Deletes a video.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ConsentRequired`] when the write needs one-time consent.
    fn delete(&self, id: VideoId) -> Result<(), CatalogError>;

    /// Completes the consent flow for a previously rejected mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if the grant could not be applied.
    fn grant(&self, token: &GrantToken) -> Result<(), CatalogError>;

    /// Forgets a consent request the user declined. Unknown tokens are ignored.
    fn decline(&self, token: &GrantToken);

    /// Subscribes to change notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying change source cannot be registered.
    fn watch(&self) -> Result<CatalogWatch, CatalogError>;
}

/// Sending half of a change subscription.
#[derive(Debug, Clone)]
pub struct CatalogNotifier {
    sender: mpsc::UnboundedSender<()>,
}

impl CatalogNotifier {
    /// Signals a change. Returns false once the watch has been dropped.
    pub fn notify(&self) -> bool {
        self.sender.send(()).is_ok()
    }
}

/// Receiving half of a change subscription.
///
/// Owns whatever keeps the underlying source alive (for example a file
/// system watcher); dropping the watch unregisters it.
pub struct CatalogWatch {
    receiver: mpsc::UnboundedReceiver<()>,
    _source: Option<Box<dyn Send>>,
}

impl std::fmt::Debug for CatalogWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogWatch").finish_non_exhaustive()
    }
}

impl CatalogWatch {
    /// Creates a connected notifier/watch pair with no source to keep alive.
    #[must_use]
    pub fn channel() -> (CatalogNotifier, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            CatalogNotifier { sender },
            Self {
                receiver,
                _source: None,
            },
        )
    }

    /// Attaches the resource that produces notifications for this watch.
    #[must_use]
    pub fn with_source(mut self, source: impl Send + 'static) -> Self {
        self._source = Some(Box::new(source));
        self
    }

    /// Waits for the next change.
    ///
    /// A burst of notifications is coalesced into one. Returns false when
    /// every notifier is gone.
    pub async fn changed(&mut self) -> bool {
        if self.receiver.recv().await.is_none() {
            return false;
        }
        while self.receiver.try_recv().is_ok() {}
        true
    }
}
