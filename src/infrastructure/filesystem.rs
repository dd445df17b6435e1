// SPDX-License-Identifier: MPL-2.0
//! Directory-backed media catalog.
//!
//! [`FsCatalog`] walks a set of library roots for video and subtitle files.
//! Read-only files stand in for items that need one-time consent before they
//! may be changed: a rename or delete of such a file is rejected with
//! [`CatalogError::ConsentRequired`], and granting the token makes the file
//! writable.

use crate::application::port::{CatalogWatch, MediaCatalog, ProbedVideo, VideoProbe};
use crate::application::query::sort_newest_first;
use crate::config::THUMBNAIL_MAX_EDGE_PX;
use crate::domain::media::{
    detect_subtitle_mime, is_subtitle_file, MediaUri, SubtitleFile, Thumbnail, VideoId,
    VideoRecord,
};
use crate::error::{CatalogError, GrantToken};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

/// Video container extensions picked up by the scan.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "m4v", "mkv", "webm", "mov", "avi", "3gp", "ts"];

/// Maps a video extension to its mime type.
#[must_use]
pub fn video_mime(extension: &str) -> Option<&'static str> {
    let mime = match extension.to_ascii_lowercase().as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "3gp" => "video/3gpp",
        "ts" => "video/mp2t",
        _ => return None,
    };
    Some(mime)
}

fn is_video_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(video_mime)
        .is_some()
}

/// Stable identifier derived from the file's path.
#[must_use]
pub fn id_for_path(path: &Path) -> u64 {
    let hash = blake3::hash(path.as_os_str().as_encoded_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Checks a rename target (without extension).
fn validate_name(name: &str) -> Result<&str, CatalogError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(['/', '\\', '\0'])
    {
        return Err(CatalogError::InvalidName(name.to_string()));
    }
    Ok(trimmed)
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct ScanResult {
    videos: Vec<PathBuf>,
    subtitles: Vec<PathBuf>,
}

/// Catalog over plain directories.
pub struct FsCatalog {
    roots: Vec<PathBuf>,
    probe: Option<Arc<dyn VideoProbe>>,
    /// Id to path, refreshed by every video query.
    paths: Mutex<HashMap<VideoId, PathBuf>>,
    /// Probe results keyed by path and modification time.
    probed: Mutex<HashMap<PathBuf, (SystemTime, ProbedVideo)>>,
    /// Outstanding consent requests.
    pending: Mutex<HashMap<u64, Vec<PathBuf>>>,
    next_request: AtomicU64,
}

impl FsCatalog {
    /// Creates a catalog over `roots` without metadata probing.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            probe: None,
            paths: Mutex::new(HashMap::new()),
            probed: Mutex::new(HashMap::new()),
            pending: Mutex::new(HashMap::new()),
            next_request: AtomicU64::new(1),
        }
    }

    /// Enables dimension/duration probing and thumbnails.
    #[must_use]
    pub fn with_probe(mut self, probe: Arc<dyn VideoProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    #[cfg(test)]
    fn pending_requests(&self) -> usize {
        lock(&self.pending).len()
    }

    fn scan(&self) -> Result<ScanResult, CatalogError> {
        let mut result = ScanResult::default();
        let mut readable_roots = 0usize;
        let mut denied = false;

        for root in &self.roots {
            match fs::read_dir(root) {
                Ok(_) => readable_roots += 1,
                Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                    denied = true;
                    continue;
                }
                Err(e) => {
                    log::warn!("skipping library root {}: {}", root.display(), e);
                    continue;
                }
            }
            walk(root, &mut result);
        }

        if denied && readable_roots == 0 {
            return Err(CatalogError::PermissionDenied);
        }
        Ok(result)
    }

    fn probe_cached(&self, path: &Path, modified: SystemTime) -> Option<ProbedVideo> {
        let probe = self.probe.as_ref()?;
        if let Some((stamp, probed)) = lock(&self.probed).get(path) {
            if *stamp == modified {
                return Some(*probed);
            }
        }
        match probe.probe(path) {
            Ok(probed) => {
                lock(&self.probed).insert(path.to_path_buf(), (modified, probed));
                Some(probed)
            }
            Err(e) => {
                log::debug!("probe failed for {}: {}", path.display(), e);
                None
            }
        }
    }

    fn record_for(&self, path: PathBuf) -> Option<VideoRecord> {
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                log::debug!("skipping {}: {}", path.display(), e);
                return None;
            }
        };
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

        let mut record = VideoRecord::new(VideoId::new(id_for_path(&path)), path);
        record.size_bytes = metadata.len();
        record.date_added_secs = DateTime::<Utc>::from(modified).timestamp();
        record.mime_type = record.extension().and_then(video_mime).map(str::to_string);

        if let Some(probed) = self.probe_cached(&record.path, modified) {
            record.width = probed.width;
            record.height = probed.height;
            record.duration_ms = probed.duration_ms;
        }
        Some(record)
    }

    /// Finds the path of `id`, rescanning once if it is not known yet.
    fn path_of(&self, id: VideoId) -> Result<PathBuf, CatalogError> {
        if let Some(path) = lock(&self.paths).get(&id) {
            return Ok(path.clone());
        }
        let scan = self.scan()?;
        let mut paths = lock(&self.paths);
        for path in scan.videos {
            paths.insert(VideoId::new(id_for_path(&path)), path);
        }
        paths.get(&id).cloned().ok_or(CatalogError::NotFound(id))
    }

    /// Rejects the write with a consent request if `path` is read-only.
    fn require_writable(&self, id: VideoId, path: &Path) -> Result<(), CatalogError> {
        let metadata = fs::metadata(path).map_err(|e| CatalogError::from_io(id, &e))?;
        if !metadata.permissions().readonly() {
            return Ok(());
        }
        let request_id = self.next_request.fetch_add(1, Ordering::Relaxed);
        lock(&self.pending).insert(request_id, vec![path.to_path_buf()]);
        log::info!(
            "write to {} needs consent (request {})",
            path.display(),
            request_id
        );
        Err(CatalogError::ConsentRequired(GrantToken::new(
            request_id,
            vec![id],
        )))
    }
}

fn walk(root: &Path, result: &mut ScanResult) {
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("cannot read {}: {}", dir.display(), e);
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                if !hidden {
                    pending.push(path);
                }
            } else if is_video_file(&path) {
                result.videos.push(path);
            } else if is_subtitle_file(&path) {
                result.subtitles.push(path);
            }
        }
    }
}

impl MediaCatalog for FsCatalog {
    fn query_videos(&self) -> Result<Vec<VideoRecord>, CatalogError> {
        let scan = self.scan()?;
        let mut videos: Vec<VideoRecord> = scan
            .videos
            .into_iter()
            .filter_map(|path| self.record_for(path))
            .collect();
        sort_newest_first(&mut videos);

        let mut paths = lock(&self.paths);
        paths.clear();
        paths.extend(videos.iter().map(|v| (v.id, v.path.clone())));
        log::debug!("catalog scan found {} videos", videos.len());
        Ok(videos)
    }

    fn query_subtitles(&self) -> Result<Vec<SubtitleFile>, CatalogError> {
        let scan = self.scan()?;
        let subtitles = scan
            .subtitles
            .into_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let size_bytes = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                SubtitleFile {
                    id: id_for_path(&path),
                    uri: MediaUri::from_path(&path),
                    mime_type: detect_subtitle_mime(&name).to_string(),
                    name,
                    size_bytes,
                }
            })
            .collect();
        Ok(subtitles)
    }

    fn subtitle_by_uri(&self, uri: &MediaUri) -> Option<SubtitleFile> {
        let path = uri.to_path()?;
        if !path.is_file() || !is_subtitle_file(&path) {
            return None;
        }
        let name = path.file_name()?.to_string_lossy().into_owned();
        Some(SubtitleFile {
            id: id_for_path(&path),
            uri: uri.clone(),
            mime_type: detect_subtitle_mime(&name).to_string(),
            size_bytes: fs::metadata(&path).map(|m| m.len()).unwrap_or(0),
            name,
        })
    }

    fn load_thumbnail(&self, id: VideoId) -> Option<Thumbnail> {
        let probe = self.probe.as_ref()?;
        let path = self.path_of(id).ok()?;
        match probe.thumbnail(&path, THUMBNAIL_MAX_EDGE_PX) {
            Ok(thumbnail) => Some(thumbnail),
            Err(e) => {
                log::debug!("no thumbnail for {}: {}", path.display(), e);
                None
            }
        }
    }

    fn rename(&self, id: VideoId, new_name: &str) -> Result<(), CatalogError> {
        let stem = validate_name(new_name)?;
        let path = self.path_of(id)?;
        self.require_writable(id, &path)?;

        let file_name = match path.extension() {
            Some(ext) => format!("{stem}.{}", ext.to_string_lossy()),
            None => stem.to_string(),
        };
        let target = path.with_file_name(file_name);
        if target != path && target.exists() {
            return Err(CatalogError::InvalidName(new_name.to_string()));
        }

        fs::rename(&path, &target).map_err(|e| CatalogError::from_io(id, &e))?;
        log::info!("renamed {} -> {}", path.display(), target.display());

        let mut paths = lock(&self.paths);
        paths.remove(&id);
        paths.insert(VideoId::new(id_for_path(&target)), target);
        Ok(())
    }

    fn delete(&self, id: VideoId) -> Result<(), CatalogError> {
        let path = self.path_of(id)?;
        self.require_writable(id, &path)?;
        fs::remove_file(&path).map_err(|e| CatalogError::from_io(id, &e))?;
        log::info!("deleted {}", path.display());
        lock(&self.paths).remove(&id);
        Ok(())
    }

    #[allow(clippy::permissions_set_readonly_false)]
    fn grant(&self, token: &GrantToken) -> Result<(), CatalogError> {
        let paths = lock(&self.pending)
            .remove(&token.request_id())
            .ok_or(CatalogError::PermissionDenied)?;
        for path in paths {
            let mut permissions = fs::metadata(&path)
                .map_err(|e| CatalogError::Io(e.to_string()))?
                .permissions();
            permissions.set_readonly(false);
            fs::set_permissions(&path, permissions).map_err(|e| CatalogError::Io(e.to_string()))?;
        }
        log::info!("consent granted for request {}", token.request_id());
        Ok(())
    }

    fn decline(&self, token: &GrantToken) {
        if lock(&self.pending).remove(&token.request_id()).is_some() {
            log::debug!("consent declined for request {}", token.request_id());
        }
    }

    fn watch(&self) -> Result<CatalogWatch, CatalogError> {
        super::watcher::watch_roots(&self.roots)
    }
}
