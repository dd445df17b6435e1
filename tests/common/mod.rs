// SPDX-License-Identifier: MPL-2.0
//! Recording fakes for the platform ports.
//!
//! Each fake shares its state through an `Arc<Mutex<_>>`, so a test keeps a
//! clone of the log while the player owns the boxed fake.

#![allow(dead_code)]

use flix::application::port::{
    CatalogNotifier, CatalogWatch, EngineState, MediaCatalog, MediaEngine, MediaSource, Notice,
    PipParams, PlayerHost, ScreenOrientation, TrackSelection,
};
use flix::domain::media::{MediaUri, SubtitleFile, Thumbnail, TrackGroup, VideoId, VideoRecord};
use flix::domain::video::{EngineRepeat, PlaybackSpeed, Progress};
use flix::error::{CatalogError, GrantToken};
use flix::preferences::{MemoryPreferences, PlayerPrefs};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

// =============================================================================
// Engine
// =============================================================================

#[derive(Debug, Default)]
pub struct EngineLog {
    pub sources: Vec<MediaSource>,
    pub index: usize,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub state: Option<EngineState>,
    pub play_when_ready: bool,
    pub playing: bool,
    pub selection: TrackSelection,
    pub speed: Option<PlaybackSpeed>,
    pub repeat: Option<EngineRepeat>,
    pub shuffle: bool,
    /// Item order used while shuffle is on; linear order when empty.
    pub shuffle_order: Vec<usize>,
    pub volume: Option<f32>,
    pub loudness_mb: Option<i32>,
    pub released: bool,
    pub calls: Vec<&'static str>,
}

impl EngineLog {
    pub fn count(&self, call: &str) -> usize {
        self.calls.iter().filter(|c| **c == call).count()
    }

    fn play_order(&self) -> Vec<usize> {
        if self.shuffle && !self.shuffle_order.is_empty() {
            self.shuffle_order.clone()
        } else {
            (0..self.sources.len()).collect()
        }
    }

    /// Neighbour of the current item in play order, `step` is +1 or -1.
    fn neighbour(&self, step: isize) -> Option<usize> {
        let order = self.play_order();
        let at = order.iter().position(|i| *i == self.index)? as isize;
        let len = order.len() as isize;
        let next = at + step;
        let wraps = self.repeat == Some(EngineRepeat::All);
        let slot = if (0..len).contains(&next) {
            next
        } else if wraps {
            next.rem_euclid(len)
        } else {
            return None;
        };
        Some(order[slot as usize])
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    log: Arc<Mutex<EngineLog>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> MutexGuard<'_, EngineLog> {
        self.log.lock().unwrap()
    }

    fn record(&self, call: &'static str) -> MutexGuard<'_, EngineLog> {
        let mut log = self.log();
        log.calls.push(call);
        log
    }
}

impl MediaEngine for FakeEngine {
    fn set_sources(&mut self, sources: Vec<MediaSource>, index: usize, position_ms: u64) {
        let mut log = self.record("set_sources");
        log.sources = sources;
        log.index = index;
        log.position_ms = position_ms;
        log.state = Some(EngineState::Idle);
    }

    fn prepare(&mut self) {
        let mut log = self.record("prepare");
        log.state = Some(EngineState::Buffering);
    }

    fn play(&mut self) {
        self.record("play").play_when_ready = true;
    }

    fn pause(&mut self) {
        self.record("pause").play_when_ready = false;
    }

    fn stop(&mut self) {
        let mut log = self.record("stop");
        log.state = Some(EngineState::Idle);
        log.playing = false;
    }

    fn release(&mut self) {
        self.record("release").released = true;
    }

    fn set_play_when_ready(&mut self, play_when_ready: bool) {
        self.record("set_play_when_ready").play_when_ready = play_when_ready;
    }

    fn play_when_ready(&self) -> bool {
        self.log().play_when_ready
    }

    fn seek_to(&mut self, position_ms: u64) {
        self.record("seek_to").position_ms = position_ms;
    }

    fn seek_to_item(&mut self, index: usize, position_ms: u64) {
        let mut log = self.record("seek_to_item");
        log.index = index;
        log.position_ms = position_ms;
    }

    fn set_speed(&mut self, speed: PlaybackSpeed) {
        self.record("set_speed").speed = Some(speed);
    }

    fn set_repeat(&mut self, repeat: EngineRepeat) {
        self.record("set_repeat").repeat = Some(repeat);
    }

    fn set_shuffle(&mut self, enabled: bool) {
        self.record("set_shuffle").shuffle = enabled;
    }

    fn set_volume(&mut self, volume: f32) {
        self.record("set_volume").volume = Some(volume);
    }

    fn set_loudness_gain(&mut self, millibels: i32) {
        self.record("set_loudness_gain").loudness_mb = Some(millibels);
    }

    fn track_selection(&self) -> TrackSelection {
        self.log().selection.clone()
    }

    fn set_track_selection(&mut self, selection: TrackSelection) {
        self.record("set_track_selection").selection = selection;
    }

    fn position_ms(&self) -> u64 {
        self.log().position_ms
    }

    fn duration_ms(&self) -> u64 {
        self.log().duration_ms
    }

    fn current_index(&self) -> usize {
        self.log().index
    }

    fn next_index(&self) -> Option<usize> {
        self.log().neighbour(1)
    }

    fn previous_index(&self) -> Option<usize> {
        self.log().neighbour(-1)
    }

    fn state(&self) -> EngineState {
        self.log().state.unwrap_or(EngineState::Idle)
    }

    fn is_playing(&self) -> bool {
        self.log().playing
    }

    fn current_tracks(&self) -> Vec<TrackGroup> {
        Vec::new()
    }
}

// =============================================================================
// Host
// =============================================================================

#[derive(Debug)]
pub struct HostLog {
    pub volume: Progress,
    pub brightness: Progress,
    pub volume_sets: Vec<Progress>,
    pub brightness_sets: Vec<Progress>,
    pub pip_allowed: bool,
    pub pip_entered: Vec<PipParams>,
    pub pip_updates: Vec<PipParams>,
    pub orientations: Vec<ScreenOrientation>,
    pub landscape: bool,
    pub keep_screen_on: bool,
    pub immersive_requests: usize,
    pub notices: Vec<Notice>,
    pub external_viewer_available: bool,
    pub external_opens: Vec<(MediaUri, String)>,
    pub finished: bool,
}

impl Default for HostLog {
    fn default() -> Self {
        Self {
            volume: Progress::new(0.5),
            brightness: Progress::new(0.5),
            volume_sets: Vec::new(),
            brightness_sets: Vec::new(),
            pip_allowed: true,
            pip_entered: Vec::new(),
            pip_updates: Vec::new(),
            orientations: Vec::new(),
            landscape: false,
            keep_screen_on: false,
            immersive_requests: 0,
            notices: Vec::new(),
            external_viewer_available: false,
            external_opens: Vec::new(),
            finished: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeHost {
    log: Arc<Mutex<HostLog>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> MutexGuard<'_, HostLog> {
        self.log.lock().unwrap()
    }
}

impl PlayerHost for FakeHost {
    fn system_volume(&self) -> Progress {
        self.log().volume
    }

    fn set_system_volume(&mut self, level: Progress) {
        let mut log = self.log();
        log.volume = level;
        log.volume_sets.push(level);
    }

    fn brightness(&self) -> Progress {
        self.log().brightness
    }

    fn set_brightness(&mut self, level: Progress) {
        let mut log = self.log();
        log.brightness = level;
        log.brightness_sets.push(level);
    }

    fn enter_pip(&mut self, params: &PipParams) -> bool {
        let mut log = self.log();
        if log.pip_allowed {
            log.pip_entered.push(*params);
        }
        log.pip_allowed
    }

    fn update_pip(&mut self, params: &PipParams) {
        self.log().pip_updates.push(*params);
    }

    fn request_orientation(&mut self, orientation: ScreenOrientation) {
        let mut log = self.log();
        match orientation {
            ScreenOrientation::Landscape => log.landscape = true,
            ScreenOrientation::Portrait => log.landscape = false,
            ScreenOrientation::FollowSensor => {}
        }
        log.orientations.push(orientation);
    }

    fn screen_is_landscape(&self) -> bool {
        self.log().landscape
    }

    fn set_keep_screen_on(&mut self, keep_on: bool) {
        self.log().keep_screen_on = keep_on;
    }

    fn set_immersive(&mut self, immersive: bool) {
        if immersive {
            self.log().immersive_requests += 1;
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.log().notices.push(notice);
    }

    fn open_external(&mut self, uri: &MediaUri, mime_type: &str) -> bool {
        let mut log = self.log();
        log.external_opens.push((uri.clone(), mime_type.to_string()));
        log.external_viewer_available
    }

    fn finish(&mut self) {
        self.log().finished = true;
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// In-memory catalog whose mutations can demand consent.
pub struct FakeCatalog {
    videos: Mutex<Vec<VideoRecord>>,
    subtitles: Mutex<Vec<SubtitleFile>>,
    /// Number of upcoming mutations that answer with `ConsentRequired`.
    pub consent_required: AtomicUsize,
    pub mutation_attempts: AtomicUsize,
    pub grants: AtomicUsize,
    pub declines: AtomicUsize,
    notifier: Mutex<Option<CatalogNotifier>>,
    video_delays: Mutex<VecDeque<Duration>>,
    subtitle_delays: Mutex<VecDeque<Duration>>,
}

impl FakeCatalog {
    pub fn new(videos: Vec<VideoRecord>) -> Self {
        Self {
            videos: Mutex::new(videos),
            subtitles: Mutex::new(Vec::new()),
            consent_required: AtomicUsize::new(0),
            mutation_attempts: AtomicUsize::new(0),
            grants: AtomicUsize::new(0),
            declines: AtomicUsize::new(0),
            notifier: Mutex::new(None),
            video_delays: Mutex::new(VecDeque::new()),
            subtitle_delays: Mutex::new(VecDeque::new()),
        }
    }

    /// Makes the next video queries take these durations, in call order.
    /// Each query reads the list before it sleeps.
    pub fn delay_video_queries(&self, delays: impl IntoIterator<Item = Duration>) {
        self.video_delays.lock().unwrap().extend(delays);
    }

    /// Same as [`delay_video_queries`](Self::delay_video_queries) for subtitles.
    pub fn delay_subtitle_queries(&self, delays: impl IntoIterator<Item = Duration>) {
        self.subtitle_delays.lock().unwrap().extend(delays);
    }

    fn pause(delays: &Mutex<VecDeque<Duration>>) {
        let delay = delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
    }

    pub fn set_subtitles(&self, subtitles: Vec<SubtitleFile>) {
        *self.subtitles.lock().unwrap() = subtitles;
    }

    pub fn push_video(&self, video: VideoRecord) {
        self.videos.lock().unwrap().push(video);
    }

    /// Signals the last watch, as an external change would.
    pub fn notify(&self) -> bool {
        self.notifier
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(CatalogNotifier::notify)
    }

    fn mutate(
        &self,
        id: VideoId,
        op: impl FnOnce(&mut Vec<VideoRecord>, usize),
    ) -> Result<(), CatalogError> {
        self.mutation_attempts.fetch_add(1, Ordering::SeqCst);
        if self
            .consent_required
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(CatalogError::ConsentRequired(GrantToken::new(1, vec![id])));
        }
        let mut videos = self.videos.lock().unwrap();
        let index = videos
            .iter()
            .position(|v| v.id == id)
            .ok_or(CatalogError::NotFound(id))?;
        op(&mut videos, index);
        Ok(())
    }
}

impl MediaCatalog for FakeCatalog {
    fn query_videos(&self) -> Result<Vec<VideoRecord>, CatalogError> {
        let videos = self.videos.lock().unwrap().clone();
        Self::pause(&self.video_delays);
        Ok(videos)
    }

    fn query_subtitles(&self) -> Result<Vec<SubtitleFile>, CatalogError> {
        let subtitles = self.subtitles.lock().unwrap().clone();
        Self::pause(&self.subtitle_delays);
        Ok(subtitles)
    }

    fn load_thumbnail(&self, _id: VideoId) -> Option<Thumbnail> {
        None
    }

    fn rename(&self, id: VideoId, new_name: &str) -> Result<(), CatalogError> {
        self.mutate(id, |videos, index| {
            videos[index].display_name = new_name.to_string();
        })
    }

    fn delete(&self, id: VideoId) -> Result<(), CatalogError> {
        self.mutate(id, |videos, index| {
            videos.remove(index);
        })
    }

    fn grant(&self, _token: &GrantToken) -> Result<(), CatalogError> {
        self.grants.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn decline(&self, _token: &GrantToken) {
        self.declines.fetch_add(1, Ordering::SeqCst);
    }

    fn watch(&self) -> Result<CatalogWatch, CatalogError> {
        let (notifier, watch) = CatalogWatch::channel();
        *self.notifier.lock().unwrap() = Some(notifier);
        Ok(watch)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

pub fn video(id: u64, path: &str, date_added_secs: i64) -> VideoRecord {
    let mut record = VideoRecord::new(VideoId::new(id), path);
    record.date_added_secs = date_added_secs;
    record.width = 1920;
    record.height = 1080;
    record.duration_ms = 60_000;
    record.mime_type = Some("video/mp4".to_string());
    record
}

/// Three videos in `/storage/Movies`, listed in playback order.
pub fn movies() -> Vec<VideoRecord> {
    vec![
        video(1, "/storage/Movies/a.mp4", 300),
        video(2, "/storage/Movies/b.mp4", 200),
        video(3, "/storage/Movies/c.mp4", 100),
    ]
}

pub fn memory_prefs() -> PlayerPrefs {
    PlayerPrefs::new(Arc::new(MemoryPreferences::new()))
}

pub fn subtitle(uri: &str) -> SubtitleFile {
    let name = uri.rsplit('/').next().unwrap_or_default().to_string();
    SubtitleFile {
        id: 1,
        uri: MediaUri::new(uri),
        mime_type: flix::domain::media::detect_subtitle_mime(&name).to_string(),
        name,
        size_bytes: 100,
    }
}
