// SPDX-License-Identifier: MPL-2.0
//! The player state machine.
//!
//! [`PlayerStateMachine`] exclusively owns the media engine and the host
//! handle for one player screen. It has three entry points, all called from
//! the same loop: [`handle_message`] for user and lifecycle input,
//! [`handle_engine_event`] for engine events (in emission order) and
//! [`tick`] when a timer deadline passes. Nothing here spawns tasks or
//! sleeps; time is passed in.
//!
//! [`handle_message`]: PlayerStateMachine::handle_message
//! [`handle_engine_event`]: PlayerStateMachine::handle_engine_event
//! [`tick`]: PlayerStateMachine::tick

use super::controls::ControlsVisibility;
use super::gestures::{step_seek_target, DragGesture, DragTarget, SeekDirection, SeekFlash};
use super::message::{ControlSignal, PlayerMessage};
use super::orientation::OrientationController;
use super::pip::PipController;
use super::progress::ProgressTracker;
use super::timer::{earliest, Flash};
use super::tracks;
use crate::application::port::{
    EngineEvent, EngineState, MediaEngine, MediaSource, Notice, PlayerHost, TransitionReason,
};
use crate::application::query::resolve_playlist;
use crate::config::{Config, MAX_LOUDNESS_GAIN_MB, MIN_LOUDNESS_GAIN_MB, POST_DRAG_FLASH_MS};
use crate::domain::media::{
    AudioTrack, MediaUri, PlaylistContext, SubtitleFile, SubtitleTrack, TrackGroup, TrackId,
    TrackKind, VideoRecord,
};
use crate::domain::video::{PlaybackSpeed, PlaybackState, Progress, RepeatMode, SeekStep};
use crate::error::VideoError;
use crate::navigation::PlayerLaunch;
use crate::preferences::PlayerPrefs;
use std::time::Duration;
use tokio::time::Instant;

/// Mime type used for the external-viewer hand-off when the record has none.
const FALLBACK_VIDEO_MIME: &str = "video/*";

/// Tunable intervals and distances of the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTimings {
    pub controls_timeout: Duration,
    pub seek_step: SeekStep,
    pub volume_flash: Duration,
    pub post_drag_flash: Duration,
    pub drag_track_height_px: f32,
}

impl PlayerTimings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            controls_timeout: config.controls_timeout(),
            seek_step: config.seek_step(),
            volume_flash: config.volume_flash(),
            post_drag_flash: Duration::from_millis(POST_DRAG_FLASH_MS),
            drag_track_height_px: config.drag_track_height(),
        }
    }
}

impl Default for PlayerTimings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Everything a player screen renders.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSnapshot {
    pub state: PlaybackState,
    pub is_playing: bool,
    pub current: Option<VideoRecord>,
    pub index: usize,
    pub playlist_len: usize,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub progress: Progress,
    pub controls_visible: bool,
    pub seek_flash: Option<SeekDirection>,
    /// Active drag and its current value.
    pub drag: Option<(DragTarget, Progress)>,
    /// Last drag value, shown briefly after the drag ended.
    pub post_drag_flash: Option<(DragTarget, Progress)>,
    /// System volume shown after a hardware key press.
    pub volume_flash: Option<Progress>,
    pub repeat_mode: RepeatMode,
    pub speed: PlaybackSpeed,
    pub muted: bool,
    pub loudness_gain_mb: i32,
    pub audio_only: bool,
    pub subtitles_enabled: bool,
    pub orientation_locked: bool,
    pub pip_active: bool,
    pub current_audio: Option<AudioTrack>,
    pub current_subtitle: Option<SubtitleTrack>,
    pub local_subtitles: Vec<SubtitleFile>,
    pub current_local_subtitle: Option<SubtitleFile>,
    pub finished: bool,
}

/// Player state for one screen.
pub struct PlayerStateMachine {
    engine: Box<dyn MediaEngine>,
    host: Box<dyn PlayerHost>,
    prefs: PlayerPrefs,
    timings: PlayerTimings,

    playlist: Option<PlaylistContext>,
    state: PlaybackState,
    is_playing: bool,

    controls: ControlsVisibility,
    seek_flash: SeekFlash,
    drag: DragGesture,
    post_drag_flash: Flash<(DragTarget, Progress)>,
    volume_flash: Flash<Progress>,
    progress: ProgressTracker,
    orientation: OrientationController,
    pip: PipController,

    repeat_mode: RepeatMode,
    speed: PlaybackSpeed,
    muted: bool,
    loudness_gain_mb: i32,
    audio_only: bool,
    subtitles_enabled: bool,

    current_audio: Option<AudioTrack>,
    current_subtitle: Option<SubtitleTrack>,
    local_subtitles: Vec<SubtitleFile>,
    current_local_subtitle: Option<SubtitleFile>,

    finished: bool,
    released: bool,
}

impl PlayerStateMachine {
    /// Creates a player with persisted settings applied but nothing loaded.
    pub fn new(
        engine: Box<dyn MediaEngine>,
        host: Box<dyn PlayerHost>,
        prefs: PlayerPrefs,
        timings: PlayerTimings,
    ) -> Self {
        let settings = &prefs.settings;
        let repeat_mode = settings.repeat_mode();
        let speed = settings.playback_speed();
        let audio_only = settings.audio_only();
        let subtitles_enabled = settings.subtitles_enabled();

        Self {
            engine,
            host,
            timings,
            playlist: None,
            state: PlaybackState::Loading,
            is_playing: false,
            controls: ControlsVisibility::new(timings.controls_timeout),
            seek_flash: SeekFlash::default(),
            drag: DragGesture::new(timings.drag_track_height_px),
            post_drag_flash: Flash::new(),
            volume_flash: Flash::new(),
            progress: ProgressTracker::new(),
            orientation: OrientationController::new(),
            pip: PipController::new(),
            repeat_mode,
            speed,
            muted: false,
            loudness_gain_mb: MIN_LOUDNESS_GAIN_MB,
            audio_only,
            subtitles_enabled,
            current_audio: None,
            current_subtitle: None,
            local_subtitles: Vec::new(),
            current_local_subtitle: None,
            finished: false,
            released: false,
            prefs,
        }
    }

    /// Resolves the play queue for `launch` and starts playback.
    ///
    /// The launch only names the group and the video; everything else is
    /// taken from `videos`. Returns false when the group is empty.
    pub fn load(
        &mut self,
        videos: &[VideoRecord],
        launch: &PlayerLaunch,
        subtitles: Vec<SubtitleFile>,
        now: Instant,
    ) -> bool {
        if self.released {
            return false;
        }
        self.local_subtitles = subtitles;

        let Some(playlist) = resolve_playlist(videos, launch.group.as_ref(), launch.video_id)
        else {
            log::warn!("nothing to play for video {}", launch.video_id);
            self.state = PlaybackState::Idle;
            return false;
        };

        let current = playlist.current();
        let start_ms = self.prefs.positions.get(&current.uri);
        self.pip.set_video_size(current.width, current.height);
        self.current_local_subtitle = self
            .prefs
            .subtitles
            .get(&current.uri)
            .map(|uri| tracks::subtitle_for_uri(&uri, &self.local_subtitles));

        let sources = self.build_sources(playlist.items());
        log::info!(
            "playing {} ({} of {}) from {} ms",
            current.display_name,
            playlist.index() + 1,
            playlist.len(),
            start_ms
        );
        self.engine.set_sources(sources, playlist.index(), start_ms);
        self.playlist = Some(playlist);

        self.apply_repeat_mode();
        let selection =
            tracks::with_subtitles_enabled(self.engine.track_selection(), self.subtitles_enabled);
        self.engine.set_track_selection(selection);
        self.engine.set_speed(self.speed);
        self.engine.prepare();
        self.engine.set_play_when_ready(true);
        self.engine.play();

        self.state = PlaybackState::Loading;
        self.controls.show(now, false);
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[must_use]
    pub fn playlist(&self) -> Option<&PlaylistContext> {
        self.playlist.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// True while the progress sampling loop should run.
    #[must_use]
    pub fn progress_running(&self) -> bool {
        !self.released && self.progress.is_running()
    }

    /// Earliest pending timer deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.released {
            return None;
        }
        earliest([
            self.controls.hide_deadline(),
            self.post_drag_flash.deadline(),
            self.volume_flash.deadline(),
        ])
    }

    fn current_uri(&self) -> Option<MediaUri> {
        self.playlist.as_ref().map(|p| p.current().uri.clone())
    }

    fn duration_ms(&self) -> u64 {
        let engine = self.engine.duration_ms();
        if engine > 0 {
            return engine;
        }
        self.playlist
            .as_ref()
            .map_or(0, |p| p.current().duration_ms)
    }

    fn is_paused(&self) -> bool {
        !self.engine.play_when_ready()
    }

    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state,
            is_playing: self.is_playing,
            current: self.playlist.as_ref().map(|p| p.current().clone()),
            index: self.playlist.as_ref().map_or(0, PlaylistContext::index),
            playlist_len: self.playlist.as_ref().map_or(0, PlaylistContext::len),
            position_ms: self.progress.position_ms(),
            duration_ms: self.duration_ms(),
            progress: self.progress.progress(),
            controls_visible: self.controls.is_visible(),
            seek_flash: self.seek_flash.active(),
            drag: self.drag.active_target().zip(self.drag.progress()),
            post_drag_flash: self.post_drag_flash.value().copied(),
            volume_flash: self.volume_flash.value().copied(),
            repeat_mode: self.repeat_mode,
            speed: self.speed,
            muted: self.muted,
            loudness_gain_mb: self.loudness_gain_mb,
            audio_only: self.audio_only,
            subtitles_enabled: self.subtitles_enabled,
            orientation_locked: self.orientation.is_locked(),
            pip_active: self.pip.is_active(),
            current_audio: self.current_audio.clone(),
            current_subtitle: self.current_subtitle.clone(),
            local_subtitles: self.local_subtitles.clone(),
            current_local_subtitle: self.current_local_subtitle.clone(),
            finished: self.finished,
        }
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Fires every timer whose deadline has passed. Returns true if anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.released {
            return false;
        }
        let mut changed = false;
        if self.controls.tick(now) {
            self.host.set_immersive(true);
            changed = true;
        }
        changed |= self.post_drag_flash.tick(now);
        changed |= self.volume_flash.tick(now);
        changed
    }

    /// Polls the engine position for the slider. Returns true if it moved.
    pub fn sample_progress(&mut self) -> bool {
        if self.released {
            return false;
        }
        let position = self.engine.position_ms();
        let duration = self.duration_ms();
        self.progress.sample(position, duration)
    }

    // =========================================================================
    // Engine events
    // =========================================================================

    pub fn handle_engine_event(&mut self, event: EngineEvent, now: Instant) {
        if self.released {
            return;
        }
        match event {
            EngineEvent::StateChanged(state) => self.on_engine_state(state, now),
            EngineEvent::IsPlayingChanged(playing) => self.on_is_playing(playing, now),
            EngineEvent::TracksChanged(groups) => self.on_tracks_changed(groups),
            EngineEvent::ItemTransitioned { index, reason } => self.on_transition(index, reason),
            EngineEvent::VolumeChanged { level } => self.on_volume_key(level, now),
            EngineEvent::Error(error) => self.on_error(error),
        }
    }

    fn on_engine_state(&mut self, state: EngineState, now: Instant) {
        match state {
            EngineState::Idle => {
                self.host.set_keep_screen_on(false);
                if !self.state.is_error() {
                    self.state = PlaybackState::Idle;
                }
            }
            EngineState::Buffering => {
                self.host.set_keep_screen_on(true);
                self.state = PlaybackState::Buffering;
            }
            EngineState::Ready => {
                if self.seek_flash.clear() {
                    let position = self.engine.position_ms();
                    let duration = self.duration_ms();
                    self.progress.resync(position, duration);
                }
                let playing = self.engine.is_playing();
                self.host.set_keep_screen_on(playing);
                self.state = if playing {
                    PlaybackState::Playing
                } else {
                    PlaybackState::Paused
                };
            }
            EngineState::Ended => self.on_playlist_end(now),
        }
    }

    /// Natural end of the queue: rewind to the first item and wait paused.
    fn on_playlist_end(&mut self, now: Instant) {
        self.progress.stop();
        if let Some(uri) = self.current_uri() {
            self.prefs.positions.clear(&uri);
        }
        self.engine.stop();
        self.engine.set_play_when_ready(false);
        self.host.set_keep_screen_on(false);
        self.engine.seek_to_item(0, 0);
        self.engine.prepare();
        self.progress.reset();
        if let Some(playlist) = self.playlist.as_mut() {
            playlist.set_index(0);
        }
        self.is_playing = false;
        self.state = PlaybackState::Ended;
        self.controls.show(now, true);
        log::debug!("playlist ended, rewound to the first item");
    }

    fn on_is_playing(&mut self, playing: bool, now: Instant) {
        self.is_playing = playing;
        let intends_to_play = self.engine.play_when_ready();
        if intends_to_play {
            self.progress.start();
        } else {
            self.progress.stop();
            self.save_position();
        }

        if playing {
            self.state = PlaybackState::Playing;
        } else if self.state.is_playing() {
            self.state = PlaybackState::Paused;
        }
        if self.engine.state() == EngineState::Ready {
            self.host.set_keep_screen_on(playing);
        }
        self.controls.on_paused_changed(now, !intends_to_play);

        if self.pip.is_active() {
            self.host.update_pip(&self.pip.params(playing));
        }
    }

    fn on_tracks_changed(&mut self, groups: Vec<TrackGroup>) {
        self.current_audio = AudioTrack::selected(&groups);
        self.current_subtitle = SubtitleTrack::selected(&groups);

        let Some(playlist) = self.playlist.as_mut() else {
            return;
        };
        let record = playlist.current_mut();
        record.audio_tracks = AudioTrack::list(&groups);
        record.subtitle_tracks = SubtitleTrack::list(&groups);

        if let Some(saved) = self.prefs.audio_tracks.get(&record.uri) {
            let selection = self.engine.track_selection();
            if tracks::has_track(&groups, TrackKind::Audio, saved)
                && selection.override_for(TrackKind::Audio) != Some(saved)
            {
                log::debug!("restoring audio track {} for {}", saved.to_pref_value(), record.uri);
                self.engine
                    .set_track_selection(tracks::with_audio_track(selection, saved));
            }
        }
    }

    fn on_transition(&mut self, index: usize, reason: TransitionReason) {
        let Some(playlist) = self.playlist.as_mut() else {
            return;
        };
        let finished_uri = playlist.current().uri.clone();
        if !playlist.set_index(index) {
            log::warn!("engine moved to unknown item {index}");
            return;
        }
        let next = playlist.current();
        let next_uri = next.uri.clone();
        self.pip.set_video_size(next.width, next.height);
        self.current_local_subtitle = self
            .prefs
            .subtitles
            .get(&next_uri)
            .map(|uri| tracks::subtitle_for_uri(&uri, &self.local_subtitles));

        if matches!(reason, TransitionReason::Auto | TransitionReason::Repeat) {
            self.prefs.positions.clear(&finished_uri);
            let resume = self.prefs.positions.get(&next_uri);
            if resume > 0 {
                self.engine.seek_to(resume);
            }
        }

        let position = self.engine.position_ms();
        let duration = self.duration_ms();
        self.progress.resync(position, duration);
    }

    fn on_volume_key(&mut self, level: Progress, now: Instant) {
        if self.drag.active_target() == Some(DragTarget::Volume) {
            return;
        }
        if matches!(self.post_drag_flash.value(), Some((DragTarget::Volume, _))) {
            self.post_drag_flash.cancel();
        }
        self.volume_flash.show(now, level, self.timings.volume_flash);
    }

    fn on_error(&mut self, error: VideoError) {
        log::warn!("playback failed ({}): {}", error.message_key(), error);
        self.state = PlaybackState::Error;
        self.is_playing = false;
        self.progress.stop();
        self.host.set_keep_screen_on(false);
        self.host.notify(Notice::PlaybackFailed(error));

        let Some(current) = self.playlist.as_ref().map(PlaylistContext::current) else {
            return;
        };
        let mime = current.mime_type.as_deref().unwrap_or(FALLBACK_VIDEO_MIME);
        if !self.host.open_external(&current.uri, mime) {
            self.host.notify(Notice::NoExternalViewer);
        }
    }

    // =========================================================================
    // Messages
    // =========================================================================

    pub fn handle_message(&mut self, message: PlayerMessage, now: Instant) {
        if self.released {
            return;
        }
        match message {
            PlayerMessage::SurfaceTapped => {
                let paused = self.is_paused();
                if !self.controls.toggle(now, paused) {
                    self.host.set_immersive(true);
                }
            }
            PlayerMessage::DoubleTapped { x_fraction } => {
                let direction = SeekDirection::from_tap(x_fraction);
                if self.step_seek(direction) {
                    self.seek_flash.set(direction);
                }
            }
            PlayerMessage::SeekForward => {
                self.step_seek(SeekDirection::Forward);
                self.controls.touch(now, self.is_paused());
            }
            PlayerMessage::SeekBackward => {
                self.step_seek(SeekDirection::Backward);
                self.controls.touch(now, self.is_paused());
            }
            PlayerMessage::DragStarted {
                x_fraction,
                y_fraction,
            } => {
                if let Some(target) = DragGesture::target_at(x_fraction, y_fraction) {
                    let seed = match target {
                        DragTarget::Volume => self.host.system_volume(),
                        DragTarget::Brightness => self.host.brightness(),
                    };
                    self.post_drag_flash.cancel();
                    self.drag.begin(target, seed);
                }
            }
            PlayerMessage::DragMoved { delta_y_px } => {
                if let Some((target, value)) = self.drag.update(delta_y_px) {
                    match target {
                        DragTarget::Volume => self.host.set_system_volume(value),
                        DragTarget::Brightness => self.host.set_brightness(value),
                    }
                }
            }
            PlayerMessage::DragEnded => {
                if let Some(last) = self.drag.end() {
                    self.post_drag_flash
                        .show(now, last, self.timings.post_drag_flash);
                }
            }
            PlayerMessage::TogglePlayPause => self.toggle_play_pause(now),
            PlayerMessage::NextItem => self.step_item(true),
            PlayerMessage::PreviousItem => self.step_item(false),
            PlayerMessage::ScrubStarted => {
                self.progress.scrub_start();
                self.controls.touch(now, self.is_paused());
            }
            PlayerMessage::ScrubChanged(value) => {
                let duration = self.duration_ms();
                self.progress.scrub_change(value, duration);
                self.controls.touch(now, self.is_paused());
            }
            PlayerMessage::ScrubFinished => {
                let duration = self.duration_ms();
                let target = self.progress.scrub_finish(duration);
                self.engine.seek_to(target);
                if self.engine.state() == EngineState::Idle {
                    self.engine.prepare();
                    self.engine.set_play_when_ready(true);
                }
            }
            PlayerMessage::SetRepeatMode(mode) => {
                self.repeat_mode = mode;
                self.prefs.settings.set_repeat_mode(mode);
                self.apply_repeat_mode();
            }
            PlayerMessage::SetSpeed(speed) => {
                self.speed = speed;
                self.prefs.settings.set_playback_speed(speed);
                self.engine.set_speed(speed);
            }
            PlayerMessage::ToggleMute => {
                self.muted = !self.muted;
                self.engine.set_volume(if self.muted { 0.0 } else { 1.0 });
            }
            PlayerMessage::SetLoudnessGain(millibels) => {
                self.loudness_gain_mb = millibels.clamp(MIN_LOUDNESS_GAIN_MB, MAX_LOUDNESS_GAIN_MB);
                self.engine.set_loudness_gain(self.loudness_gain_mb);
            }
            PlayerMessage::ToggleAudioOnly => {
                self.audio_only = !self.audio_only;
                self.prefs.settings.set_audio_only(self.audio_only);
            }
            PlayerMessage::SetSubtitlesEnabled(enabled) => {
                self.subtitles_enabled = enabled;
                self.prefs.settings.set_subtitles_enabled(enabled);
                let selection =
                    tracks::with_subtitles_enabled(self.engine.track_selection(), enabled);
                self.engine.set_track_selection(selection);
            }
            PlayerMessage::SelectAudioTrack(id) => {
                self.select_audio_track(id);
                self.controls.show(now, self.is_paused());
            }
            PlayerMessage::SelectSubtitleTrack(id) => {
                self.select_subtitle_track(id);
                self.controls.show(now, self.is_paused());
            }
            PlayerMessage::SelectLocalSubtitle(uri) => {
                self.select_local_subtitle(&uri);
                self.controls.show(now, self.is_paused());
            }
            PlayerMessage::SubtitleFilesChanged(files) => {
                self.local_subtitles = files;
            }
            PlayerMessage::RotatePressed => {
                let request = self.orientation.rotate(self.host.screen_is_landscape());
                self.host.request_orientation(request);
                self.controls.touch(now, self.is_paused());
            }
            PlayerMessage::ToggleOrientationLock => {
                if self.orientation.toggle_lock() && self.controls.hide() {
                    self.host.set_immersive(true);
                }
            }
            PlayerMessage::DeviceRotated { degrees } => {
                if let Some(request) = self.orientation.on_sensor(degrees) {
                    self.host.request_orientation(request);
                }
            }
            PlayerMessage::SurfaceLaidOut(rect) => self.pip.set_surface(rect),
            PlayerMessage::UserLeaveHint => {
                if self.engine.is_playing() {
                    let params = self.pip.params(true);
                    if self.host.enter_pip(&params) {
                        self.pip.set_active(true);
                    }
                }
            }
            PlayerMessage::PipModeChanged(active) => self.pip.set_active(active),
            PlayerMessage::Backgrounded => {
                self.save_position();
                self.engine.pause();
            }
            PlayerMessage::Resumed => self.controls.show(now, self.is_paused()),
            PlayerMessage::Control(signal) => self.handle_control(signal),
        }
    }

    fn handle_control(&mut self, signal: ControlSignal) {
        match signal {
            ControlSignal::Play => self.engine.play(),
            ControlSignal::Pause => {
                self.save_position();
                self.engine.pause();
            }
            ControlSignal::Close => {}
        }
        if self.pip.is_active() {
            let params = self.pip.params(self.engine.play_when_ready());
            self.host.update_pip(&params);
        }
        if signal == ControlSignal::Close {
            self.finished = true;
            self.host.finish();
        }
    }

    fn toggle_play_pause(&mut self, now: Instant) {
        if self.engine.is_playing() {
            self.save_position();
            self.engine.pause();
        } else if self.engine.state() == EngineState::Idle {
            self.engine.seek_to(0);
            self.engine.prepare();
            self.engine.set_play_when_ready(true);
        } else {
            self.engine.play();
        }
        self.controls.show(now, self.is_paused());
    }

    /// Seeks by the configured step. Returns false at the boundary.
    fn step_seek(&mut self, direction: SeekDirection) -> bool {
        let position = self.engine.position_ms();
        let duration = self.duration_ms();
        match step_seek_target(position, duration, self.timings.seek_step, direction) {
            Some(target) => {
                self.engine.seek_to(target);
                true
            }
            None => false,
        }
    }

    /// Moves to the neighbouring item, saving the current position first.
    ///
    /// The engine picks the target from the item it is on, in shuffle order
    /// when shuffle is enabled.
    fn step_item(&mut self, forward: bool) {
        let Some(playlist) = self.playlist.as_ref() else {
            return;
        };
        let target = if forward {
            self.engine.next_index()
        } else {
            self.engine.previous_index()
        };
        let Some(target) = target.filter(|t| *t != self.engine.current_index()) else {
            return;
        };
        let Some(resume) = playlist
            .get(target)
            .map(|record| self.prefs.positions.get(&record.uri))
        else {
            log::warn!("engine offered unknown item {target}");
            return;
        };

        self.save_position();
        self.engine.seek_to_item(target, resume);
    }

    fn apply_repeat_mode(&mut self) {
        let (repeat, shuffle) = self.repeat_mode.engine_flags();
        self.engine.set_shuffle(shuffle);
        self.engine.set_repeat(repeat);
    }

    fn select_audio_track(&mut self, id: TrackId) {
        let selection = tracks::with_audio_track(self.engine.track_selection(), id);
        self.engine.set_track_selection(selection);
        if let Some(uri) = self.current_uri() {
            self.prefs.audio_tracks.save(&uri, id);
        }
    }

    fn select_subtitle_track(&mut self, id: TrackId) {
        let selection = tracks::with_subtitle_track(self.engine.track_selection(), id);
        self.engine.set_track_selection(selection);
        if let Some(uri) = self.current_uri() {
            self.prefs.subtitles.clear(&uri);
        }
        self.current_local_subtitle = None;
    }

    /// Attaches a local subtitle file to the current item.
    ///
    /// The attachment is part of the source, so the whole queue is rebuilt
    /// and reloaded at the same item, position and play intent.
    fn select_local_subtitle(&mut self, subtitle_uri: &MediaUri) {
        let Some(current_uri) = self.current_uri() else {
            return;
        };
        let file = tracks::subtitle_for_uri(subtitle_uri, &self.local_subtitles);
        self.prefs.subtitles.save(&current_uri, subtitle_uri);
        self.current_local_subtitle = Some(file);

        let index = self.engine.current_index();
        let position = self.engine.position_ms();
        let play_when_ready = self.engine.play_when_ready();

        let sources = match self.playlist.as_ref() {
            Some(playlist) => self.build_sources(playlist.items()),
            None => return,
        };
        self.engine.stop();
        self.engine.set_sources(sources, index, position);
        self.engine.prepare();
        self.engine.set_play_when_ready(play_when_ready);
        let selection = tracks::with_local_subtitle(self.engine.track_selection());
        self.engine.set_track_selection(selection);
        log::debug!("attached {} at item {} / {} ms", subtitle_uri, index, position);
    }

    /// Builds sources with each item's saved subtitle attachment.
    fn build_sources(&self, items: &[VideoRecord]) -> Vec<MediaSource> {
        tracks::build_sources(items, |record| {
            self.prefs
                .subtitles
                .get(&record.uri)
                .map(|uri| tracks::subtitle_for_uri(&uri, &self.local_subtitles))
        })
    }

    /// Writes the resume position of the current item. A position of zero
    /// removes the entry instead.
    fn save_position(&mut self) {
        let Some(uri) = self.current_uri() else {
            return;
        };
        let position = self.engine.position_ms();
        if position > 0 {
            self.prefs.positions.save(&uri, position);
        } else {
            self.prefs.positions.clear(&uri);
        }
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Stops and releases the engine. Every later call is a no-op.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.save_position();
        self.progress.stop();
        self.controls.hide();
        self.post_drag_flash.cancel();
        self.volume_flash.cancel();
        self.engine.stop();
        self.engine.release();
        self.host.set_keep_screen_on(false);
        self.is_playing = false;
        self.released = true;
        log::debug!("player released");
    }
}

impl Drop for PlayerStateMachine {
    fn drop(&mut self) {
        self.release();
    }
}
