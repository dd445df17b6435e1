// SPDX-License-Identifier: MPL-2.0
//! Player state machine scenarios driven through recording fakes.

mod common;

use common::{memory_prefs, movies, subtitle, FakeEngine, FakeHost};
use flix::application::port::{
    EngineEvent, EngineState, Notice, PipAction, ScreenOrientation, SurfaceRect,
    TransitionReason,
};
use flix::domain::media::{
    GroupKey, TrackFormat, TrackGroup, TrackId, TrackKind, VideoId, VideoRecord,
};
use flix::domain::video::{EngineRepeat, PlaybackSpeed, PlaybackState, Progress, RepeatMode};
use flix::error::VideoError;
use flix::navigation::{Navigator, PlayerLaunch, Route};
use flix::preferences::PlayerPrefs;
use flix::video_player::{
    ControlSignal, DragTarget, PlayerMessage, PlayerSession, PlayerStateMachine, PlayerTimings,
    SeekDirection,
};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

struct Harness {
    player: PlayerStateMachine,
    engine: FakeEngine,
    host: FakeHost,
    prefs: PlayerPrefs,
}

fn harness_with(prefs: PlayerPrefs) -> Harness {
    let engine = FakeEngine::new();
    let host = FakeHost::new();
    let player = PlayerStateMachine::new(
        Box::new(engine.clone()),
        Box::new(host.clone()),
        prefs.clone(),
        PlayerTimings::default(),
    );
    Harness {
        player,
        engine,
        host,
        prefs,
    }
}

fn movies_key() -> GroupKey {
    GroupKey::new("/storage/Movies")
}

/// Loads the `index`-th movie of the Movies folder at `now`.
fn load_movie(h: &mut Harness, index: usize, now: Instant) {
    let videos = movies();
    let launch = PlayerLaunch::for_record(&videos[index], Some(movies_key()));
    assert!(h.player.load(&videos, &launch, Vec::new(), now));
}

fn loaded(index: usize) -> (Harness, Instant) {
    let now = Instant::now();
    let mut h = harness_with(memory_prefs());
    load_movie(&mut h, index, now);
    (h, now)
}

fn start_playing(h: &mut Harness, now: Instant) {
    h.engine.log().playing = true;
    h.engine.log().state = Some(EngineState::Ready);
    h.player
        .handle_engine_event(EngineEvent::StateChanged(EngineState::Ready), now);
    h.player
        .handle_engine_event(EngineEvent::IsPlayingChanged(true), now);
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn load_starts_playback_of_the_selected_item() {
    let (h, _) = loaded(1);
    let log = h.engine.log();
    assert_eq!(log.sources.len(), 3);
    assert_eq!(log.index, 1);
    assert_eq!(log.position_ms, 0);
    assert!(log.play_when_ready);
    assert_eq!(log.count("prepare"), 1);
    assert_eq!(log.repeat, Some(EngineRepeat::Off));
    assert!(!log.shuffle);
    drop(log);

    let snapshot = h.player.snapshot();
    assert_eq!(snapshot.state, PlaybackState::Loading);
    assert!(snapshot.controls_visible);
    assert_eq!(snapshot.index, 1);
    assert_eq!(snapshot.playlist_len, 3);
}

#[test]
fn missing_video_falls_back_to_first_item() {
    let now = Instant::now();
    let mut h = harness_with(memory_prefs());
    let videos = movies();
    let mut gone = VideoRecord::new(VideoId::new(99), "/storage/Movies/gone.mp4");
    gone.title = "gone".into();
    let launch = PlayerLaunch::for_record(&gone, Some(movies_key()));

    assert!(h.player.load(&videos, &launch, Vec::new(), now));
    assert_eq!(h.engine.log().index, 0);
}

#[test]
fn empty_group_does_not_load() {
    let now = Instant::now();
    let mut h = harness_with(memory_prefs());
    let videos = movies();
    let launch = PlayerLaunch::for_record(&videos[0], Some(GroupKey::new("/storage/Empty")));

    assert!(!h.player.load(&videos, &launch, Vec::new(), now));
    assert_eq!(h.engine.log().count("set_sources"), 0);
    assert_eq!(h.player.state(), PlaybackState::Idle);
}

// =============================================================================
// Gestures and controls
// =============================================================================

#[test]
fn drag_never_leaves_unit_range() {
    let (mut h, now) = loaded(0);
    h.player.handle_message(
        PlayerMessage::DragStarted {
            x_fraction: 0.2,
            y_fraction: 0.5,
        },
        now,
    );
    for delta in [-300.0, -5000.0, 40.0, 9000.0, -12.5, 1e6] {
        h.player
            .handle_message(PlayerMessage::DragMoved { delta_y_px: delta }, now);
        let snapshot = h.player.snapshot();
        let (target, value) = snapshot.drag.expect("drag is active");
        assert_eq!(target, DragTarget::Volume);
        assert!((0.0..=1.0).contains(&value.value()));
    }
    assert!(h
        .host
        .log()
        .volume_sets
        .iter()
        .all(|v| (0.0..=1.0).contains(&v.value())));
    assert!(h.host.log().brightness_sets.is_empty());
}

#[test]
fn drag_outside_band_is_ignored() {
    let (mut h, now) = loaded(0);
    h.player.handle_message(
        PlayerMessage::DragStarted {
            x_fraction: 0.8,
            y_fraction: 0.1,
        },
        now,
    );
    h.player
        .handle_message(PlayerMessage::DragMoved { delta_y_px: -100.0 }, now);
    assert!(h.host.log().brightness_sets.is_empty());
    assert_eq!(h.player.snapshot().drag, None);
}

#[test]
fn drag_end_flashes_last_value_briefly() {
    let (mut h, now) = loaded(0);
    h.player.handle_message(
        PlayerMessage::DragStarted {
            x_fraction: 0.9,
            y_fraction: 0.6,
        },
        now,
    );
    h.player
        .handle_message(PlayerMessage::DragMoved { delta_y_px: -200.0 }, now);
    h.player.handle_message(PlayerMessage::DragEnded, now);

    let (target, value) = h.player.snapshot().post_drag_flash.expect("flash shown");
    assert_eq!(target, DragTarget::Brightness);
    assert!((value.value() - 1.0).abs() < 1e-6);

    h.player.tick(now + Duration::from_millis(999));
    assert!(h.player.snapshot().post_drag_flash.is_some());
    h.player.tick(now + Duration::from_millis(1000));
    assert!(h.player.snapshot().post_drag_flash.is_none());
}

#[test]
fn step_seek_is_a_no_op_at_the_bounds() {
    let (mut h, now) = loaded(0);
    h.engine.log().duration_ms = 60_000;

    h.player
        .handle_message(PlayerMessage::DoubleTapped { x_fraction: 0.1 }, now);
    assert_eq!(h.engine.log().count("seek_to"), 0);
    assert_eq!(h.player.snapshot().seek_flash, None);

    h.engine.log().position_ms = 60_000;
    h.player
        .handle_message(PlayerMessage::DoubleTapped { x_fraction: 0.9 }, now);
    assert_eq!(h.engine.log().count("seek_to"), 0);

    h.engine.log().position_ms = 55_000;
    h.player
        .handle_message(PlayerMessage::DoubleTapped { x_fraction: 0.9 }, now);
    assert_eq!(h.engine.log().position_ms, 60_000);
    assert_eq!(h.player.snapshot().seek_flash, Some(SeekDirection::Forward));

    h.player
        .handle_message(PlayerMessage::DoubleTapped { x_fraction: 0.1 }, now);
    assert_eq!(h.engine.log().position_ms, 50_000);
}

#[test]
fn seek_flash_clears_when_ready() {
    let (mut h, now) = loaded(0);
    h.engine.log().position_ms = 20_000;
    h.player
        .handle_message(PlayerMessage::DoubleTapped { x_fraction: 0.2 }, now);
    assert_eq!(h.player.snapshot().seek_flash, Some(SeekDirection::Backward));

    h.player
        .handle_engine_event(EngineEvent::StateChanged(EngineState::Ready), now);
    let snapshot = h.player.snapshot();
    assert_eq!(snapshot.seek_flash, None);
    assert_eq!(snapshot.position_ms, 10_000);
}

#[test]
fn repeated_interaction_leaves_one_pending_hide() {
    let (mut h, t0) = loaded(0);
    assert_eq!(h.player.next_deadline(), Some(t0 + Duration::from_millis(5000)));

    let t2 = t0 + Duration::from_millis(2000);
    h.player.handle_message(PlayerMessage::SeekForward, t2);
    assert_eq!(h.player.next_deadline(), Some(t0 + Duration::from_millis(7000)));

    h.player.tick(t0 + Duration::from_millis(5000));
    assert!(h.player.snapshot().controls_visible);
    h.player.tick(t0 + Duration::from_millis(7000));
    assert!(!h.player.snapshot().controls_visible);
    assert_eq!(h.player.next_deadline(), None);
    assert_eq!(h.host.log().immersive_requests, 1);
}

#[test]
fn paused_controls_stay_visible() {
    let (mut h, now) = loaded(0);
    start_playing(&mut h, now);
    h.player.handle_message(PlayerMessage::TogglePlayPause, now);
    h.engine.log().playing = false;
    h.player
        .handle_engine_event(EngineEvent::IsPlayingChanged(false), now);

    assert!(h.player.snapshot().controls_visible);
    assert_eq!(h.player.next_deadline(), None);
    h.player.tick(now + Duration::from_secs(60));
    assert!(h.player.snapshot().controls_visible);
}

#[test]
fn surface_tap_toggles_controls() {
    let (mut h, now) = loaded(0);
    h.player.handle_message(PlayerMessage::SurfaceTapped, now);
    assert!(!h.player.snapshot().controls_visible);
    assert_eq!(h.host.log().immersive_requests, 1);
    h.player.handle_message(PlayerMessage::SurfaceTapped, now);
    assert!(h.player.snapshot().controls_visible);
}

#[test]
fn volume_key_flash_is_suppressed_during_volume_drag() {
    let (mut h, now) = loaded(0);
    h.player.handle_engine_event(
        EngineEvent::VolumeChanged {
            level: Progress::new(0.3),
        },
        now,
    );
    assert_eq!(h.player.snapshot().volume_flash, Some(Progress::new(0.3)));
    h.player.tick(now + Duration::from_millis(3000));
    assert_eq!(h.player.snapshot().volume_flash, None);

    h.player.handle_message(
        PlayerMessage::DragStarted {
            x_fraction: 0.1,
            y_fraction: 0.5,
        },
        now,
    );
    h.player.handle_engine_event(
        EngineEvent::VolumeChanged {
            level: Progress::new(0.6),
        },
        now,
    );
    assert_eq!(h.player.snapshot().volume_flash, None);
}

// =============================================================================
// Resume positions
// =============================================================================

#[test]
fn resume_position_round_trips() {
    let prefs = memory_prefs();
    let now = Instant::now();

    let mut first = harness_with(prefs.clone());
    load_movie(&mut first, 0, now);
    first.engine.log().position_ms = 42_000;
    first.player.handle_message(PlayerMessage::Backgrounded, now);
    first.player.release();

    let mut second = harness_with(prefs.clone());
    load_movie(&mut second, 0, now);
    assert_eq!(second.engine.log().position_ms, 42_000);
    second.player.release();

    let uri = movies()[0].uri.clone();
    prefs.positions.clear(&uri);
    let mut third = harness_with(prefs);
    load_movie(&mut third, 0, now);
    assert_eq!(third.engine.log().position_ms, 0);
}

#[test]
fn zero_position_clears_the_entry() {
    let (mut h, now) = loaded(0);
    let uri = movies()[0].uri.clone();
    h.prefs.positions.save(&uri, 5_000);
    h.engine.log().position_ms = 0;
    h.player.handle_message(PlayerMessage::Backgrounded, now);
    assert_eq!(h.prefs.positions.get(&uri), 0);
}

#[test]
fn next_button_saves_and_resumes_target() {
    let (mut h, now) = loaded(0);
    let videos = movies();
    h.prefs.positions.save(&videos[1].uri, 12_000);
    h.engine.log().position_ms = 30_000;

    h.player.handle_message(PlayerMessage::NextItem, now);
    assert_eq!(h.prefs.positions.get(&videos[0].uri), 30_000);
    let log = h.engine.log();
    assert_eq!(log.index, 1);
    assert_eq!(log.position_ms, 12_000);
}

#[test]
fn previous_at_first_item_without_repeat_does_nothing() {
    let (mut h, now) = loaded(0);
    h.player.handle_message(PlayerMessage::PreviousItem, now);
    assert_eq!(h.engine.log().count("seek_to_item"), 0);
}

#[test]
fn previous_at_first_item_wraps_under_repeat_all() {
    let (mut h, now) = loaded(0);
    h.player
        .handle_message(PlayerMessage::SetRepeatMode(RepeatMode::RepeatAll), now);
    h.player.handle_message(PlayerMessage::PreviousItem, now);
    assert_eq!(h.engine.log().index, 2);
}

#[test]
fn next_follows_shuffle_order_across_quick_presses() {
    let (mut h, now) = loaded(0);
    h.engine.log().shuffle_order = vec![0, 2, 1];
    h.player
        .handle_message(PlayerMessage::SetRepeatMode(RepeatMode::Shuffle), now);

    // No ItemTransitioned in between: each press steps from the engine's item.
    h.player.handle_message(PlayerMessage::NextItem, now);
    assert_eq!(h.engine.log().index, 2);
    h.player.handle_message(PlayerMessage::NextItem, now);
    assert_eq!(h.engine.log().index, 1);
    assert_eq!(h.engine.log().count("seek_to_item"), 2);

    h.player.handle_message(PlayerMessage::PreviousItem, now);
    assert_eq!(h.engine.log().index, 2);
}

// =============================================================================
// Repeat, speed and audio settings
// =============================================================================

#[test]
fn leaving_shuffle_disables_shuffle() {
    let (mut h, now) = loaded(0);
    h.player
        .handle_message(PlayerMessage::SetRepeatMode(RepeatMode::Shuffle), now);
    assert!(h.engine.log().shuffle);
    assert_eq!(h.engine.log().repeat, Some(EngineRepeat::All));

    h.player
        .handle_message(PlayerMessage::SetRepeatMode(RepeatMode::Off), now);
    assert!(!h.engine.log().shuffle);
    assert_eq!(h.engine.log().repeat, Some(EngineRepeat::Off));
    assert_eq!(h.prefs.settings.repeat_mode(), RepeatMode::Off);
}

#[test]
fn loudness_gain_is_clamped() {
    let (mut h, now) = loaded(0);
    h.player
        .handle_message(PlayerMessage::SetLoudnessGain(99_999), now);
    assert_eq!(h.engine.log().loudness_mb, Some(1500));
    h.player.handle_message(PlayerMessage::SetLoudnessGain(-40), now);
    assert_eq!(h.engine.log().loudness_mb, Some(0));
}

#[test]
fn mute_toggles_engine_volume() {
    let (mut h, now) = loaded(0);
    h.player.handle_message(PlayerMessage::ToggleMute, now);
    assert_eq!(h.engine.log().volume, Some(0.0));
    h.player.handle_message(PlayerMessage::ToggleMute, now);
    assert_eq!(h.engine.log().volume, Some(1.0));
}

#[test]
fn speed_change_is_applied_and_persisted() {
    let (mut h, now) = loaded(0);
    h.player
        .handle_message(PlayerMessage::SetSpeed(PlaybackSpeed::new(1.5)), now);
    assert_eq!(h.engine.log().speed, Some(PlaybackSpeed::new(1.5)));
    assert_eq!(h.prefs.settings.playback_speed(), PlaybackSpeed::new(1.5));
    assert_eq!(h.player.snapshot().speed, PlaybackSpeed::new(1.5));

    // A new player starts at the saved speed.
    let mut next = harness_with(h.prefs.clone());
    load_movie(&mut next, 1, now);
    assert_eq!(next.engine.log().speed, Some(PlaybackSpeed::new(1.5)));
}

// =============================================================================
// Playlist progression
// =============================================================================

#[test]
fn album_selection_plays_the_folder_and_advances() {
    let videos = movies();
    let grouped = flix::application::query::group_by_folder(&videos, &[]);
    let mut navigator = Navigator::default();
    navigator.open_folder(movies_key(), "Movies");
    let Route::Folder { key, .. } = navigator.current().clone() else {
        panic!("folder route expected");
    };
    let second = &grouped[&key][1];

    let now = Instant::now();
    let mut h = harness_with(memory_prefs());
    let launch = PlayerLaunch::for_record(second, Some(key));
    assert!(h.player.load(&videos, &launch, Vec::new(), now));

    let playlist = h.player.playlist().expect("playlist");
    assert_eq!(playlist.len(), 3);
    assert_eq!(playlist.index(), 1);

    h.player.handle_engine_event(
        EngineEvent::ItemTransitioned {
            index: 2,
            reason: TransitionReason::Auto,
        },
        now,
    );
    assert_eq!(h.player.playlist().map(|p| p.index()), Some(2));
}

#[test]
fn auto_transition_clears_finished_item_and_resumes_next() {
    let (mut h, now) = loaded(0);
    let videos = movies();
    h.prefs.positions.save(&videos[0].uri, 59_000);
    h.prefs.positions.save(&videos[1].uri, 8_000);

    h.player.handle_engine_event(
        EngineEvent::ItemTransitioned {
            index: 1,
            reason: TransitionReason::Auto,
        },
        now,
    );
    assert_eq!(h.prefs.positions.get(&videos[0].uri), 0);
    assert_eq!(h.engine.log().position_ms, 8_000);
}

#[test]
fn playlist_end_rewinds_paused() {
    let (mut h, now) = loaded(2);
    start_playing(&mut h, now);
    h.engine.log().playing = false;
    h.player
        .handle_engine_event(EngineEvent::StateChanged(EngineState::Ended), now);

    {
        let log = h.engine.log();
        assert_eq!(log.index, 0);
        assert_eq!(log.position_ms, 0);
        assert!(!log.play_when_ready);
    }
    let snapshot = h.player.snapshot();
    assert_eq!(snapshot.state, PlaybackState::Ended);
    assert_eq!(snapshot.index, 0);
    assert!(snapshot.controls_visible);
    assert!(!h.host.log().keep_screen_on);
    assert!(!h.player.progress_running());
}

// =============================================================================
// Tracks and subtitles
// =============================================================================

#[test]
fn local_subtitle_switch_keeps_item_and_offset() {
    let (mut h, now) = loaded(1);
    start_playing(&mut h, now);
    h.engine.log().position_ms = 31_234;
    let srt = subtitle("file:///storage/Movies/b.srt");
    h.player
        .handle_message(PlayerMessage::SubtitleFilesChanged(vec![srt.clone()]), now);

    h.player
        .handle_message(PlayerMessage::SelectLocalSubtitle(srt.uri.clone()), now);

    let log = h.engine.log();
    assert_eq!(log.count("set_sources"), 2);
    assert_eq!(log.index, 1);
    assert!(log.position_ms.abs_diff(31_234) <= 50);
    assert!(log.play_when_ready);
    assert_eq!(log.sources[1].subtitles, vec![srt.clone()]);
    assert!(log.sources[0].subtitles.is_empty());
    assert!(!log.selection.text_disabled());
    drop(log);

    assert_eq!(h.prefs.subtitles.get(&movies()[1].uri), Some(srt.uri.clone()));
    assert_eq!(h.player.snapshot().current_local_subtitle, Some(srt));
}

#[test]
fn saved_audio_track_is_restored_when_tracks_arrive() {
    let (mut h, now) = loaded(0);
    let uri = movies()[0].uri.clone();
    h.prefs.audio_tracks.save(&uri, TrackId::new(1, 1));

    let english = TrackFormat {
        language: Some("en".into()),
        ..TrackFormat::default()
    };
    let groups = vec![
        TrackGroup::new(TrackKind::Video, vec![TrackFormat::default()]),
        TrackGroup::new(
            TrackKind::Audio,
            vec![
                TrackFormat {
                    selected: true,
                    ..english.clone()
                },
                english,
            ],
        ),
    ];
    h.player
        .handle_engine_event(EngineEvent::TracksChanged(groups.clone()), now);
    assert_eq!(
        h.engine.log().selection.override_for(TrackKind::Audio),
        Some(TrackId::new(1, 1))
    );
    let snapshot = h.player.snapshot();
    assert_eq!(snapshot.current.map(|c| c.audio_tracks.len()), Some(2));

    let selections = h.engine.log().count("set_track_selection");
    h.player
        .handle_engine_event(EngineEvent::TracksChanged(groups), now);
    assert_eq!(h.engine.log().count("set_track_selection"), selections);
}

#[test]
fn audio_switch_keeps_subtitle_override() {
    let (mut h, now) = loaded(0);
    h.player
        .handle_message(PlayerMessage::SelectSubtitleTrack(TrackId::new(2, 0)), now);
    h.player
        .handle_message(PlayerMessage::SelectAudioTrack(TrackId::new(1, 1)), now);

    let selection = h.engine.log().selection.clone();
    assert_eq!(selection.override_for(TrackKind::Text), Some(TrackId::new(2, 0)));
    assert_eq!(selection.override_for(TrackKind::Audio), Some(TrackId::new(1, 1)));
    assert_eq!(
        h.prefs.audio_tracks.get(&movies()[0].uri),
        Some(TrackId::new(1, 1))
    );
}

#[test]
fn disabling_subtitles_is_persisted() {
    let (mut h, now) = loaded(0);
    h.player
        .handle_message(PlayerMessage::SetSubtitlesEnabled(false), now);
    assert!(h.engine.log().selection.text_disabled());
    assert!(!h.prefs.settings.subtitles_enabled());
}

// =============================================================================
// Errors, PiP and teardown
// =============================================================================

#[test]
fn playback_error_hands_off_to_external_viewer() {
    let (mut h, now) = loaded(0);
    h.player.handle_engine_event(
        EngineEvent::Error(VideoError::UnsupportedCodec("hevc".into())),
        now,
    );
    let log = h.host.log();
    assert_eq!(
        log.notices,
        vec![
            Notice::PlaybackFailed(VideoError::UnsupportedCodec("hevc".into())),
            Notice::NoExternalViewer,
        ]
    );
    assert_eq!(
        log.external_opens,
        vec![(movies()[0].uri.clone(), "video/mp4".to_string())]
    );
    drop(log);
    assert_eq!(h.player.state(), PlaybackState::Error);
}

#[test]
fn pip_params_follow_playing_state() {
    let (mut h, now) = loaded(0);
    h.player
        .handle_message(PlayerMessage::SurfaceLaidOut(SurfaceRect::new(0, 0, 1080, 608)), now);
    start_playing(&mut h, now);

    h.player.handle_message(PlayerMessage::UserLeaveHint, now);
    let entered = h.host.log().pip_entered.clone();
    assert_eq!(entered.len(), 1);
    assert_eq!(entered[0].action, PipAction::Pause);
    assert_eq!(entered[0].source_rect, Some(SurfaceRect::new(0, 0, 1080, 608)));
    assert!(h.player.snapshot().pip_active);

    h.player
        .handle_message(PlayerMessage::Control(ControlSignal::Pause), now);
    h.engine.log().playing = false;
    h.player
        .handle_engine_event(EngineEvent::IsPlayingChanged(false), now);
    let updates = h.host.log().pip_updates.clone();
    assert_eq!(updates.last().map(|p| p.action), Some(PipAction::Play));
}

#[test]
fn user_leave_while_paused_does_not_enter_pip() {
    let (mut h, now) = loaded(0);
    h.player.handle_message(PlayerMessage::UserLeaveHint, now);
    assert!(h.host.log().pip_entered.is_empty());
}

#[test]
fn close_signal_finishes_and_release_is_idempotent() {
    let (mut h, now) = loaded(0);
    h.player
        .handle_message(PlayerMessage::Control(ControlSignal::Close), now);
    assert!(h.host.log().finished);
    assert!(h.player.is_finished());

    h.player.release();
    h.player.release();
    h.player
        .handle_message(PlayerMessage::Control(ControlSignal::Play), now);
    drop(h.player);
    let log = h.engine.log();
    assert_eq!(log.count("release"), 1);
    assert_eq!(log.count("play"), 1);
}

#[test]
fn close_right_after_backgrounding_keeps_the_position() {
    let (mut h, now) = loaded(0);
    start_playing(&mut h, now);
    h.engine.log().position_ms = 42_000;

    h.player.handle_message(PlayerMessage::Backgrounded, now);
    assert!(!h.engine.log().play_when_ready);
    h.player
        .handle_message(PlayerMessage::Control(ControlSignal::Close), now);
    assert!(h.player.is_finished());
    assert!(h.host.log().finished);
    assert!(h.host.log().pip_updates.is_empty());

    drop(h.player);
    assert_eq!(h.prefs.positions.get(&movies()[0].uri), 42_000);
    let log = h.engine.log();
    assert_eq!(log.count("release"), 1);
    assert!(!log.play_when_ready);
}

#[test]
fn rotate_button_forces_the_opposite_layout() {
    let (mut h, now) = loaded(0);
    h.player.handle_message(PlayerMessage::RotatePressed, now);
    h.player.handle_message(PlayerMessage::RotatePressed, now);
    assert_eq!(
        h.host.log().orientations,
        vec![ScreenOrientation::Landscape, ScreenOrientation::Portrait]
    );
}

#[test]
fn rotate_button_works_while_sensor_is_undefined() {
    let (mut h, now) = loaded(0);
    h.player
        .handle_message(PlayerMessage::DeviceRotated { degrees: 45 }, now);
    h.player.handle_message(PlayerMessage::RotatePressed, now);
    assert_eq!(h.host.log().orientations, vec![ScreenOrientation::Landscape]);

    // Turning the device away from the request hands control back.
    h.player
        .handle_message(PlayerMessage::DeviceRotated { degrees: 0 }, now);
    assert_eq!(
        h.host.log().orientations,
        vec![ScreenOrientation::Landscape, ScreenOrientation::FollowSensor]
    );
}

#[test]
fn locking_orientation_hides_controls() {
    let (mut h, now) = loaded(0);
    h.player.handle_message(PlayerMessage::ToggleOrientationLock, now);
    let snapshot = h.player.snapshot();
    assert!(snapshot.orientation_locked);
    assert!(!snapshot.controls_visible);
    assert_eq!(h.host.log().immersive_requests, 1);
}

#[test]
fn progress_samples_only_while_running() {
    let (mut h, now) = loaded(0);
    h.engine.log().position_ms = 1_000;
    assert!(!h.player.sample_progress());

    start_playing(&mut h, now);
    assert!(h.player.progress_running());
    h.engine.log().position_ms = 30_000;
    assert!(h.player.sample_progress());
    let snapshot = h.player.snapshot();
    assert_eq!(snapshot.position_ms, 30_000);
    assert!((snapshot.progress.value() - 0.5).abs() < 1e-6);
}

#[test]
fn scrub_finish_seeks_and_restarts_an_idle_engine() {
    let (mut h, now) = loaded(0);
    {
        let mut log = h.engine.log();
        log.state = Some(EngineState::Idle);
        log.play_when_ready = false;
    }

    h.player.handle_message(PlayerMessage::ScrubStarted, now);
    h.engine.log().position_ms = 1_000;
    assert!(!h.player.sample_progress());
    h.player
        .handle_message(PlayerMessage::ScrubChanged(Progress::new(0.25)), now);
    assert_eq!(h.player.snapshot().position_ms, 15_000);
    h.player.handle_message(PlayerMessage::ScrubFinished, now);

    let log = h.engine.log();
    assert_eq!(log.position_ms, 15_000);
    assert_eq!(log.count("prepare"), 2);
    assert!(log.play_when_ready);
}

#[test]
fn scrub_finish_on_a_ready_engine_only_seeks() {
    let (mut h, now) = loaded(0);
    start_playing(&mut h, now);
    h.player.handle_message(PlayerMessage::ScrubStarted, now);
    h.player
        .handle_message(PlayerMessage::ScrubChanged(Progress::new(0.5)), now);
    h.player.handle_message(PlayerMessage::ScrubFinished, now);

    let log = h.engine.log();
    assert_eq!(log.position_ms, 30_000);
    assert_eq!(log.count("prepare"), 1);
}

// =============================================================================
// Session
// =============================================================================

#[tokio::test(start_paused = true)]
async fn session_publishes_snapshots_and_hides_controls() {
    let mut h = harness_with(memory_prefs());
    load_movie(&mut h, 0, Instant::now());
    let engine = h.engine.clone();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (session, handle) = PlayerSession::new(h.player, events_rx);
    let task = tokio::spawn(session.run());

    assert!(handle.snapshot().controls_visible);
    events_tx
        .send(EngineEvent::StateChanged(EngineState::Buffering))
        .unwrap();
    let mut updates = handle.subscribe();
    updates.changed().await.unwrap();
    assert_eq!(handle.snapshot().state, PlaybackState::Buffering);

    tokio::time::sleep(Duration::from_millis(5_100)).await;
    assert!(!handle.snapshot().controls_visible);

    assert!(handle.control(ControlSignal::Close));
    task.await.unwrap();
    assert!(engine.log().released);
    assert!(!handle.send(PlayerMessage::SurfaceTapped));
}

#[tokio::test]
async fn session_refreshes_subtitles_on_catalog_change() {
    use std::sync::Arc;

    let catalog = Arc::new(common::FakeCatalog::new(movies()));
    let watch = flix::application::port::MediaCatalog::watch(catalog.as_ref()).unwrap();

    let mut h = harness_with(memory_prefs());
    load_movie(&mut h, 0, Instant::now());
    let (_events_tx, events_rx) = mpsc::unbounded_channel();
    let (session, handle) = PlayerSession::new(h.player, events_rx);
    let session = session.with_catalog(catalog.clone(), watch);
    let task = tokio::spawn(session.run());

    let srt = subtitle("file:///storage/Movies/a.srt");
    catalog.set_subtitles(vec![srt.clone()]);
    let mut updates = handle.subscribe();
    assert!(catalog.notify());
    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("snapshot published")
        .unwrap();
    assert_eq!(handle.snapshot().local_subtitles, vec![srt]);

    drop(handle);
    drop(updates);
    task.await.unwrap();
}

#[tokio::test]
async fn slow_subtitle_query_does_not_stall_input() {
    use std::sync::Arc;

    let catalog = Arc::new(common::FakeCatalog::new(movies()));
    catalog.delay_subtitle_queries([Duration::from_millis(1_500)]);
    let srt = subtitle("file:///storage/Movies/a.srt");
    catalog.set_subtitles(vec![srt.clone()]);
    let watch = flix::application::port::MediaCatalog::watch(catalog.as_ref()).unwrap();

    let mut h = harness_with(memory_prefs());
    load_movie(&mut h, 0, Instant::now());
    let (_events_tx, events_rx) = mpsc::unbounded_channel();
    let (session, handle) = PlayerSession::new(h.player, events_rx);
    let task = tokio::spawn(session.with_catalog(catalog.clone(), watch).run());
    let mut updates = handle.subscribe();

    assert!(catalog.notify());
    tokio::time::sleep(Duration::from_millis(50)).await;
    let sent = std::time::Instant::now();
    assert!(handle.send(PlayerMessage::SurfaceTapped));
    tokio::time::timeout(Duration::from_millis(500), updates.changed())
        .await
        .expect("tap handled while the query runs")
        .unwrap();
    assert!(sent.elapsed() < Duration::from_millis(500));
    assert!(!handle.snapshot().controls_visible);
    assert!(handle.snapshot().local_subtitles.is_empty());

    tokio::time::timeout(Duration::from_secs(5), updates.changed())
        .await
        .expect("subtitle list arrives")
        .unwrap();
    assert_eq!(handle.snapshot().local_subtitles, vec![srt]);

    drop(handle);
    drop(updates);
    task.await.unwrap();
}

#[tokio::test]
async fn stale_subtitle_query_result_is_dropped() {
    use std::sync::Arc;

    let catalog = Arc::new(common::FakeCatalog::new(movies()));
    catalog.delay_subtitle_queries([Duration::from_millis(600), Duration::ZERO]);
    let old = subtitle("file:///storage/Movies/old.srt");
    let new = subtitle("file:///storage/Movies/new.srt");
    catalog.set_subtitles(vec![old]);
    let watch = flix::application::port::MediaCatalog::watch(catalog.as_ref()).unwrap();

    let mut h = harness_with(memory_prefs());
    load_movie(&mut h, 0, Instant::now());
    let (_events_tx, events_rx) = mpsc::unbounded_channel();
    let (session, handle) = PlayerSession::new(h.player, events_rx);
    let task = tokio::spawn(session.with_catalog(catalog.clone(), watch).run());

    assert!(catalog.notify());
    tokio::time::sleep(Duration::from_millis(100)).await;
    catalog.set_subtitles(vec![new.clone()]);
    assert!(catalog.notify());

    tokio::time::sleep(Duration::from_millis(1_000)).await;
    assert_eq!(handle.snapshot().local_subtitles, vec![new]);

    drop(handle);
    task.await.unwrap();
}
