// SPDX-License-Identifier: MPL-2.0
//! Async driver for one player screen.
//!
//! The session owns a [`PlayerStateMachine`] and feeds it from a single
//! `tokio::select!` loop, so every input is handled on one task in arrival
//! order: user messages, engine events, remote control signals, catalog
//! changes, timer deadlines and the progress tick. A catalog change starts a
//! subtitle query on its own task; the result comes back as another input,
//! and only the result of the latest query is applied. After each step the current [`PlayerSnapshot`] is published on a
//! `watch` channel. When the loop ends, the engine is released.

use super::machine::{PlayerSnapshot, PlayerStateMachine};
use super::message::{ControlSignal, PlayerMessage};
use crate::application::port::{CatalogWatch, EngineEvent, MediaCatalog};
use crate::config::PROGRESS_TICK_MS;
use crate::domain::media::SubtitleFile;
use crate::gallery::run_catalog;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};

/// Sending side of a running session.
#[derive(Debug, Clone)]
pub struct PlayerHandle {
    messages: mpsc::UnboundedSender<PlayerMessage>,
    controls: mpsc::UnboundedSender<ControlSignal>,
    snapshot: watch::Receiver<PlayerSnapshot>,
}

impl PlayerHandle {
    /// Queues a message. Returns false once the session has ended.
    pub fn send(&self, message: PlayerMessage) -> bool {
        self.messages.send(message).is_ok()
    }

    /// Delivers a remote control signal. Safe to call after teardown.
    pub fn control(&self, signal: ControlSignal) -> bool {
        self.controls.send(signal).is_ok()
    }

    /// Latest published state.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that wakes on every published state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshot.clone()
    }
}

/// Receiving side, consumed by [`PlayerSession::run`].
pub struct PlayerSession {
    machine: PlayerStateMachine,
    messages: mpsc::UnboundedReceiver<PlayerMessage>,
    controls: mpsc::UnboundedReceiver<ControlSignal>,
    engine_events: mpsc::UnboundedReceiver<EngineEvent>,
    catalog: Option<(Arc<dyn MediaCatalog>, CatalogWatch)>,
    refresh_generation: u64,
    refresh_tx: mpsc::UnboundedSender<(u64, Vec<SubtitleFile>)>,
    refresh_rx: mpsc::UnboundedReceiver<(u64, Vec<SubtitleFile>)>,
    snapshot: watch::Sender<PlayerSnapshot>,
}

impl PlayerSession {
    /// Wraps a loaded machine. Engine events must arrive on `engine_events`
    /// in emission order.
    pub fn new(
        machine: PlayerStateMachine,
        engine_events: mpsc::UnboundedReceiver<EngineEvent>,
    ) -> (Self, PlayerHandle) {
        let (message_tx, messages) = mpsc::unbounded_channel();
        let (control_tx, controls) = mpsc::unbounded_channel();
        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let (snapshot, snapshot_rx) = watch::channel(machine.snapshot());

        let session = Self {
            machine,
            messages,
            controls,
            engine_events,
            catalog: None,
            refresh_generation: 0,
            refresh_tx,
            refresh_rx,
            snapshot,
        };
        let handle = PlayerHandle {
            messages: message_tx,
            controls: control_tx,
            snapshot: snapshot_rx,
        };
        (session, handle)
    }

    /// Refreshes the local subtitle list whenever `watch` reports a change.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<dyn MediaCatalog>, watch: CatalogWatch) -> Self {
        self.catalog = Some((catalog, watch));
        self
    }

    /// Runs until every handle is dropped or the player finishes.
    pub async fn run(mut self) {
        let mut progress_tick = time::interval(Duration::from_millis(PROGRESS_TICK_MS));
        progress_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut engine_open = true;
        let mut controls_open = true;

        loop {
            let deadline = self.machine.next_deadline();
            let sampling = self.machine.progress_running();

            tokio::select! {
                message = self.messages.recv() => match message {
                    Some(message) => self.machine.handle_message(message, Instant::now()),
                    None => break,
                },
                event = self.engine_events.recv(), if engine_open => match event {
                    Some(event) => self.machine.handle_engine_event(event, Instant::now()),
                    None => engine_open = false,
                },
                signal = self.controls.recv(), if controls_open => match signal {
                    Some(signal) => self
                        .machine
                        .handle_message(PlayerMessage::Control(signal), Instant::now()),
                    None => controls_open = false,
                },
                changed = wait_catalog(&mut self.catalog) => {
                    if changed {
                        self.spawn_subtitle_refresh();
                    } else {
                        self.catalog = None;
                    }
                    continue;
                },
                Some((generation, files)) = self.refresh_rx.recv() => {
                    if generation != self.refresh_generation {
                        log::debug!("dropping stale subtitle list #{generation}");
                        continue;
                    }
                    let message = PlayerMessage::SubtitleFilesChanged(files);
                    self.machine.handle_message(message, Instant::now());
                },
                () = sleep_until(deadline) => {
                    self.machine.tick(Instant::now());
                },
                _ = progress_tick.tick(), if sampling => {
                    if !self.machine.sample_progress() {
                        continue;
                    }
                },
            }

            self.publish();
            if self.machine.is_finished() {
                break;
            }
        }

        self.machine.release();
        self.publish();
        log::debug!("player session ended");
    }

    /// Queries the subtitle list off the loop. Results of earlier queries
    /// still in flight are ignored once they arrive.
    fn spawn_subtitle_refresh(&mut self) {
        let Some((catalog, _)) = self.catalog.as_ref() else {
            return;
        };
        self.refresh_generation += 1;
        let generation = self.refresh_generation;
        let catalog = Arc::clone(catalog);
        let results = self.refresh_tx.clone();
        tokio::spawn(async move {
            if let Some(files) = refresh_subtitles(&catalog).await {
                let _ = results.send((generation, files));
            }
        });
    }

    fn publish(&self) {
        let snapshot = self.machine.snapshot();
        self.snapshot.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

async fn refresh_subtitles(catalog: &Arc<dyn MediaCatalog>) -> Option<Vec<SubtitleFile>> {
    match run_catalog(catalog, |catalog| catalog.query_subtitles()).await {
        Ok(files) => Some(files),
        Err(e) => {
            log::warn!("subtitle refresh failed: {}", e);
            None
        }
    }
}

async fn wait_catalog(catalog: &mut Option<(Arc<dyn MediaCatalog>, CatalogWatch)>) -> bool {
    match catalog {
        Some((_, watch)) => watch.changed().await,
        None => std::future::pending().await,
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
