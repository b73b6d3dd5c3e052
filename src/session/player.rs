//! The public handle that owns the session and output threads.

use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use thiserror::Error;

use super::model::{PlaybackSession, SessionCmd, SessionInfo, SessionInfoHandle};
use super::runner::{Input, spawn_session_thread};
use crate::config::Settings;
use crate::device::spawn_output_thread;
use crate::listen::{HttpListenRecorder, ListenRecorder};

/// The session thread has already shut down.
#[derive(Debug, Error)]
#[error("playback session is no longer running")]
pub struct SessionClosed;

/// One playback session per application: construct at startup, pass by
/// reference to consumers, and call [`SessionPlayer::shutdown`] on exit.
pub struct SessionPlayer {
    tx: Sender<Input>,
    info: SessionInfoHandle,
    session_join: Mutex<Option<JoinHandle<()>>>,
    device_join: Mutex<Option<JoinHandle<()>>>,
}

impl SessionPlayer {
    /// Build a player reporting listens to the backend RPC layer configured
    /// in `settings.rpc`.
    pub fn new(settings: &Settings) -> Self {
        let recorder = HttpListenRecorder::new(&settings.rpc);
        Self::with_recorder(settings, Box::new(recorder))
    }

    /// Build a player with a custom listen recorder.
    pub fn with_recorder(settings: &Settings, recorder: Box<dyn ListenRecorder>) -> Self {
        let (tx, rx) = mpsc::channel::<Input>();
        let (device_tx, device_rx) = mpsc::channel();

        let events = tx.clone();
        let device_join = spawn_output_thread(
            device_rx,
            move |event| {
                let _ = events.send(Input::Device(event));
            },
            Duration::from_millis(settings.playback.tick_interval_ms),
            settings.playback.volume.clamp(0.0, 1.0),
        );

        let session = PlaybackSession::new(device_tx, recorder, settings.playback.volume);
        let info: SessionInfoHandle = Arc::new(Mutex::new(SessionInfo::default()));
        let session_join = spawn_session_thread(rx, session, info.clone());

        Self {
            tx,
            info,
            session_join: Mutex::new(Some(session_join)),
            device_join: Mutex::new(Some(device_join)),
        }
    }

    /// Queue a transport command for the session thread.
    pub fn send(&self, cmd: SessionCmd) -> Result<(), SessionClosed> {
        self.tx.send(Input::Cmd(cmd)).map_err(|_| SessionClosed)
    }

    /// Shared snapshot of the session state, refreshed after every input.
    pub fn info_handle(&self) -> SessionInfoHandle {
        self.info.clone()
    }

    /// Release the audio device and join both threads.
    pub fn shutdown(&self) {
        let _ = self.send(SessionCmd::Quit);

        if let Ok(mut j) = self.session_join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
        if let Ok(mut j) = self.device_join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
