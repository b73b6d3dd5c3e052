//! The playback state machine.
//!
//! All mutation happens through the methods here, driven by the session
//! thread. The device is commanded over a fire-and-forget channel; its
//! callbacks come back through `handle_device`, tagged with the track
//! identity they belong to so events from a superseded load are discarded.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::device::{DeviceCmd, DeviceEvent};
use crate::listen::ListenRecorder;
use crate::track::Track;

/// Playback position after which a play counts as a listen (seconds).
pub(crate) const LISTEN_THRESHOLD_SECS: f64 = 30.0;

/// The playback state of the session.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Transport commands accepted by the session.
#[derive(Debug)]
pub enum SessionCmd {
    /// Attach `track` and begin output from the start.
    Play(Track),
    Pause,
    Resume,
    /// Media-key convenience: pause when playing, resume when paused.
    TogglePause,
    /// Advance to the next queue entry (wraps to the start).
    Next,
    /// Go back to the previous queue entry (wraps to the end).
    Previous,
    /// Relocate the output position (seconds, clamped to [0, duration]).
    Seek(f64),
    /// Set the output volume (clamped to [0, 1]).
    SetVolume(f32),
    /// Replace the play queue wholesale.
    SetQueue(Vec<Track>),
    /// Release the audio device and end the session thread.
    Quit,
}

/// Snapshot of session state shared with observers (UI, media controls).
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub track: Option<Track>,
    pub state: PlaybackState,
    /// Playback position in seconds.
    pub position: f64,
    /// Track duration in seconds; 0 until metadata has loaded.
    pub duration: f64,
    pub volume: f32,
    /// Whether the current track failed to load.
    pub load_failed: bool,
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self {
            track: None,
            state: PlaybackState::Stopped,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            load_failed: false,
        }
    }
}

pub type SessionInfoHandle = Arc<Mutex<SessionInfo>>;

/// The one mutable aggregate of the crate. Owned by the session thread;
/// never shared.
pub(crate) struct PlaybackSession {
    queue: Vec<Track>,
    current: Option<Track>,
    state: PlaybackState,
    position: f64,
    duration: f64,
    volume: f32,
    /// At-most-once gate for listen tracking; reset on every track load.
    listen_recorded: bool,
    load_failed: bool,
    device: Sender<DeviceCmd>,
    recorder: Box<dyn ListenRecorder>,
}

impl PlaybackSession {
    pub(crate) fn new(
        device: Sender<DeviceCmd>,
        recorder: Box<dyn ListenRecorder>,
        volume: f32,
    ) -> Self {
        Self {
            queue: Vec::new(),
            current: None,
            state: PlaybackState::Stopped,
            position: 0.0,
            duration: 0.0,
            volume: volume.clamp(0.0, 1.0),
            listen_recorded: false,
            load_failed: false,
            device,
            recorder,
        }
    }

    pub(crate) fn apply(&mut self, cmd: SessionCmd) {
        match cmd {
            SessionCmd::Play(track) => self.play(track),
            SessionCmd::Pause => self.pause(),
            SessionCmd::Resume => self.resume(),
            SessionCmd::TogglePause => self.toggle_pause(),
            SessionCmd::Next => self.next(),
            SessionCmd::Previous => self.previous(),
            SessionCmd::Seek(t) => self.seek(t),
            SessionCmd::SetVolume(v) => self.set_volume(v),
            SessionCmd::SetQueue(tracks) => self.set_queue(tracks),
            // Handled by the runner loop.
            SessionCmd::Quit => {}
        }
    }

    /// Attach `track` and begin output. No-op when the track carries no audio
    /// locator. Always resets position, duration and the listen gate.
    pub(crate) fn play(&mut self, track: Track) {
        if track.audio_locator().is_none() {
            debug!(track_id = %track.id, "play request without audio locator, ignoring");
            return;
        }
        self.current = Some(track.clone());
        self.state = PlaybackState::Playing;
        self.position = 0.0;
        self.duration = 0.0;
        self.listen_recorded = false;
        self.load_failed = false;
        let _ = self.device.send(DeviceCmd::Attach(track));
    }

    pub(crate) fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
            let _ = self.device.send(DeviceCmd::Pause);
        }
    }

    pub(crate) fn resume(&mut self) {
        if self.state == PlaybackState::Paused {
            self.state = PlaybackState::Playing;
            let _ = self.device.send(DeviceCmd::Play);
        }
    }

    pub(crate) fn toggle_pause(&mut self) {
        match self.state {
            PlaybackState::Playing => self.pause(),
            PlaybackState::Paused => self.resume(),
            PlaybackState::Stopped => {}
        }
    }

    /// Advance to the next queue entry, wrapping to the start. A current
    /// track no longer present in the queue behaves like index -1, so the
    /// first entry plays.
    pub(crate) fn next(&mut self) {
        if self.current.is_none() || self.queue.is_empty() {
            return;
        }
        let target = match self.queue_index() {
            Some(i) => (i + 1) % self.queue.len(),
            None => 0,
        };
        let track = self.queue[target].clone();
        self.play(track);
    }

    /// Go back to the previous queue entry, wrapping to the end; a stale
    /// current track also wraps to the end.
    pub(crate) fn previous(&mut self) {
        if self.current.is_none() || self.queue.is_empty() {
            return;
        }
        let target = match self.queue_index() {
            Some(0) | None => self.queue.len() - 1,
            Some(i) => i - 1,
        };
        let track = self.queue[target].clone();
        self.play(track);
    }

    pub(crate) fn seek(&mut self, t: f64) {
        if self.state == PlaybackState::Stopped {
            return;
        }
        if !t.is_finite() {
            return;
        }
        let t = t.clamp(0.0, self.duration);
        self.position = t;
        let _ = self.device.send(DeviceCmd::Seek(t));
    }

    pub(crate) fn set_volume(&mut self, v: f32) {
        if !v.is_finite() {
            return;
        }
        let v = v.clamp(0.0, 1.0);
        self.volume = v;
        let _ = self.device.send(DeviceCmd::SetVolume(v));
    }

    /// Replace the play queue wholesale. The current track keeps playing even
    /// when it is no longer a member.
    pub(crate) fn set_queue(&mut self, tracks: Vec<Track>) {
        self.queue = tracks;
    }

    /// Dispatch one device callback. Events from a superseded load (track
    /// identity other than the current one) are discarded.
    pub(crate) fn handle_device(&mut self, event: DeviceEvent) {
        let Some(current_id) = self.current.as_ref().map(|t| t.id.clone()) else {
            debug!(track_id = %event.track_id(), "device event with no current track, ignoring");
            return;
        };
        if event.track_id() != current_id {
            debug!(track_id = %event.track_id(), "stale device event, ignoring");
            return;
        }

        match event {
            DeviceEvent::MetadataLoaded { duration, .. } => {
                self.duration = duration.max(0.0);
                if self.duration > 0.0 && self.position > self.duration {
                    self.position = self.duration;
                }
            }
            DeviceEvent::Started { .. } => {
                self.state = PlaybackState::Playing;
            }
            DeviceEvent::Paused { .. } => {
                if self.state == PlaybackState::Playing {
                    self.state = PlaybackState::Paused;
                }
            }
            DeviceEvent::PositionTick { position, .. } => {
                if self.state != PlaybackState::Playing {
                    return;
                }
                self.position = if self.duration > 0.0 {
                    position.clamp(0.0, self.duration)
                } else {
                    position.max(0.0)
                };
                self.record_listen_if_due(&current_id);
            }
            DeviceEvent::Ended { .. } => {
                self.state = PlaybackState::Stopped;
                if self.duration > 0.0 {
                    self.position = self.duration;
                }
                // Auto-advance; wraps around the queue, replays a 1-track queue.
                self.next();
            }
            DeviceEvent::LoadFailed { message, .. } => {
                warn!(track_id = %current_id, %message, "audio load failed");
                self.state = PlaybackState::Stopped;
                self.position = 0.0;
                self.duration = 0.0;
                self.load_failed = true;
            }
        }
    }

    /// Teardown: detach the audio resource and stop the output thread.
    pub(crate) fn release(&mut self) {
        self.state = PlaybackState::Stopped;
        let _ = self.device.send(DeviceCmd::Release);
        let _ = self.device.send(DeviceCmd::Quit);
    }

    pub(crate) fn snapshot(&self) -> SessionInfo {
        SessionInfo {
            track: self.current.clone(),
            state: self.state,
            position: self.position,
            duration: self.duration,
            volume: self.volume,
            load_failed: self.load_failed,
        }
    }

    fn queue_index(&self) -> Option<usize> {
        let current = self.current.as_ref()?;
        self.queue.iter().position(|t| t.id == current.id)
    }

    /// Fire the listen side effect once the threshold is crossed. The flag is
    /// set even when the remote call fails: the call is log-and-swallow with
    /// no retry.
    fn record_listen_if_due(&mut self, track_id: &str) {
        if self.listen_recorded || self.position <= LISTEN_THRESHOLD_SECS {
            return;
        }
        if let Err(err) = self.recorder.record_listen(track_id) {
            warn!(track_id = %track_id, error = %err, "listen recording failed");
        }
        self.listen_recorded = true;
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> PlaybackState {
        self.state
    }

    #[cfg(test)]
    pub(crate) fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    #[cfg(test)]
    pub(crate) fn position(&self) -> f64 {
        self.position
    }

    #[cfg(test)]
    pub(crate) fn duration(&self) -> f64 {
        self.duration
    }

    #[cfg(test)]
    pub(crate) fn volume(&self) -> f32 {
        self.volume
    }

    #[cfg(test)]
    pub(crate) fn listen_recorded(&self) -> bool {
        self.listen_recorded
    }

    #[cfg(test)]
    pub(crate) fn load_failed(&self) -> bool {
        self.load_failed
    }
}
