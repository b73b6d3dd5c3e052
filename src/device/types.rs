use crate::track::Track;

/// Requests sent to the output thread. None of these block the caller;
/// completion is observed through `DeviceEvent`s.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DeviceCmd {
    /// Release whatever is attached and attach this track's audio resource.
    Attach(Track),
    /// Resume output from the retained position.
    Play,
    /// Halt output, retaining the position.
    Pause,
    /// Relocate the output position (seconds, already clamped by the session).
    Seek(f64),
    /// Apply a volume in [0, 1] to the device (and to future sinks).
    SetVolume(f32),
    /// Detach and drop the current audio resource.
    Release,
    /// Shut the output thread down.
    Quit,
}

/// Callbacks from the output thread. Every event carries the identity of the
/// track it belongs to so the session can discard events from a superseded
/// load.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DeviceEvent {
    /// The resource decoded; duration is 0.0 when the decoder cannot tell.
    MetadataLoaded { track_id: String, duration: f64 },
    Started { track_id: String },
    Paused { track_id: String },
    PositionTick { track_id: String, position: f64 },
    Ended { track_id: String },
    LoadFailed { track_id: String, message: String },
}

impl DeviceEvent {
    pub(crate) fn track_id(&self) -> &str {
        match self {
            DeviceEvent::MetadataLoaded { track_id, .. }
            | DeviceEvent::Started { track_id }
            | DeviceEvent::Paused { track_id }
            | DeviceEvent::PositionTick { track_id, .. }
            | DeviceEvent::Ended { track_id }
            | DeviceEvent::LoadFailed { track_id, .. } => track_id,
        }
    }
}
