//! The track model consumed by the playback session.
//!
//! Tracks arrive as rows from the backend catalog and are immutable once
//! loaded into a session. Identity is the `id` field; everything else is
//! display metadata plus the audio resource locator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Backend identity of the track; used for queue lookups, stale-event
    /// detection and listen reporting.
    pub id: String,
    pub title: String,
    /// Display artist name as the catalog resolved it.
    pub artist: String,
    /// Locator of the audio resource (http(s) URL or local path). A track
    /// without one cannot be attached to the output device.
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
}

impl Track {
    /// The audio locator, if present and non-empty.
    pub fn audio_locator(&self) -> Option<&str> {
        self.audio_url.as_deref().filter(|u| !u.is_empty())
    }
}
