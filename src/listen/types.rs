use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListenError {
    /// The endpoint answered and rejected the call.
    #[error("listen endpoint rejected the call: {0}")]
    Remote(String),
    /// The backend could not be reached at all.
    #[error("listen call failed to reach the backend: {0}")]
    Transport(String),
}

/// Records one counted play for a track.
///
/// Side-effect only; the server does not deduplicate, so callers must prevent
/// duplicate calls per track load themselves.
pub trait ListenRecorder: Send {
    fn record_listen(&self, track_id: &str) -> Result<(), ListenError>;
}
