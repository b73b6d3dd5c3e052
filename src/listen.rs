//! Listen tracking: reporting counted plays to the backend.
//!
//! The session calls [`ListenRecorder`] at most once per track load, after
//! 30 seconds of playback. The backend call is not idempotent, so the gate
//! lives on the caller side.

mod http;
mod types;

pub use http::HttpListenRecorder;
pub use types::{ListenError, ListenRecorder};
