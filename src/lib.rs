//! Headless playback session manager for a streaming music client.
//!
//! The crate owns exactly one audio output at a time and exposes transport
//! controls (`play`/`pause`/`resume`/`next`/`previous`/`seek`/volume) over a
//! play queue supplied wholesale by the caller. Once a track has played past
//! the 30-second mark, a listen is reported to the backend RPC layer at most
//! once per track load.
//!
//! Construct a [`SessionPlayer`] at application start, send it
//! [`SessionCmd`]s, observe progress through its [`SessionInfoHandle`], and
//! call [`SessionPlayer::shutdown`] on exit to release the audio device.

pub mod config;
mod device;
pub mod listen;
pub mod session;
pub mod track;

pub use config::Settings;
pub use listen::{HttpListenRecorder, ListenError, ListenRecorder};
pub use session::{
    PlaybackState, SessionClosed, SessionCmd, SessionInfo, SessionInfoHandle, SessionPlayer,
};
pub use track::Track;
