//! The playback session: the single owner of audio playback state.
//!
//! `session::model` holds the state machine (transitions, queue navigation,
//! the listen-tracking gate), `session::runner` the thread that feeds it from
//! a merged command/event mailbox, and `session::player` the public handle
//! that wires the session and output threads together.

mod model;
mod player;
mod runner;

pub use model::{PlaybackState, SessionCmd, SessionInfo, SessionInfoHandle};
pub use player::{SessionClosed, SessionPlayer};
