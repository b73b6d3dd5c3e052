//! The session thread: the single mutator of playback state.
//!
//! User commands and device callbacks arrive on one mailbox, so every state
//! transition is serialized by construction. After each input the runner
//! publishes a fresh `SessionInfo` snapshot for observers.

use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};

use super::model::{PlaybackSession, SessionCmd, SessionInfoHandle};
use crate::device::DeviceEvent;

/// One input to the session thread: either a user transport command or an
/// audio device callback.
pub(crate) enum Input {
    Cmd(SessionCmd),
    Device(DeviceEvent),
}

pub(crate) fn spawn_session_thread(
    rx: Receiver<Input>,
    mut session: PlaybackSession,
    info: SessionInfoHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        publish(&info, &session);
        loop {
            match rx.recv() {
                Ok(Input::Cmd(SessionCmd::Quit)) => {
                    session.release();
                    publish(&info, &session);
                    break;
                }
                Ok(Input::Cmd(cmd)) => session.apply(cmd),
                Ok(Input::Device(event)) => session.handle_device(event),
                Err(_) => break,
            }
            publish(&info, &session);
        }
    })
}

fn publish(info: &SessionInfoHandle, session: &PlaybackSession) {
    if let Ok(mut guard) = info.lock() {
        *guard = session.snapshot();
    }
}
