//! Audio output device collaborator.
//!
//! The session talks to the device through a fire-and-forget command channel
//! (`DeviceCmd`) and observes completion through track-id-tagged events
//! (`DeviceEvent`). The rodio-backed output thread lives in `device::output`.

mod output;
mod source;
mod types;

pub(crate) use output::spawn_output_thread;
pub(crate) use types::{DeviceCmd, DeviceEvent};
