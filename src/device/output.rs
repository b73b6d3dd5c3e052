//! The rodio-backed output thread.
//!
//! Owns the one `OutputStream`/`Sink` pair of the process. Commands arrive on
//! a channel; position ticks and end-of-track detection happen on the receive
//! timeout, with elapsed time tracked as `started_at` + accumulated duration
//! so pauses retain the position.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rodio::{OutputStreamBuilder, Sink};
use tracing::{debug, warn};

use super::source::{create_sink_at, load_resource};
use super::types::{DeviceCmd, DeviceEvent};

/// The currently attached resource. Bytes are retained so `Seek` can rebuild
/// the sink at an offset.
struct Attached {
    track_id: String,
    bytes: Arc<[u8]>,
}

pub(crate) fn spawn_output_thread(
    rx: Receiver<DeviceCmd>,
    on_event: impl Fn(DeviceEvent) + Send + 'static,
    tick_interval: Duration,
    initial_volume: f32,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream =
            OutputStreamBuilder::open_default_stream().expect("no audio output device available");
        // rodio logs to stderr when OutputStream is dropped; keep shutdown quiet.
        stream.log_on_drop(false);

        let mut attached: Option<Attached> = None;
        let mut sink: Option<Sink> = None;
        let mut paused = false;
        let mut volume = initial_volume;

        // Start time of the current play stretch and elapsed time accumulated
        // across earlier stretches (pauses, seeks).
        let mut started_at: Option<Instant> = None;
        let mut accumulated = Duration::ZERO;

        loop {
            match rx.recv_timeout(tick_interval) {
                Ok(DeviceCmd::Attach(track)) => {
                    // Never two tracks on the device: stop the old sink first.
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    attached = None;
                    started_at = None;
                    accumulated = Duration::ZERO;
                    paused = false;

                    let Some(locator) = track.audio_locator() else {
                        debug!(track_id = %track.id, "attach without audio locator, ignoring");
                        continue;
                    };

                    match load_resource(locator) {
                        Ok((bytes, duration)) => {
                            match create_sink_at(&stream, bytes.clone(), Duration::ZERO) {
                                Ok(new_sink) => {
                                    new_sink.set_volume(volume);
                                    new_sink.play();
                                    sink = Some(new_sink);
                                    started_at = Some(Instant::now());
                                    attached = Some(Attached {
                                        track_id: track.id.clone(),
                                        bytes,
                                    });
                                    on_event(DeviceEvent::MetadataLoaded {
                                        track_id: track.id.clone(),
                                        duration,
                                    });
                                    on_event(DeviceEvent::Started { track_id: track.id });
                                }
                                Err(err) => {
                                    warn!(track_id = %track.id, error = %err, "sink build failed");
                                    on_event(DeviceEvent::LoadFailed {
                                        track_id: track.id,
                                        message: err.to_string(),
                                    });
                                }
                            }
                        }
                        Err(err) => {
                            warn!(track_id = %track.id, error = %err, "audio load failed");
                            on_event(DeviceEvent::LoadFailed {
                                track_id: track.id,
                                message: err.to_string(),
                            });
                        }
                    }
                }

                Ok(DeviceCmd::Play) => {
                    if let (Some(s), Some(a)) = (sink.as_ref(), attached.as_ref()) {
                        s.play();
                        paused = false;
                        started_at = Some(Instant::now());
                        on_event(DeviceEvent::Started {
                            track_id: a.track_id.clone(),
                        });
                    }
                }

                Ok(DeviceCmd::Pause) => {
                    if let (Some(s), Some(a)) = (sink.as_ref(), attached.as_ref()) {
                        s.pause();
                        if let Some(st) = started_at.take() {
                            accumulated += st.elapsed();
                        }
                        paused = true;
                        on_event(DeviceEvent::Paused {
                            track_id: a.track_id.clone(),
                        });
                    }
                }

                Ok(DeviceCmd::Seek(secs)) => {
                    // Scrubbing: rebuild the sink from the retained bytes and
                    // skip into the stream.
                    let Some(a) = attached.as_ref() else {
                        continue;
                    };
                    if let Some(s) = sink.take() {
                        s.stop();
                    }

                    let target = Duration::from_secs_f64(secs.max(0.0));
                    match create_sink_at(&stream, a.bytes.clone(), target) {
                        Ok(new_sink) => {
                            new_sink.set_volume(volume);
                            if paused {
                                started_at = None;
                            } else {
                                new_sink.play();
                                started_at = Some(Instant::now());
                            }
                            sink = Some(new_sink);
                            accumulated = target;
                            on_event(DeviceEvent::PositionTick {
                                track_id: a.track_id.clone(),
                                position: target.as_secs_f64(),
                            });
                        }
                        Err(err) => {
                            warn!(track_id = %a.track_id, error = %err, "seek rebuild failed");
                            let track_id = a.track_id.clone();
                            attached = None;
                            started_at = None;
                            on_event(DeviceEvent::LoadFailed {
                                track_id,
                                message: err.to_string(),
                            });
                        }
                    }
                }

                Ok(DeviceCmd::SetVolume(v)) => {
                    volume = v;
                    if let Some(s) = sink.as_ref() {
                        s.set_volume(v);
                    }
                }

                Ok(DeviceCmd::Release) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    attached = None;
                    started_at = None;
                    accumulated = Duration::ZERO;
                    paused = false;
                }

                Ok(DeviceCmd::Quit) => {
                    if let Some(s) = sink.take() {
                        s.stop();
                    }
                    break;
                }

                Err(RecvTimeoutError::Timeout) => {
                    // Periodic tick: report position, detect end-of-track.
                    let (Some(s), Some(a)) = (sink.as_ref(), attached.as_ref()) else {
                        continue;
                    };
                    if paused {
                        continue;
                    }
                    if s.empty() {
                        let track_id = a.track_id.clone();
                        sink = None;
                        attached = None;
                        started_at = None;
                        accumulated = Duration::ZERO;
                        on_event(DeviceEvent::Ended { track_id });
                    } else {
                        let elapsed =
                            accumulated + started_at.map_or(Duration::ZERO, |st| st.elapsed());
                        on_event(DeviceEvent::PositionTick {
                            track_id: a.track_id.clone(),
                            position: elapsed.as_secs_f64(),
                        });
                    }
                }

                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
