//! Loading audio resources and building `rodio` sinks from them.
//!
//! Resources are fetched whole (HTTP for remote locators, the filesystem
//! otherwise) and kept as shared bytes so seeking can rebuild the sink at an
//! offset with `skip_duration`.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};
use thiserror::Error;

/// Cap on a fetched audio resource. Large enough for any lossless track the
/// catalog serves.
const MAX_AUDIO_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Error)]
pub(crate) enum SourceError {
    #[error("failed to read audio file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to fetch audio resource: {0}")]
    Fetch(#[from] ureq::Error),
    #[error("failed to decode audio resource: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
}

/// Whether a locator points at a remote resource rather than a local file.
pub(crate) fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

/// Fetch the resource behind `locator` and probe its duration (0.0 when the
/// decoder cannot determine it).
pub(crate) fn load_resource(locator: &str) -> Result<(Arc<[u8]>, f64), SourceError> {
    let bytes: Arc<[u8]> = fetch_bytes(locator)?.into();
    let decoder = Decoder::new(Cursor::new(bytes.clone()))?;
    let duration = decoder
        .total_duration()
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0);
    Ok((bytes, duration))
}

fn fetch_bytes(locator: &str) -> Result<Vec<u8>, SourceError> {
    if is_remote(locator) {
        let mut response = ureq::get(locator).call()?;
        let bytes = response
            .body_mut()
            .with_config()
            .limit(MAX_AUDIO_BYTES)
            .read_to_vec()?;
        Ok(bytes)
    } else {
        Ok(std::fs::read(locator)?)
    }
}

/// Create a paused `Sink` over `bytes` that starts playback at `start_at`.
pub(crate) fn create_sink_at(
    handle: &OutputStream,
    bytes: Arc<[u8]>,
    start_at: Duration,
) -> Result<Sink, SourceError> {
    let source = Decoder::new(Cursor::new(bytes))?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
