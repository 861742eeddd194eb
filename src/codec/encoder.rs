//! Encoder and backend trait definitions
//!
//! The actual encoders and the container writer are platform services; this
//! crate only drives them. `MediaBackend` is the factory seam a host
//! environment implements to plug its codec stack into the recorder.

use super::format::{AccessUnit, AudioEncodeParams, TrackFormat, VideoEncodeFormat};
use crate::error::RecordingResult;
use crate::mux::ContainerWriter;
use std::path::Path;
use std::time::Duration;

/// Result of polling an encoder for output
#[derive(Debug)]
pub enum EncoderOutput {
    /// Nothing ready within the timeout; not an error
    TryAgain,

    /// The negotiated output format is now known
    ///
    /// Reported once per encoder, before any access unit. The receiver must
    /// register a track with the container writer before samples can be
    /// written.
    FormatReady(TrackFormat),

    /// One compressed access unit
    Sample(AccessUnit),
}

/// A configured, started encoder instance
///
/// Owned exclusively by one encode stage and only ever called from that
/// stage's worker thread; implementations do not need to be thread-safe
/// beyond `Send`.
pub trait Encoder: Send {
    /// Submit one unit of raw input with its presentation timestamp.
    ///
    /// Waits at most `timeout` for a free input slot. Returns `Ok(false)`
    /// when no slot freed up in time; the caller drops that input rather
    /// than blocking further.
    fn queue_input(&mut self, data: &[u8], pts_us: i64, timeout: Duration)
        -> RecordingResult<bool>;

    /// Poll for the next piece of encoder output, waiting at most `timeout`.
    fn dequeue_output(&mut self, timeout: Duration) -> RecordingResult<EncoderOutput>;

    /// Stop the encoder and free its native resources.
    fn stop(&mut self) -> RecordingResult<()>;
}

/// Factory seam for the host platform's codec and container services
pub trait MediaBackend: Send + Sync {
    /// Open a container writer bound to `path`. Failure to open the path
    /// for writing is a fatal construction error for the recorder.
    fn open_writer(&self, path: &Path) -> RecordingResult<Box<dyn ContainerWriter>>;

    /// Create and start a video encoder for the negotiated format.
    fn create_video_encoder(
        &self,
        format: &VideoEncodeFormat,
    ) -> RecordingResult<Box<dyn Encoder>>;

    /// Create and start an audio encoder for the given parameters.
    fn create_audio_encoder(
        &self,
        params: &AudioEncodeParams,
    ) -> RecordingResult<Box<dyn Encoder>>;
}
