//! Container writer trait
//!
//! Interface for the external muxer service that interleaves compressed
//! streams into one container file.

use crate::codec::format::{SampleInfo, TrackFormat};
use crate::error::RecordingResult;

/// External container-muxer service
///
/// Tracks must all be registered before `start`; samples may only be
/// written between `start` and `finish`. The [`MuxCoordinator`] enforces
/// that ordering and serializes calls, so implementations are driven from
/// one call at a time but may be handed off between threads.
///
/// [`MuxCoordinator`]: super::MuxCoordinator
pub trait ContainerWriter: Send {
    /// Register one stream, returning its track index.
    fn add_track(&mut self, format: &TrackFormat) -> RecordingResult<usize>;

    /// Start the writer. All expected tracks must be registered.
    fn start(&mut self) -> RecordingResult<()>;

    /// Write one access unit to the given track.
    fn write_sample(
        &mut self,
        track: usize,
        data: &[u8],
        info: &SampleInfo,
    ) -> RecordingResult<()>;

    /// Finalize the container and release the writer.
    fn finish(&mut self) -> RecordingResult<()>;
}
