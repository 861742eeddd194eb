//! Audio source trait
//!
//! Pull-based interface over a PCM capture device. The audio stage polls
//! the source from its own worker thread; capture itself (microphone,
//! loopback, ...) is the host's concern.

use crate::error::RecordingResult;

/// A pull-based PCM capture device
pub trait AudioSource: Send {
    /// Best-effort, non-blocking read of captured PCM bytes into `buf`.
    ///
    /// Returns the number of bytes read; `Ok(0)` means nothing is buffered
    /// right now and is not an error.
    fn read(&mut self, buf: &mut [u8]) -> RecordingResult<usize>;

    /// Stop capture and release the device.
    fn stop(&mut self) -> RecordingResult<()>;
}
