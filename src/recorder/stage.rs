//! Shared encode-stage plumbing
//!
//! State shared between the two stage worker threads plus the drain loop
//! both stages run identically after each input submission.

use crate::codec::encoder::{Encoder, EncoderOutput};
use crate::codec::format::TrackKind;
use crate::mux::MuxCoordinator;
use crate::recorder::state::RecorderState;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Bounded wait for a free encoder input slot; a miss drops that input.
pub(crate) const INPUT_TIMEOUT: Duration = Duration::from_millis(10);

/// Bounded wait for encoder output per drain poll.
pub(crate) const DEQUEUE_TIMEOUT: Duration = Duration::from_millis(10);

/// One raw frame posted to the video stage
#[derive(Debug)]
pub(crate) struct RawFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub pts_us: i64,
}

/// State shared between the caller thread and both stage workers
///
/// The mux coordinator serializes its own interior; everything else here
/// is atomics plus the state cell.
pub(crate) struct Shared {
    running: AtomicBool,
    state: RwLock<RecorderState>,
    pub mux: MuxCoordinator,
    pub frames_submitted: AtomicU64,
    pub frames_dropped: AtomicU64,
    pub video_samples: AtomicU64,
    pub audio_samples: AtomicU64,
}

impl Shared {
    pub fn new(mux: MuxCoordinator) -> Self {
        Self {
            running: AtomicBool::new(true),
            state: RwLock::new(RecorderState::Idle),
            mux,
            frames_submitted: AtomicU64::new(0),
            frames_dropped: AtomicU64::new(0),
            video_samples: AtomicU64::new(0),
            audio_samples: AtomicU64::new(0),
        }
    }

    /// Whether the aggregate still accepts input.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn state(&self) -> RecorderState {
        *self.state.read()
    }

    /// Idle → Encoding, on first encoder configuration.
    pub fn begin_encoding(&self) {
        let mut state = self.state.write();
        if *state == RecorderState::Idle {
            *state = RecorderState::Encoding;
        }
    }

    /// Stop accepting input and move to Draining (unless already Released).
    ///
    /// Entered on release() or when either stage observes an end-of-stream
    /// marker.
    pub fn begin_draining(&self) {
        self.running.store(false, Ordering::Release);
        let mut state = self.state.write();
        if *state != RecorderState::Released {
            *state = RecorderState::Draining;
        }
    }

    /// Terminal transition, taken by whichever stage closes the writer.
    pub fn mark_released(&self) {
        *self.state.write() = RecorderState::Released;
    }

    fn sample_counter(&self, kind: TrackKind) -> &AtomicU64 {
        match kind {
            TrackKind::Video => &self.video_samples,
            TrackKind::Audio => &self.audio_samples,
        }
    }
}

/// Drain all currently available output from `encoder`.
///
/// Runs until the encoder reports nothing ready, the stream ends, or an
/// anomaly aborts this drain. Errors are contained here: they end the
/// current drain and the worker carries on with its next unit of work.
pub(crate) fn drain(encoder: &mut dyn Encoder, shared: &Shared, kind: TrackKind) {
    loop {
        match encoder.dequeue_output(DEQUEUE_TIMEOUT) {
            Ok(EncoderOutput::TryAgain) => break,
            Ok(EncoderOutput::FormatReady(format)) => {
                if let Err(e) = shared.mux.register_track(&format) {
                    tracing::warn!(%kind, error = %e, "track registration failed, drain aborted");
                    break;
                }
            }
            Ok(EncoderOutput::Sample(unit)) => {
                match shared.mux.write_sample(kind, &unit.data, &unit.info) {
                    Ok(true) => {
                        shared.sample_counter(kind).fetch_add(1, Ordering::Relaxed);
                    }
                    // Writer not started yet: the sample is dropped, not queued.
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!(%kind, error = %e, "sample write failed, drain aborted");
                        break;
                    }
                }
                if unit.info.end_of_stream {
                    tracing::info!(%kind, "end of stream observed");
                    shared.begin_draining();
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(%kind, error = %e, "dequeue failed, drain aborted");
                break;
            }
        }
    }
}
