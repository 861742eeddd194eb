//! framemux - dual-track encode-and-mux recording pipeline.
//!
//! Raw video frames pushed from a rendering callback and, optionally,
//! PCM audio pulled from a capture device are each fed to an encoder, and
//! the compressed streams are interleaved into a single container file.
//! Encoders and the container writer are host services plugged in through
//! the [`MediaBackend`] and [`ContainerWriter`] traits; this crate owns the
//! sequencing around them:
//!
//! - per-stage worker threads so the two encode pipelines never contend
//!   and encoder calls stay on one owning thread each,
//! - lazy encoder creation once the first payload reveals its format,
//! - writer startup gated until every expected track has registered,
//! - drain-then-stop-then-release teardown that preserves in-flight data.
//!
//! Entry point is [`Recorder`].

pub mod clock;
pub mod codec;
pub mod error;
pub mod mux;
pub mod recorder;
pub mod source;

pub use codec::{
    AccessUnit, AudioEncodeParams, AudioProfile, Encoder, EncoderOutput, MediaBackend,
    PixelFormat, SampleInfo, TrackFormat, TrackKind, VideoEncodeFormat, VideoEncodeParams,
    AUDIO_MIME, VIDEO_MIME,
};
pub use error::{RecordingError, RecordingResult};
pub use mux::{ContainerWriter, MuxCoordinator};
pub use recorder::{Recorder, RecorderConfig, RecorderState, RecorderStats};
pub use source::AudioSource;
