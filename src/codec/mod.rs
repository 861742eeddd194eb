//! Codec formats and the encoder seam
//!
//! Format descriptions for both tracks plus the traits a host platform
//! implements to supply encoders and the container writer.

pub mod encoder;
pub mod format;

pub use encoder::{Encoder, EncoderOutput, MediaBackend};
pub use format::{
    AccessUnit, AudioEncodeParams, AudioProfile, PixelFormat, SampleInfo, TrackFormat, TrackKind,
    VideoEncodeFormat, VideoEncodeParams, AUDIO_MIME, VIDEO_MIME,
};
