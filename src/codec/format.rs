//! Encode formats and access units
//!
//! Negotiated format descriptions exchanged between the encode stages,
//! the codec backend, and the container writer.

use serde::{Deserialize, Serialize};

/// MIME type for the compressed video stream (H.264/AVC).
pub const VIDEO_MIME: &str = "video/avc";

/// MIME type for the compressed audio stream (AAC).
pub const AUDIO_MIME: &str = "audio/mp4a-latm";

/// Raw pixel layout of frames handed to the video encoder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    /// 32-bit ARGB, 8 bits per channel
    Argb8888,
    /// Planar YUV 4:2:0
    Yuv420,
    /// NV21 semi-planar YUV
    Nv21,
}

/// Audio encoder profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioProfile {
    /// Low-complexity profile (AAC-LC)
    LowComplexity,
    /// High-efficiency profile
    HighEfficiency,
}

/// Video encoder tuning parameters
///
/// Frame dimensions are not part of the params: they are only known once
/// the first raw frame arrives, at which point a [`VideoEncodeFormat`] is
/// built from params + dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEncodeParams {
    /// Raw input pixel layout
    pub pixel_format: PixelFormat,

    /// Target bit rate in bits per second
    pub bit_rate: u32,

    /// Target frame rate in frames per second
    pub frame_rate: u32,

    /// Seconds between forced key frames
    pub key_frame_interval_secs: u32,
}

impl Default for VideoEncodeParams {
    fn default() -> Self {
        Self {
            pixel_format: PixelFormat::Argb8888,
            bit_rate: 6_000_000,
            frame_rate: 30,
            key_frame_interval_secs: 5,
        }
    }
}

/// Audio encoder tuning parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioEncodeParams {
    /// Sample rate in Hz
    pub sample_rate: u32,

    /// Channel count (mono capture by default)
    pub channels: u16,

    /// Target bit rate in bits per second
    pub bit_rate: u32,

    /// Encoder profile
    pub profile: AudioProfile,
}

impl Default for AudioEncodeParams {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
            bit_rate: 128 * 1024,
            profile: AudioProfile::LowComplexity,
        }
    }
}

/// Fully negotiated video encoder input format
///
/// Built by the video stage on first-frame arrival, once the frame
/// dimensions are known.
#[derive(Debug, Clone, Copy)]
pub struct VideoEncodeFormat {
    pub width: u32,
    pub height: u32,
    pub params: VideoEncodeParams,
}

/// Which logical stream a track or sample belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    Video,
    Audio,
}

impl std::fmt::Display for TrackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackKind::Video => write!(f, "video"),
            TrackKind::Audio => write!(f, "audio"),
        }
    }
}

/// Output format an encoder reports once it has started producing data
///
/// Handed to the container writer to register a track. The codec-specific
/// configuration blob (e.g. SPS/PPS, AudioSpecificConfig) is opaque to this
/// crate.
#[derive(Debug, Clone)]
pub enum TrackFormat {
    Video {
        mime: String,
        width: u32,
        height: u32,
        frame_rate: u32,
        codec_config: Vec<u8>,
    },
    Audio {
        mime: String,
        sample_rate: u32,
        channels: u16,
        codec_config: Vec<u8>,
    },
}

impl TrackFormat {
    pub fn kind(&self) -> TrackKind {
        match self {
            TrackFormat::Video { .. } => TrackKind::Video,
            TrackFormat::Audio { .. } => TrackKind::Audio,
        }
    }
}

/// Metadata describing one produced access unit
///
/// Transient cursor valid for a single drain iteration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleInfo {
    /// Presentation timestamp in microseconds
    pub pts_us: i64,

    /// Whether this unit is a sync sample (key frame)
    pub key_frame: bool,

    /// Whether this is the final unit of the stream
    pub end_of_stream: bool,
}

/// One compressed output unit produced by an encoder
#[derive(Debug, Clone)]
pub struct AccessUnit {
    pub data: Vec<u8>,
    pub info: SampleInfo,
}
