//! Recorder state and configuration
//!
//! Defines the recorder lifecycle state machine, construction-time
//! configuration, and the runtime stats snapshot.

use crate::codec::format::{AudioEncodeParams, VideoEncodeParams};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lifecycle state of a recorder
///
/// Transitions are one-directional: Idle → Encoding → Draining → Released.
/// `release()` is the only path into Released and may be taken from any
/// earlier state, including Idle when no frame ever arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderState {
    /// Constructed; no encoder exists yet
    Idle,
    /// First payload arrived and the encoder(s) are running
    Encoding,
    /// No longer accepting input; in-flight work is being flushed
    Draining,
    /// Terminal; all resources freed and worker threads told to exit
    Released,
}

impl Default for RecorderState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Immutable configuration for one recorder
///
/// A recorder is constructed once with this config and is not reusable
/// after release.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderConfig {
    /// Target container file path
    pub output_path: PathBuf,

    /// Whether to run the audio encode stage
    pub enable_audio: bool,

    /// Video encoder tuning
    #[serde(default)]
    pub video: VideoEncodeParams,

    /// Audio encoder tuning
    #[serde(default)]
    pub audio: AudioEncodeParams,
}

impl RecorderConfig {
    /// Config with default encode parameters.
    pub fn new(output_path: impl Into<PathBuf>, enable_audio: bool) -> Self {
        Self {
            output_path: output_path.into(),
            enable_audio,
            video: VideoEncodeParams::default(),
            audio: AudioEncodeParams::default(),
        }
    }
}

/// Snapshot of recorder counters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderStats {
    /// Wall-clock time the recorder was constructed
    pub started_at: DateTime<Utc>,

    /// Frames accepted from the frame source
    pub frames_submitted: u64,

    /// Frames dropped for lack of a free encoder input slot
    pub frames_dropped: u64,

    /// Video access units handed to the container writer
    pub video_samples_written: u64,

    /// Audio access units handed to the container writer
    pub audio_samples_written: u64,
}
