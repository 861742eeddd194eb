//! Error types and handling
//!
//! Common error types used across the recording pipeline.

use thiserror::Error;

/// Errors that can occur during recording
#[derive(Error, Debug)]
pub enum RecordingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Encoder error: {0}")]
    Encoder(String),

    #[error("Muxer error: {0}")]
    Muxer(String),

    #[error("Audio source error: {0}")]
    Source(String),

    #[error("Recorder already released")]
    Released,
}

/// Result type for recording operations
pub type RecordingResult<T> = Result<T, RecordingError>;
