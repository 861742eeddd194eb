//! Recording pipeline
//!
//! The recorder aggregate, its lifecycle state machine, and the two encode
//! stage workers:
//! - Video stage: raw frames posted from the frame source callback
//! - Audio stage: PCM polled from an [`AudioSource`](crate::source::AudioSource)
//! - Both feed compressed access units into the mux coordinator

mod audio;
pub mod coordinator;
mod stage;
pub mod state;
mod video;

pub use coordinator::Recorder;
pub use state::{RecorderConfig, RecorderState, RecorderStats};
