//! Recorder aggregate
//!
//! Owns the container writer (through the mux coordinator), the two stage
//! worker threads, and the lifecycle flags. The construction thread only
//! posts work; all encoder calls happen on the owning stage's thread.

use super::audio;
use super::stage::{RawFrame, Shared};
use super::state::{RecorderConfig, RecorderState, RecorderStats};
use super::video::{self, VideoJob};
use crate::codec::encoder::MediaBackend;
use crate::error::{RecordingError, RecordingResult};
use crate::mux::MuxCoordinator;
use crate::source::AudioSource;
use chrono::{DateTime, Utc};
use crossbeam_channel::{bounded, unbounded, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Dual-track encode-and-mux recorder
///
/// Constructed once against a [`MediaBackend`]; raw frames arrive through
/// [`on_raw_frame`] and, when audio is enabled, PCM is pulled from the
/// given [`AudioSource`] on a dedicated thread. [`release`] is the single
/// shutdown path and is fire-and-forget; callers that must observe
/// completion follow it with [`wait`].
///
/// [`on_raw_frame`]: Recorder::on_raw_frame
/// [`release`]: Recorder::release
/// [`wait`]: Recorder::wait
pub struct Recorder {
    shared: Arc<Shared>,
    video_tx: Sender<VideoJob>,
    audio_shutdown: Option<Sender<()>>,
    video_thread: Option<JoinHandle<()>>,
    audio_thread: Option<JoinHandle<()>>,
    released: AtomicBool,
    started_at: DateTime<Utc>,
}

impl Recorder {
    /// Create a recorder writing to `config.output_path`.
    ///
    /// Opens the container writer immediately; failure to open the path is
    /// fatal. Encoders are not created here: their formats are only known
    /// once the first payload arrives.
    pub fn new(
        config: RecorderConfig,
        backend: Arc<dyn MediaBackend>,
        audio_source: Option<Box<dyn AudioSource>>,
    ) -> RecordingResult<Self> {
        tracing::info!(
            path = %config.output_path.display(),
            audio = config.enable_audio,
            "creating recorder"
        );

        let audio_source = if config.enable_audio {
            Some(audio_source.ok_or_else(|| {
                RecordingError::Configuration("audio enabled but no audio source given".into())
            })?)
        } else {
            None
        };

        let writer = backend.open_writer(&config.output_path)?;
        let mux = MuxCoordinator::new(writer, config.enable_audio);
        let shared = Arc::new(Shared::new(mux));

        let (video_tx, video_rx) = unbounded();
        let video_thread = video::spawn(shared.clone(), backend.clone(), config.video, video_rx);

        let (audio_shutdown, audio_thread) = if let Some(source) = audio_source {
            let (tx, rx) = bounded(1);
            let handle = audio::spawn(shared.clone(), backend, config.audio, source, rx);
            (Some(tx), Some(handle))
        } else {
            (None, None)
        };

        Ok(Self {
            shared,
            video_tx,
            audio_shutdown,
            video_thread: Some(video_thread),
            audio_thread,
            released: AtomicBool::new(false),
            started_at: Utc::now(),
        })
    }

    /// Frame source callback: one raw frame with its dimensions and
    /// presentation timestamp in microseconds.
    ///
    /// Never blocks on encoder work. Frames arriving after the recorder
    /// stopped running (release or end of stream) are ignored.
    pub fn on_raw_frame(&self, data: &[u8], width: u32, height: u32, pts_us: i64) {
        if !self.shared.is_running() {
            tracing::trace!("frame after stop ignored");
            return;
        }
        self.shared.frames_submitted.fetch_add(1, Ordering::Relaxed);
        let frame = RawFrame {
            data: data.to_vec(),
            width,
            height,
            pts_us,
        };
        // Send only fails once the worker is gone, i.e. after release.
        let _ = self.video_tx.send(VideoJob::Frame(frame));
    }

    /// Release all resources. Already posted frames are still encoded
    /// first; teardown runs on each stage's own thread behind any queued
    /// work. Idempotent, fire-and-forget.
    pub fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("releasing recorder");
        self.shared.begin_draining();
        if let Some(tx) = &self.audio_shutdown {
            let _ = tx.try_send(());
        }
        let _ = self.video_tx.send(VideoJob::Shutdown);
    }

    /// Block until both stage threads have fully torn down.
    ///
    /// Call after [`release`](Recorder::release); idempotent.
    pub fn wait(&mut self) {
        if let Some(handle) = self.audio_thread.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.video_thread.take() {
            let _ = handle.join();
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RecorderState {
        self.shared.state()
    }

    /// Whether the recorder still accepts input.
    pub fn is_running(&self) -> bool {
        self.shared.is_running()
    }

    /// Snapshot of the recorder's counters.
    pub fn stats(&self) -> RecorderStats {
        RecorderStats {
            started_at: self.started_at,
            frames_submitted: self.shared.frames_submitted.load(Ordering::Relaxed),
            frames_dropped: self.shared.frames_dropped.load(Ordering::Relaxed),
            video_samples_written: self.shared.video_samples.load(Ordering::Relaxed),
            audio_samples_written: self.shared.audio_samples.load(Ordering::Relaxed),
        }
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        self.release();
    }
}
