//! Video encode stage
//!
//! One worker thread owns the video encoder. The caller posts frames and
//! never blocks on encoder calls; each posted frame is enqueued (bounded
//! wait, dropped on a miss) and followed by a full drain. The encoder is
//! configured lazily on the first frame, once its dimensions are known.

use super::stage::{self, RawFrame, Shared, INPUT_TIMEOUT};
use crate::codec::encoder::{Encoder, MediaBackend};
use crate::codec::format::{TrackKind, VideoEncodeFormat, VideoEncodeParams};
use crossbeam_channel::Receiver;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Unit of work for the video worker
pub(crate) enum VideoJob {
    Frame(RawFrame),
    Shutdown,
}

/// One-time, data-driven encoder initialization state
enum EncoderSlot {
    Unconfigured,
    Configured(Box<dyn Encoder>),
    /// Construction failed; the stage drops all further frames silently.
    Failed,
}

pub(crate) fn spawn(
    shared: Arc<Shared>,
    backend: Arc<dyn MediaBackend>,
    params: VideoEncodeParams,
    jobs: Receiver<VideoJob>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("framemux-video".into())
        .spawn(move || {
            let mut stage = VideoStage {
                shared,
                backend,
                params,
                encoder: EncoderSlot::Unconfigured,
            };
            // Jobs already queued when shutdown is posted still run first,
            // so no in-flight frame is lost to teardown.
            for job in jobs {
                match job {
                    VideoJob::Frame(frame) => stage.encode_frame(frame),
                    VideoJob::Shutdown => break,
                }
            }
            stage.teardown();
        })
        .expect("failed to spawn video stage thread")
}

struct VideoStage {
    shared: Arc<Shared>,
    backend: Arc<dyn MediaBackend>,
    params: VideoEncodeParams,
    encoder: EncoderSlot,
}

impl VideoStage {
    fn encode_frame(&mut self, frame: RawFrame) {
        if matches!(self.encoder, EncoderSlot::Unconfigured) {
            self.configure(frame.width, frame.height);
        }
        let EncoderSlot::Configured(encoder) = &mut self.encoder else {
            return;
        };

        match encoder.queue_input(&frame.data, frame.pts_us, INPUT_TIMEOUT) {
            Ok(true) => {}
            Ok(false) => {
                // Accepted data loss under backpressure; not an error.
                self.shared.frames_dropped.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(pts_us = frame.pts_us, "no free input slot, frame dropped");
            }
            Err(e) => {
                tracing::warn!(error = %e, "video input enqueue failed");
                return;
            }
        }

        stage::drain(encoder.as_mut(), &self.shared, TrackKind::Video);
    }

    fn configure(&mut self, width: u32, height: u32) {
        let format = VideoEncodeFormat {
            width,
            height,
            params: self.params,
        };
        match self.backend.create_video_encoder(&format) {
            Ok(encoder) => {
                tracing::info!(width, height, "video encoder configured");
                self.shared.begin_encoding();
                self.encoder = EncoderSlot::Configured(encoder);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to configure video encoder");
                self.encoder = EncoderSlot::Failed;
            }
        }
    }

    fn teardown(&mut self) {
        if let EncoderSlot::Configured(encoder) = &mut self.encoder {
            if let Err(e) = encoder.stop() {
                tracing::warn!(error = %e, "stopping video encoder failed");
            }
        }
        match self.shared.mux.stage_finished() {
            Ok(false) => {}
            Ok(true) => self.shared.mark_released(),
            Err(e) => {
                tracing::warn!(error = %e, "finalizing container writer failed");
                self.shared.mark_released();
            }
        }
        tracing::debug!("video stage finished");
    }
}
