//! Audio encode stage
//!
//! One worker thread polls the PCM source while the aggregate is running:
//! best-effort read, submit with a monotonic microsecond timestamp, then
//! drain, symmetric with the video stage. The encoder is created on first
//! data arrival; its parameters are fixed by the recorder config.

use super::stage::{self, Shared, INPUT_TIMEOUT};
use crate::clock::MonotonicClock;
use crate::codec::encoder::{Encoder, MediaBackend};
use crate::codec::format::{AudioEncodeParams, TrackKind};
use crate::source::AudioSource;
use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// PCM bytes pulled from the source per poll.
const PCM_CHUNK: usize = 2048;

/// Backoff between polls when the source had nothing buffered.
const IDLE_BACKOFF: Duration = Duration::from_millis(5);

pub(crate) fn spawn(
    shared: Arc<Shared>,
    backend: Arc<dyn MediaBackend>,
    params: AudioEncodeParams,
    source: Box<dyn AudioSource>,
    shutdown: Receiver<()>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("framemux-audio".into())
        .spawn(move || {
            let mut stage = AudioStage {
                shared,
                backend,
                params,
                source,
                encoder: None,
                clock: MonotonicClock::new(),
            };
            stage.run(shutdown);
            stage.teardown();
        })
        .expect("failed to spawn audio stage thread")
}

struct AudioStage {
    shared: Arc<Shared>,
    backend: Arc<dyn MediaBackend>,
    params: AudioEncodeParams,
    source: Box<dyn AudioSource>,
    encoder: Option<Box<dyn Encoder>>,
    clock: MonotonicClock,
}

impl AudioStage {
    fn run(&mut self, shutdown: Receiver<()>) {
        let mut buf = vec![0u8; PCM_CHUNK];

        while self.shared.is_running() {
            let read = match self.source.read(&mut buf) {
                Ok(n) => n,
                Err(e) => {
                    tracing::warn!(error = %e, "audio source read failed");
                    0
                }
            };

            if read > 0 {
                if self.encoder.is_none() && !self.configure() {
                    // Fatal construction error: the stage never reaches
                    // encoding and its data is dropped from here on.
                    break;
                }
                let pts_us = self.clock.now_us();
                if let Some(encoder) = self.encoder.as_mut() {
                    match encoder.queue_input(&buf[..read], pts_us, INPUT_TIMEOUT) {
                        Ok(true) => {}
                        Ok(false) => {
                            tracing::trace!("no free input slot, audio chunk dropped");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "audio input enqueue failed");
                        }
                    }
                }
            }

            if let Some(encoder) = self.encoder.as_mut() {
                stage::drain(encoder.as_mut(), &self.shared, TrackKind::Audio);
            }

            if read == 0 {
                // Idle: back off briefly, waking early on shutdown.
                match shutdown.recv_timeout(IDLE_BACKOFF) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }
            } else {
                match shutdown.try_recv() {
                    Ok(()) | Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => {}
                }
            }
        }
    }

    fn configure(&mut self) -> bool {
        match self.backend.create_audio_encoder(&self.params) {
            Ok(encoder) => {
                tracing::info!(
                    sample_rate = self.params.sample_rate,
                    channels = self.params.channels,
                    "audio encoder configured"
                );
                self.shared.begin_encoding();
                self.encoder = Some(encoder);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to configure audio encoder");
                false
            }
        }
    }

    fn teardown(&mut self) {
        if let Err(e) = self.source.stop() {
            tracing::warn!(error = %e, "stopping audio source failed");
        }
        if let Some(encoder) = self.encoder.as_mut() {
            if let Err(e) = encoder.stop() {
                tracing::warn!(error = %e, "stopping audio encoder failed");
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
        tracing::debug!("audio stage finished");
    }
}
