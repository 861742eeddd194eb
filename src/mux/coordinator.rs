//! Mux coordinator
//!
//! Wraps the single container writer shared by the encode stages. Gates
//! writer startup until every expected track has registered, serializes
//! sample writes from the independent stage threads, and closes the writer
//! once the last stage has finished.

use super::writer::ContainerWriter;
use crate::codec::format::{SampleInfo, TrackFormat, TrackKind};
use crate::error::{RecordingError, RecordingResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

struct Inner {
    writer: Option<Box<dyn ContainerWriter>>,
    video_track: Option<usize>,
    audio_track: Option<usize>,
    expected_tracks: usize,
    registered: usize,
    expected_stages: usize,
    finished_stages: usize,
}

/// Shared gate between the video and audio encode stages
///
/// The writer, track indices, and registration counts live behind one
/// mutex; either stage may be the one whose registration completes the
/// track set and starts the writer, and either may be the last to finish
/// and close it.
pub struct MuxCoordinator {
    inner: Mutex<Inner>,
    // Fast-path flag so stages can skip writes before startup without
    // taking the lock.
    started: AtomicBool,
}

impl MuxCoordinator {
    /// Wrap `writer` for the given track layout.
    ///
    /// With audio disabled only the video track gates startup and only the
    /// video stage participates in teardown.
    pub fn new(writer: Box<dyn ContainerWriter>, audio_enabled: bool) -> Self {
        let expected = if audio_enabled { 2 } else { 1 };
        Self {
            inner: Mutex::new(Inner {
                writer: Some(writer),
                video_track: None,
                audio_track: None,
                expected_tracks: expected,
                registered: 0,
                expected_stages: expected,
                finished_stages: 0,
            }),
            started: AtomicBool::new(false),
        }
    }

    /// Whether the writer has been started.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Register one stream's negotiated output format.
    ///
    /// The registration that completes the expected track set starts the
    /// writer; the mutex guarantees exactly one caller observes that
    /// transition.
    pub fn register_track(&self, format: &TrackFormat) -> RecordingResult<()> {
        let kind = format.kind();
        let mut inner = self.inner.lock();

        let writer = inner
            .writer
            .as_mut()
            .ok_or_else(|| RecordingError::Muxer("writer already closed".into()))?;
        let index = writer.add_track(format)?;

        let slot = match kind {
            TrackKind::Video => &mut inner.video_track,
            TrackKind::Audio => &mut inner.audio_track,
        };
        if slot.is_some() {
            return Err(RecordingError::Muxer(format!(
                "{kind} track registered twice"
            )));
        }
        *slot = Some(index);
        inner.registered += 1;
        tracing::info!(%kind, index, "registered track");

        if inner.registered == inner.expected_tracks && !self.started.load(Ordering::Relaxed) {
            inner
                .writer
                .as_mut()
                .ok_or_else(|| RecordingError::Muxer("writer already closed".into()))?
                .start()?;
            self.started.store(true, Ordering::Release);
            tracing::info!("container writer started");
        }

        Ok(())
    }

    /// Write one access unit to the track of the given kind.
    ///
    /// Returns `Ok(false)` when the sample was dropped because the writer
    /// has not started yet (or is already closed); no sample is ever handed
    /// to the writer before `start`.
    pub fn write_sample(
        &self,
        kind: TrackKind,
        data: &[u8],
        info: &SampleInfo,
    ) -> RecordingResult<bool> {
        if !self.started.load(Ordering::Acquire) {
            tracing::trace!(%kind, "dropping sample before writer start");
            return Ok(false);
        }

        let mut inner = self.inner.lock();
        let index = match kind {
            TrackKind::Video => inner.video_track,
            TrackKind::Audio => inner.audio_track,
        }
        .ok_or_else(|| RecordingError::Muxer(format!("no {kind} track registered")))?;

        match inner.writer.as_mut() {
            Some(writer) => {
                writer.write_sample(index, data, info)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Record that one encode stage has fully torn down.
    ///
    /// The call from the last expected stage finalizes and drops the
    /// writer; returns whether this call was the one that closed it. A
    /// writer that never started is dropped without finalizing.
    pub fn stage_finished(&self) -> RecordingResult<bool> {
        let mut inner = self.inner.lock();
        inner.finished_stages += 1;
        if inner.finished_stages < inner.expected_stages {
            return Ok(false);
        }

        match inner.writer.take() {
            Some(mut writer) => {
                if self.started.load(Ordering::Acquire) {
                    writer.finish()?;
                    tracing::info!("container writer finalized");
                } else {
                    tracing::info!("discarding writer: no track ever started");
                }
                Ok(true)
            }
            // Already closed by an earlier countdown; tolerate the extra call.
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::format::{AUDIO_MIME, VIDEO_MIME};
    use parking_lot::Mutex as TestMutex;
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct Calls {
        tracks: Vec<TrackKind>,
        starts: usize,
        writes: Vec<(usize, usize)>,
        finished: bool,
    }

    struct FakeWriter(Arc<TestMutex<Calls>>);

    impl ContainerWriter for FakeWriter {
        fn add_track(&mut self, format: &TrackFormat) -> RecordingResult<usize> {
            let mut calls = self.0.lock();
            calls.tracks.push(format.kind());
            Ok(calls.tracks.len() - 1)
        }

        fn start(&mut self) -> RecordingResult<()> {
            self.0.lock().starts += 1;
            Ok(())
        }

        fn write_sample(
            &mut self,
            track: usize,
            data: &[u8],
            _info: &SampleInfo,
        ) -> RecordingResult<()> {
            let mut calls = self.0.lock();
            assert!(calls.starts > 0, "write before start");
            calls.writes.push((track, data.len()));
            Ok(())
        }

        fn finish(&mut self) -> RecordingResult<()> {
            self.0.lock().finished = true;
            Ok(())
        }
    }

    fn video_format() -> TrackFormat {
        TrackFormat::Video {
            mime: VIDEO_MIME.into(),
            width: 640,
            height: 480,
            frame_rate: 30,
            codec_config: vec![0, 1],
        }
    }

    fn audio_format() -> TrackFormat {
        TrackFormat::Audio {
            mime: AUDIO_MIME.into(),
            sample_rate: 16_000,
            channels: 1,
            codec_config: vec![2],
        }
    }

    #[test]
    fn video_only_starts_on_single_registration() {
        let calls = Arc::new(TestMutex::new(Calls::default()));
        let mux = MuxCoordinator::new(Box::new(FakeWriter(calls.clone())), false);

        assert!(!mux.is_started());
        mux.register_track(&video_format()).unwrap();
        assert!(mux.is_started());
        assert_eq!(calls.lock().starts, 1);
    }

    #[test]
    fn dual_track_gates_until_both_registered() {
        let calls = Arc::new(TestMutex::new(Calls::default()));
        let mux = MuxCoordinator::new(Box::new(FakeWriter(calls.clone())), true);

        mux.register_track(&audio_format()).unwrap();
        assert!(!mux.is_started());
        mux.register_track(&video_format()).unwrap();
        assert!(mux.is_started());
        assert_eq!(calls.lock().starts, 1);
    }

    #[test]
    fn samples_dropped_until_started() {
        let calls = Arc::new(TestMutex::new(Calls::default()));
        let mux = MuxCoordinator::new(Box::new(FakeWriter(calls.clone())), true);
        let info = SampleInfo::default();

        assert!(!mux.write_sample(TrackKind::Video, &[1, 2, 3], &info).unwrap());

        mux.register_track(&video_format()).unwrap();
        assert!(!mux.write_sample(TrackKind::Video, &[1, 2, 3], &info).unwrap());

        mux.register_track(&audio_format()).unwrap();
        assert!(mux.write_sample(TrackKind::Video, &[1, 2, 3], &info).unwrap());
        assert_eq!(calls.lock().writes.len(), 1);
    }

    #[test]
    fn duplicate_registration_rejected() {
        let calls = Arc::new(TestMutex::new(Calls::default()));
        let mux = MuxCoordinator::new(Box::new(FakeWriter(calls)), true);

        mux.register_track(&video_format()).unwrap();
        assert!(mux.register_track(&video_format()).is_err());
    }

    #[test]
    fn last_stage_closes_writer() {
        let calls = Arc::new(TestMutex::new(Calls::default()));
        let mux = MuxCoordinator::new(Box::new(FakeWriter(calls.clone())), true);

        mux.register_track(&video_format()).unwrap();
        mux.register_track(&audio_format()).unwrap();

        assert!(!mux.stage_finished().unwrap());
        assert!(!calls.lock().finished);
        assert!(mux.stage_finished().unwrap());
        assert!(calls.lock().finished);
    }

    #[test]
    fn unstarted_writer_discarded_without_finalize() {
        let calls = Arc::new(TestMutex::new(Calls::default()));
        let mux = MuxCoordinator::new(Box::new(FakeWriter(calls.clone())), false);

        assert!(mux.stage_finished().unwrap());
        assert!(!calls.lock().finished);
    }
}
