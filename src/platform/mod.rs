//! Platform layer
//!
//! Headless frame host: calls `update` then `draw` once per frame on a fixed
//! logical canvas, either as fast as possible or paced to wall-clock time.
//! `Outputs` is the set of audio sinks a run plays into.

use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::Result;
use crate::audio::{AudioSink, Chord, FanOut, RecorderSink, RecordingSummary};
use crate::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, FRAME_RATE};
use crate::orchestrator::Orchestrator;
use crate::renderer::GraphicsCanvas;

/// Logical canvas size (width, height)
pub const CANVAS_SIZE: (u32, u32) = (CANVAS_WIDTH, CANVAS_HEIGHT);

/// Fixed timestep clock
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    frame_time: Duration,
    frames: u32,
}

impl FrameClock {
    pub fn new(frame_rate: u32) -> Self {
        Self {
            start: Instant::now(),
            frame_time: Duration::from_secs(1) / frame_rate.max(1),
            frames: 0,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    /// Sleep until the next frame is due. Late frames do not sleep.
    pub fn wait_next(&mut self) {
        self.frames = self.frames.saturating_add(1);
        let due = self.start + self.frame_time * self.frames;
        let now = Instant::now();
        if due > now {
            thread::sleep(due - now);
        }
    }
}

/// Totals reported after a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub bounces: u64,
}

/// Audio sinks for one run
///
/// Live sinks only take chords. The recorder is held apart so the host can
/// finish it and see whether the file was written.
#[derive(Default)]
pub struct Outputs {
    recorder: Option<RecorderSink>,
    live: FanOut,
}

impl Outputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_recorder(&mut self, recorder: RecorderSink) {
        self.recorder = Some(recorder);
    }

    pub fn push_live(&mut self, sink: Box<dyn AudioSink>) {
        self.live.push(sink);
    }

    /// A device is playing in real time
    pub fn has_live(&self) -> bool {
        !self.live.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.recorder.is_none() && self.live.is_empty()
    }

    /// Finish the recording, if any. Live sinks are closed on drop.
    pub fn finish(self) -> Result<Option<RecordingSummary>> {
        let Self { recorder, live } = self;
        drop(live);
        recorder.map(RecorderSink::finish).transpose()
    }
}

impl AudioSink for Outputs {
    fn play(&mut self, chord: Chord) {
        match &mut self.recorder {
            Some(recorder) if self.live.is_empty() => recorder.play(chord),
            Some(recorder) => {
                recorder.play(chord.clone());
                self.live.play(chord);
            }
            None => self.live.play(chord),
        }
    }

    fn frame_elapsed(&mut self) {
        if let Some(recorder) = &mut self.recorder {
            recorder.frame_elapsed();
        }
        self.live.frame_elapsed();
    }
}

/// Drives the orchestrator for a fixed number of frames
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    frames: u64,
    realtime: bool,
    frame_rate: u32,
    linger: Duration,
}

impl HeadlessHost {
    pub fn new(frames: u64) -> Self {
        Self {
            frames,
            realtime: false,
            frame_rate: FRAME_RATE,
            linger: Duration::ZERO,
        }
    }

    /// Pace frames to wall-clock time
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Keep running this long after the last realtime frame so sound can ring out
    pub fn linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }

    pub fn run<S, R, C>(&self, orchestrator: &mut Orchestrator<S, R>, canvas: &mut C) -> RunStats
    where
        S: AudioSink,
        R: Rng,
        C: GraphicsCanvas + ?Sized,
    {
        let mut clock = FrameClock::new(self.frame_rate);
        let mut stats = RunStats::default();

        for _ in 0..self.frames {
            if orchestrator.update().is_some() {
                stats.bounces += 1;
            }
            orchestrator.draw(canvas);
            stats.frames += 1;

            if self.realtime {
                clock.wait_next();
            }
        }

        if self.realtime && !self.linger.is_zero() {
            thread::sleep(self.linger);
        }

        log::info!("Ran {} frames, {} bounces", stats.frames, stats.bounces);
        stats
    }
}
