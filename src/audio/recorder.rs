//! Offline playback device writing a WAV file
//!
//! The recorder runs as an actor on its own thread. The simulation sends it
//! chords and frame ticks over a channel and never waits on it. At the end
//! the chords still ringing are played out before the file is finalized.

use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use hound::{SampleFormat, WavSpec, WavWriter};

use super::chord::Chord;
use super::output::AudioSink;
use super::tone::{Frame, StereoStream};
use crate::consts::{FRAME_RATE, SAMPLE_RATE, STREAM_BLOCK_FRAMES};
use crate::settings::AudioSettings;
use crate::{Error, Result};

/// Software mixer for overlapping chords
#[derive(Debug)]
pub struct Mixdown {
    chords: Vec<Chord>,
    scratch: Vec<Frame>,
    gain: f32,
}

impl Default for Mixdown {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Mixdown {
    pub fn new(gain: f32) -> Self {
        Self {
            chords: Vec::new(),
            scratch: Vec::new(),
            gain,
        }
    }

    pub fn add(&mut self, chord: Chord) {
        self.chords.push(chord);
    }

    /// Chords still producing frames
    pub fn active(&self) -> usize {
        self.chords.len()
    }

    /// Frames until every active chord has ended
    pub fn remaining_frames(&self) -> usize {
        self.chords.iter().map(Chord::remaining_frames).max().unwrap_or(0)
    }

    /// Fill `out` with the sum of all active chords, then drop finished ones
    pub fn render(&mut self, out: &mut [Frame]) {
        out.fill([0.0; 2]);
        if self.scratch.len() < out.len() {
            self.scratch.resize(out.len(), [0.0; 2]);
        }
        let buf = &mut self.scratch[..out.len()];

        for chord in self.chords.iter_mut() {
            let (n, _) = chord.stream(buf);
            for (dst, src) in out.iter_mut().zip(&buf[..n]) {
                dst[0] += src[0] * self.gain;
                dst[1] += src[1] * self.gain;
            }
        }
        self.chords.retain(|c| !c.is_finished());
    }
}

/// Messages for the recorder actor
#[derive(Debug)]
pub enum RecorderCommand {
    /// Start mixing a chord at the current position
    Play(Chord),
    /// Write this many frames
    Advance(usize),
    /// Play out ringing chords and finalize the file
    Finish,
}

/// What ended up in the file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordingSummary {
    pub frames_written: u64,
    pub chords_played: u64,
}

/// Sink that records the performance, timed to simulation frames
pub struct RecorderSink {
    tx: Sender<RecorderCommand>,
    handle: Option<JoinHandle<Result<RecordingSummary>>>,
    frames_per_tick: usize,
    muted: bool,
}

impl RecorderSink {
    /// Record to a 16-bit stereo WAV file
    pub fn create(path: impl AsRef<Path>, audio: &AudioSettings) -> Result<Self> {
        let spec = WavSpec {
            channels: 2,
            sample_rate: SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer: WavWriter<BufWriter<File>> = WavWriter::create(path.as_ref(), spec)?;
        log::info!("Recording to {}", path.as_ref().display());
        Self::spawn(writer, audio)
    }

    /// Start the actor around an open writer
    pub fn spawn<W>(writer: WavWriter<W>, audio: &AudioSettings) -> Result<Self>
    where
        W: Write + Seek + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let gain = audio.effective_volume();
        let handle = thread::Builder::new()
            .name("recorder".into())
            .spawn(move || run(rx, writer, gain))?;

        Ok(Self {
            tx,
            handle: Some(handle),
            frames_per_tick: (SAMPLE_RATE / FRAME_RATE) as usize,
            muted: gain <= 0.0,
        })
    }

    fn send(&self, command: RecorderCommand) {
        if self.tx.send(command).is_err() {
            log::warn!("Recorder is gone, dropping audio");
        }
    }

    /// Play out ringing chords, finalize the file and report
    pub fn finish(mut self) -> Result<RecordingSummary> {
        self.stop()
    }

    fn stop(&mut self) -> Result<RecordingSummary> {
        let Some(handle) = self.handle.take() else {
            return Err(Error::RecorderStopped);
        };
        self.send(RecorderCommand::Finish);
        handle.join().map_err(|_| Error::RecorderStopped)?
    }
}

impl AudioSink for RecorderSink {
    fn play(&mut self, chord: Chord) {
        if self.muted {
            return;
        }
        self.send(RecorderCommand::Play(chord));
    }

    fn frame_elapsed(&mut self) {
        self.send(RecorderCommand::Advance(self.frames_per_tick));
    }
}

impl Drop for RecorderSink {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.stop() {
                log::error!("Recording not finalized: {}", e);
            }
        }
    }
}

fn run<W: Write + Seek>(
    rx: Receiver<RecorderCommand>,
    mut writer: WavWriter<W>,
    gain: f32,
) -> Result<RecordingSummary> {
    let mut mix = Mixdown::new(gain);
    let mut block = vec![[0.0f32; 2]; STREAM_BLOCK_FRAMES];
    let mut summary = RecordingSummary::default();

    for command in rx {
        match command {
            RecorderCommand::Play(chord) => {
                mix.add(chord);
                summary.chords_played += 1;
            }
            RecorderCommand::Advance(mut frames) => {
                while frames > 0 {
                    let n = frames.min(block.len());
                    mix.render(&mut block[..n]);
                    write_frames(&mut writer, &block[..n])?;
                    summary.frames_written += n as u64;
                    frames -= n;
                }
            }
            RecorderCommand::Finish => break,
        }
    }

    // Tail: let the last chords ring out
    while mix.active() > 0 {
        let n = mix.remaining_frames().min(block.len());
        mix.render(&mut block[..n]);
        write_frames(&mut writer, &block[..n])?;
        summary.frames_written += n as u64;
    }

    writer.finalize()?;
    log::info!(
        "Recording finished: {} frames, {} chords",
        summary.frames_written,
        summary.chords_played
    );
    Ok(summary)
}

fn write_frames<W: Write + Seek>(writer: &mut WavWriter<W>, frames: &[Frame]) -> Result<()> {
    for frame in frames {
        for &sample in frame {
            let sample_i16 = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer.write_sample(sample_i16)?;
        }
    }
    Ok(())
}
