//! Chord handoff to audio output
//!
//! `play` is fire-and-forget: the sink takes ownership of the chord and the
//! simulation never sees it again. Sinks never report errors back into the
//! tick loop. A sink that cannot play drops the chord.

use std::sync::mpsc::{self, Receiver, Sender};

use super::chord::Chord;
use super::tone::{Frame, StereoStream};
use crate::consts::STREAM_BLOCK_FRAMES;

/// Consumer of bounce chords
pub trait AudioSink {
    /// Take ownership of a chord and start playing it without blocking
    fn play(&mut self, chord: Chord);

    /// Called once per simulation frame. Real-time devices ignore it.
    fn frame_elapsed(&mut self) {}
}

impl<S: AudioSink + ?Sized> AudioSink for Box<S> {
    fn play(&mut self, chord: Chord) {
        (**self).play(chord);
    }

    fn frame_elapsed(&mut self) {
        (**self).frame_elapsed();
    }
}

/// Discards every chord
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _chord: Chord) {}
}

/// Forwards chords over a channel to whoever owns the receiver
#[derive(Debug)]
pub struct ChannelSink {
    tx: Sender<Chord>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<Chord>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }
}

impl AudioSink for ChannelSink {
    fn play(&mut self, chord: Chord) {
        // Receiver gone means nobody is listening; drop the chord
        let _ = self.tx.send(chord);
    }
}

/// Hands a copy of every chord to each inner sink
#[derive(Default)]
pub struct FanOut {
    sinks: Vec<Box<dyn AudioSink>>,
}

impl FanOut {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Box<dyn AudioSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl AudioSink for FanOut {
    fn play(&mut self, chord: Chord) {
        let Some((last, rest)) = self.sinks.split_last_mut() else {
            return;
        };
        for sink in rest {
            sink.play(chord.clone());
        }
        last.play(chord);
    }

    fn frame_elapsed(&mut self) {
        for sink in self.sinks.iter_mut() {
            sink.frame_elapsed();
        }
    }
}

/// Interleaved sample iterator over a stereo stream, pulled in blocks
pub struct ChordSource<S> {
    stream: S,
    sample_rate: u32,
    block: Vec<Frame>,
    /// Frames valid in `block`
    len: usize,
    /// Next interleaved sample within `block`
    pos: usize,
    exhausted: bool,
}

impl<S: StereoStream> ChordSource<S> {
    pub fn new(stream: S, sample_rate: u32) -> Self {
        Self {
            stream,
            sample_rate,
            block: vec![[0.0; 2]; STREAM_BLOCK_FRAMES],
            len: 0,
            pos: 0,
            exhausted: false,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl<S: StereoStream> Iterator for ChordSource<S> {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.pos >= self.len * 2 {
            if self.exhausted {
                return None;
            }
            let (n, more) = self.stream.stream(&mut self.block);
            self.len = n;
            self.pos = 0;
            self.exhausted = !more;
            if n == 0 {
                return None;
            }
        }
        let sample = self.block[self.pos / 2][self.pos % 2];
        self.pos += 1;
        Some(sample)
    }
}

#[cfg(feature = "playback")]
mod speaker {
    use std::time::Duration;

    use rodio::{OutputStream, OutputStreamHandle, Source};

    use super::{AudioSink, ChordSource, StereoStream};
    use crate::audio::chord::Chord;
    use crate::consts::SAMPLE_RATE;
    use crate::settings::AudioSettings;
    use crate::{Error, Result};

    impl<S: StereoStream> Source for ChordSource<S> {
        fn current_frame_len(&self) -> Option<usize> {
            None
        }

        fn channels(&self) -> u16 {
            2
        }

        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn total_duration(&self) -> Option<Duration> {
            None
        }
    }

    /// Live playback on the default output device
    ///
    /// rodio mixes every chord on its own device thread, so overlapping
    /// chords play concurrently and `play` returns immediately.
    pub struct SpeakerSink {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        volume: f32,
    }

    impl SpeakerSink {
        pub fn open(audio: &AudioSettings) -> Result<Self> {
            let (stream, handle) =
                OutputStream::try_default().map_err(|e| Error::AudioDevice(e.to_string()))?;
            log::info!("Audio output opened at {} Hz", SAMPLE_RATE);
            Ok(Self {
                _stream: stream,
                handle,
                volume: audio.effective_volume(),
            })
        }
    }

    impl AudioSink for SpeakerSink {
        fn play(&mut self, chord: Chord) {
            if self.volume <= 0.0 {
                return;
            }
            let source = ChordSource::new(chord, SAMPLE_RATE).amplify(self.volume);
            if let Err(e) = self.handle.play_raw(source) {
                log::debug!("Dropped chord: {}", e);
            }
        }
    }
}

#[cfg(feature = "playback")]
pub use speaker::SpeakerSink;
