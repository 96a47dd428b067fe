//! Bounce sounds
//!
//! Procedurally generated chords - no sample files needed.
//! - `tone`: one enveloped sine voice
//! - `chord`: additive mix of voices
//! - `melody`: bounce index to harmonized chord
//! - `output`: fire-and-forget handoff to a sink
//! - `recorder`: WAV recording actor

pub mod chord;
pub mod melody;
pub mod output;
pub mod recorder;
pub mod tone;

pub use chord::Chord;
pub use melody::{ChordSpec, MELODY, MelodyNote, NoteSequencer, Voice};
pub use output::{AudioSink, ChannelSink, ChordSource, FanOut, NullSink};
pub use recorder::{Mixdown, RecorderSink, RecordingSummary};
pub use tone::{Frame, StereoStream, Tone, envelope};

#[cfg(feature = "playback")]
pub use output::SpeakerSink;
