//! Bounce melody
//!
//! Each bounce picks the next note of a fixed phrase and harmonizes it with a
//! perfect fifth above and an octave below.

use std::time::Duration;

use super::chord::Chord;
use super::tone::Tone;
use crate::consts::{NOTE_DURATION_MS, NOTE_FADE_MS};
use crate::samples_for;

/// A melody table entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MelodyNote {
    pub frequency: f64,
    pub label: &'static str,
}

const fn note(frequency: f64, label: &'static str) -> MelodyNote {
    MelodyNote { frequency, label }
}

/// The phrase, walked cyclically by bounce index
pub const MELODY: [MelodyNote; 12] = [
    note(739.99, "F#5"),
    note(659.25, "E5"),
    note(587.33, "D5"),
    note(493.88, "B4"),
    note(587.33, "D5"),
    note(659.25, "E5"),
    note(739.99, "F#5"),
    note(880.00, "A5"),
    note(739.99, "F#5"),
    note(587.33, "D5"),
    note(493.88, "B4"),
    note(440.00, "A4"),
];

/// Interval ratios and levels of the three chord voices
pub const ROOT_AMPLITUDE: f32 = 0.35;
pub const FIFTH_RATIO: f64 = 1.5;
pub const FIFTH_AMPLITUDE: f32 = 0.15;
pub const SUB_OCTAVE_RATIO: f64 = 0.5;
pub const SUB_OCTAVE_AMPLITUDE: f32 = 0.10;

/// One voice of a chord description
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub frequency: f64,
    pub amplitude: f32,
}

/// What to play for one bounce, independent of the output rate
#[derive(Debug, Clone, PartialEq)]
pub struct ChordSpec {
    pub label: &'static str,
    /// Root, fifth, sub-octave
    pub voices: [Voice; 3],
    pub duration: Duration,
    pub fade: Duration,
}

impl ChordSpec {
    pub fn root(&self) -> f64 {
        self.voices[0].frequency
    }

    /// Build the playable chord at `sample_rate`
    pub fn synthesize(&self, sample_rate: u32) -> Chord {
        let total = samples_for(self.duration, sample_rate);
        let fade = samples_for(self.fade, sample_rate);
        Chord::new(
            self.voices
                .iter()
                .map(|v| Tone::new(v.frequency, v.amplitude, total, fade, sample_rate))
                .collect(),
        )
    }
}

/// Maps bounce indices onto the melody table
#[derive(Debug, Clone, Copy)]
pub struct NoteSequencer {
    table: &'static [MelodyNote],
}

impl Default for NoteSequencer {
    fn default() -> Self {
        Self { table: &MELODY }
    }
}

impl NoteSequencer {
    /// Use a custom phrase. An empty table has nothing to play.
    pub fn with_table(table: &'static [MelodyNote]) -> Option<Self> {
        if table.is_empty() {
            return None;
        }
        Some(Self { table })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Table entry for a bounce
    pub fn note_for(&self, bounce_index: u64) -> MelodyNote {
        self.table[(bounce_index % self.table.len() as u64) as usize]
    }

    /// Harmonized chord for a bounce
    pub fn chord_for(&self, bounce_index: u64) -> ChordSpec {
        let note = self.note_for(bounce_index);
        let root = note.frequency;
        ChordSpec {
            label: note.label,
            voices: [
                Voice {
                    frequency: root,
                    amplitude: ROOT_AMPLITUDE,
                },
                Voice {
                    frequency: root * FIFTH_RATIO,
                    amplitude: FIFTH_AMPLITUDE,
                },
                Voice {
                    frequency: root * SUB_OCTAVE_RATIO,
                    amplitude: SUB_OCTAVE_AMPLITUDE,
                },
            ],
            duration: Duration::from_millis(NOTE_DURATION_MS),
            fade: Duration::from_millis(NOTE_FADE_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_bounce_chord() {
        let spec = NoteSequencer::default().chord_for(0);
        assert_eq!(spec.label, "F#5");
        assert_eq!(
            spec.voices[0],
            Voice {
                frequency: 739.99,
                amplitude: 0.35
            }
        );
        assert!((spec.voices[1].frequency - 1109.985).abs() < 1e-9);
        assert_eq!(spec.voices[1].amplitude, 0.15);
        assert!((spec.voices[2].frequency - 369.995).abs() < 1e-9);
        assert_eq!(spec.voices[2].amplitude, 0.10);
        assert_eq!(spec.duration, Duration::from_millis(180));
        assert_eq!(spec.fade, Duration::from_millis(20));
    }

    #[test]
    fn test_wraps_around_phrase() {
        let seq = NoteSequencer::default();
        assert_eq!(seq.len(), 12);
        assert_eq!(seq.chord_for(11).label, "A4");
        assert_eq!(seq.chord_for(12), seq.chord_for(0));
        assert_eq!(seq.chord_for(7).root(), 880.0);
    }

    #[test]
    fn test_synthesize_sample_counts() {
        let chord = NoteSequencer::default().chord_for(3).synthesize(44_100);
        assert_eq!(chord.tones().len(), 3);
        for tone in chord.tones() {
            assert_eq!(tone.total_samples(), 7938);
            assert_eq!(tone.fade_samples(), 882);
        }
        assert_eq!(chord.tones()[0].frequency(), 493.88);
    }

    #[test]
    fn test_custom_table() {
        static TWO: [MelodyNote; 2] = [note(100.0, "a"), note(200.0, "b")];
        let seq = NoteSequencer::with_table(&TWO).unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.chord_for(3).root(), 200.0);
    }

    #[test]
    fn test_empty_table_rejected() {
        static NONE: [MelodyNote; 0] = [];
        assert!(NoteSequencer::with_table(&NONE).is_none());
    }

    proptest! {
        #[test]
        fn prop_chord_ratios_exact(index in any::<u64>()) {
            let seq = NoteSequencer::default();
            let spec = seq.chord_for(index);
            let root = spec.root();
            prop_assert_eq!(spec.voices[1].frequency, root * 1.5);
            prop_assert_eq!(spec.voices[2].frequency, root * 0.5);
            prop_assert_eq!(root, MELODY[(index % 12) as usize].frequency);
        }
    }
}
