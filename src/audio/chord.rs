//! Additive chord mixing
//!
//! A chord lasts as long as its longest voice. Voices that finish early keep
//! contributing silence until the last one is done.

use super::tone::{Frame, StereoStream, Tone};

/// Several tones created together and played as one stream
#[derive(Debug, Clone)]
pub struct Chord {
    tones: Vec<Tone>,
    scratch: Vec<Frame>,
}

impl Chord {
    pub fn new(tones: Vec<Tone>) -> Self {
        Self {
            tones,
            scratch: Vec::new(),
        }
    }

    pub fn tones(&self) -> &[Tone] {
        &self.tones
    }

    /// Frames left until the longest voice ends
    pub fn remaining_frames(&self) -> usize {
        self.tones.iter().map(Tone::remaining).max().unwrap_or(0)
    }

    pub fn is_finished(&self) -> bool {
        self.tones.iter().all(Tone::is_finished)
    }
}

impl StereoStream for Chord {
    fn stream(&mut self, out: &mut [Frame]) -> (usize, bool) {
        if self.scratch.len() < out.len() {
            self.scratch.resize(out.len(), [0.0; 2]);
        }
        out.fill([0.0; 2]);

        let mut produced = 0;
        let mut more = false;
        let voice = &mut self.scratch[..out.len()];

        for tone in self.tones.iter_mut() {
            let (n, tone_more) = tone.stream(voice);
            for (dst, src) in out.iter_mut().zip(&voice[..n]) {
                dst[0] += src[0];
                dst[1] += src[1];
            }
            produced = produced.max(n);
            more |= tone_more;
        }

        (produced, more)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(total: usize, amp: f32) -> Tone {
        Tone::new(440.0, amp, total, 0, 44_100)
    }

    #[test]
    fn test_mix_is_sum_of_voices() {
        let mut a = tone(100, 0.35);
        let mut b = Tone::new(660.0, 0.15, 100, 0, 44_100);
        let mut chord = Chord::new(vec![tone(100, 0.35), Tone::new(660.0, 0.15, 100, 0, 44_100)]);

        let mut buf_a = vec![[0.0f32; 2]; 100];
        let mut buf_b = vec![[0.0f32; 2]; 100];
        let mut mixed = vec![[0.0f32; 2]; 100];
        a.stream(&mut buf_a);
        b.stream(&mut buf_b);
        let (n, more) = chord.stream(&mut mixed);

        assert_eq!(n, 100);
        assert!(!more);
        for i in 0..100 {
            assert!((mixed[i][0] - (buf_a[i][0] + buf_b[i][0])).abs() < 1e-6);
            assert_eq!(mixed[i][0], mixed[i][1]);
        }
    }

    #[test]
    fn test_longest_voice_sets_length() {
        let mut chord = Chord::new(vec![tone(10, 0.5), tone(25, 0.5)]);
        let mut buf = vec![[0.0f32; 2]; 16];

        assert_eq!(chord.stream(&mut buf), (16, true));
        // Short voice ended after 10 frames but the long one still plays
        assert_eq!(chord.stream(&mut buf), (9, false));
        assert!(chord.is_finished());
        assert_eq!(chord.stream(&mut buf), (0, false));
    }

    #[test]
    fn test_finished_voice_contributes_silence() {
        let mut chord = Chord::new(vec![tone(4, 1.0), tone(8, 0.0)]);
        let mut buf = vec![[0.0f32; 2]; 8];
        let (n, _) = chord.stream(&mut buf);
        assert_eq!(n, 8);
        // Second voice has zero amplitude, so the tail is silent
        assert!(buf[4..].iter().all(|f| *f == [0.0, 0.0]));
    }

    #[test]
    fn test_remaining_frames() {
        let mut chord = Chord::new(vec![tone(30, 0.5), tone(50, 0.5)]);
        assert_eq!(chord.remaining_frames(), 50);
        let mut buf = vec![[0.0f32; 2]; 20];
        chord.stream(&mut buf);
        assert_eq!(chord.remaining_frames(), 30);
    }

    #[test]
    fn test_empty_chord() {
        let mut chord = Chord::new(Vec::new());
        let mut buf = vec![[1.0f32; 2]; 4];
        assert_eq!(chord.stream(&mut buf), (0, false));
        assert!(chord.is_finished());
    }
}
