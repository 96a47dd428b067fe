//! Enveloped sine voice
//!
//! A `Tone` plays exactly `total_samples` frames and then stays finished.
//! The same mono value is written to both channels.

use std::f64::consts::TAU;

/// One stereo sample frame (left, right)
pub type Frame = [f32; 2];

/// A pull-based stereo source
///
/// `stream` fills the front of `out` and returns how many frames were written
/// and whether more remain after them. Once a stream reports no more frames
/// it keeps returning `(0, false)`.
pub trait StereoStream {
    fn stream(&mut self, out: &mut [Frame]) -> (usize, bool);
}

/// Linear fade-in over the first `fade` samples, fade-out over the last `fade`
///
/// Evaluated at absolute sample position `pos` of a `total`-sample voice.
/// When the two ramps overlap the lower one wins.
#[inline]
pub fn envelope(pos: usize, total: usize, fade: usize) -> f32 {
    if pos >= total {
        return 0.0;
    }
    if fade == 0 {
        return 1.0;
    }
    let fade_in = pos as f32 / fade as f32;
    let fade_out = (total - pos) as f32 / fade as f32;
    fade_in.min(fade_out).min(1.0)
}

/// A single enveloped sine voice
#[derive(Debug, Clone)]
pub struct Tone {
    frequency: f64,
    amplitude: f32,
    sample_rate: u32,
    total_samples: usize,
    fade_samples: usize,
    /// Phase in cycles, grows without wrapping
    phase: f64,
    position: usize,
}

impl Tone {
    pub fn new(
        frequency: f64,
        amplitude: f32,
        total_samples: usize,
        fade_samples: usize,
        sample_rate: u32,
    ) -> Self {
        Self {
            frequency,
            amplitude,
            sample_rate,
            total_samples,
            fade_samples,
            phase: 0.0,
            position: 0,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn total_samples(&self) -> usize {
        self.total_samples
    }

    pub fn fade_samples(&self) -> usize {
        self.fade_samples
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.total_samples.saturating_sub(self.position)
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.total_samples
    }
}

impl StereoStream for Tone {
    fn stream(&mut self, out: &mut [Frame]) -> (usize, bool) {
        let count = out.len().min(self.remaining());
        let step = self.frequency / self.sample_rate as f64;

        for frame in out[..count].iter_mut() {
            let env = envelope(self.position, self.total_samples, self.fade_samples);
            let value = (TAU * self.phase).sin() as f32 * env * self.amplitude;
            *frame = [value, value];

            self.phase += step;
            self.position += 1;
        }

        (count, !self.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let (total, fade) = (4410, 441);
        assert_eq!(envelope(0, total, fade), 0.0);
        assert!((envelope(fade, total, fade) - 1.0).abs() < 1e-6);
        assert!((envelope(total / 2, total, fade) - 1.0).abs() < 1e-6);
        assert!((envelope(total - fade, total, fade) - 1.0).abs() < 1e-6);
        assert_eq!(envelope(total, total, fade), 0.0);
        assert!((envelope(fade / 2, total, fade) - 220.0 / 441.0).abs() < 1e-6);
    }

    #[test]
    fn test_envelope_degenerate() {
        assert_eq!(envelope(0, 100, 0), 1.0);
        assert_eq!(envelope(100, 100, 0), 0.0);
        // Overlapping ramps peak in the middle below 1.0
        assert!((envelope(5, 10, 20) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_single_batch_scenario() {
        let mut tone = Tone::new(440.0, 1.0, 4410, 441, 44_100);
        let mut buf = vec![[0.0f32; 2]; 4410];

        let (n, more) = tone.stream(&mut buf);
        assert_eq!(n, 4410);
        assert!(!more);
        assert!(buf[0][0].abs() < 1e-6);
        assert!(buf[4409][0].abs() < 1e-2);
        // Mono duplicated to both channels
        assert!(buf.iter().all(|f| f[0] == f[1]));
        // Full-amplitude middle section reaches the peak
        let peak = buf.iter().map(|f| f[0].abs()).fold(0.0f32, f32::max);
        assert!(peak > 0.99 && peak <= 1.0);
    }

    #[test]
    fn test_cumulative_frames_then_exhausted() {
        let mut tone = Tone::new(659.25, 0.35, 1000, 50, 44_100);
        let mut buf = vec![[0.0f32; 2]; 64];
        let mut total = 0;
        loop {
            let (n, more) = tone.stream(&mut buf);
            total += n;
            if !more {
                break;
            }
            assert_eq!(n, 64);
        }
        assert_eq!(total, 1000);

        // Never restarts
        for _ in 0..3 {
            assert_eq!(tone.stream(&mut buf), (0, false));
        }
    }

    #[test]
    fn test_untouched_past_count() {
        let mut tone = Tone::new(440.0, 1.0, 3, 0, 44_100);
        let mut buf = vec![[9.0f32; 2]; 5];
        assert_eq!(tone.stream(&mut buf), (3, false));
        assert_eq!(buf[3], [9.0, 9.0]);
        assert_eq!(buf[4], [9.0, 9.0]);
    }

    #[test]
    fn test_zero_length_tone() {
        let mut tone = Tone::new(440.0, 1.0, 0, 10, 44_100);
        let mut buf = vec![[0.0f32; 2]; 8];
        assert_eq!(tone.stream(&mut buf), (0, false));
    }
}
