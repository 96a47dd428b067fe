//! Command-line argument parsing.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "echo-sphere")]
#[command(about = "A ball bouncing inside a circle, one chord per bounce", long_about = None)]
pub struct Args {
    /// Number of frames to simulate
    #[arg(long, value_name = "FRAMES", default_value = "3600")]
    pub frames: u64,

    /// RNG seed for the first bounce direction (defaults to the clock)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Pace frames to wall-clock time at 60 fps (implied by --speaker)
    #[arg(long)]
    pub realtime: bool,

    /// JSON settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Record the audio to a WAV file
    #[arg(long, value_name = "PATH")]
    pub wav: Option<PathBuf>,

    /// Save the last frame as PNG
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Silence all audio output
    #[arg(long)]
    pub mute: bool,

    /// Play chords on the default output device
    #[arg(long)]
    pub speaker: bool,
}

impl Args {
    /// Live playback has to follow the clock, or every chord fires at once
    pub fn paced(&self) -> bool {
        self.realtime || self.speaker
    }

    /// Seed from the command line, or from the system clock
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["echo-sphere"]);
        assert_eq!(args.frames, 3600);
        assert!(args.seed.is_none());
        assert!(!args.realtime && !args.mute && !args.speaker);
        assert!(args.wav.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "echo-sphere",
            "--frames",
            "120",
            "--seed",
            "42",
            "--wav",
            "out.wav",
            "--snapshot",
            "frame.png",
            "--mute",
        ]);
        assert_eq!(args.frames, 120);
        assert_eq!(args.resolve_seed(), 42);
        assert_eq!(args.wav, Some(PathBuf::from("out.wav")));
        assert_eq!(args.snapshot, Some(PathBuf::from("frame.png")));
        assert!(args.mute);
        assert!(!args.paced());
    }

    #[test]
    fn test_speaker_implies_pacing() {
        let args = Args::parse_from(["echo-sphere", "--speaker"]);
        assert!(!args.realtime);
        assert!(args.paced());

        let args = Args::parse_from(["echo-sphere", "--realtime"]);
        assert!(args.paced());
    }
}
