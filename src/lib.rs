//! Echo Sphere - a ball bouncing inside a circle, scored by its own collisions
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, impact trail and ripples)
//! - `audio`: Enveloped sine voices, chord mixing, melody lookup and output sinks
//! - `renderer`: Canvas abstraction and the per-frame draw step
//! - `orchestrator`: Glues physics, melody, audio handoff and trail together per frame
//! - `platform`: Headless frame host
//! - `settings`: Data-driven simulation and audio configuration

pub mod audio;
pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use orchestrator::Orchestrator;
pub use settings::{AudioSettings, Settings, SimConfig};

use std::time::Duration;

/// Simulation and audio constants
pub mod consts {
    /// Output sample rate, fixed for the process lifetime
    pub const SAMPLE_RATE: u32 = 44_100;
    /// Frames pulled from a stream per production cycle
    pub const STREAM_BLOCK_FRAMES: usize = 512;

    /// Logical canvas size
    pub const CANVAS_WIDTH: u32 = 800;
    pub const CANVAS_HEIGHT: u32 = 600;
    /// Host frame rate (one physics tick per frame)
    pub const FRAME_RATE: u32 = 60;

    /// Boundary circle, centred on the canvas
    pub const BOUNDARY_RADIUS: f32 = 200.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_START_VELOCITY: (f32, f32) = (0.0, 5.0);

    /// Ripple lifecycle (per tick)
    pub const RIPPLE_START_RADIUS: f32 = 5.0;
    pub const RIPPLE_GROWTH: f32 = 1.5;
    pub const RIPPLE_DECAY: f32 = 0.02;
    /// Degrees between the hues of consecutive bounces
    pub const HUE_STEP: u32 = 37;

    /// Bounce chord timing (milliseconds)
    pub const NOTE_DURATION_MS: u64 = 180;
    pub const NOTE_FADE_MS: u64 = 20;
}

/// Number of whole samples covering `duration` at `sample_rate`
#[inline]
pub fn samples_for(duration: Duration, sample_rate: u32) -> usize {
    (duration.as_nanos() * sample_rate as u128 / 1_000_000_000) as usize
}

/// Ripple hue in degrees [0, 360) for a bounce index
#[inline]
pub fn hue_for_bounce(index: u64, hue_step: u32) -> f32 {
    ((index % 360) * (hue_step as u64 % 360) % 360) as f32
}
