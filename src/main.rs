//! Echo Sphere entry point
//!
//! Loads settings, picks the audio sinks and runs the headless frame loop.

mod cli;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use echo_sphere::audio::RecorderSink;
use echo_sphere::consts::NOTE_DURATION_MS;
use echo_sphere::platform::{CANVAS_SIZE, HeadlessHost, Outputs};
use echo_sphere::renderer::{DrawList, PixelCanvas};
use echo_sphere::{Orchestrator, Settings};

use cli::Args;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Echo Sphere starting...");

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if args.mute {
        settings.audio.muted = true;
    }

    let outputs = build_outputs(&args, &settings)?;
    // The last chord needs its full length on a live device
    let linger = if outputs.has_live() {
        Duration::from_millis(NOTE_DURATION_MS)
    } else {
        Duration::ZERO
    };

    let seed = args.resolve_seed();
    log::info!("Seed: {}", seed);

    let mut orchestrator = Orchestrator::with_seed(&settings.simulation, seed, outputs);
    let mut frame = DrawList::new();
    let stats = HeadlessHost::new(args.frames)
        .realtime(args.paced())
        .linger(linger)
        .run(&mut orchestrator, &mut frame);

    if let Some(path) = &args.snapshot {
        let (width, height) = CANVAS_SIZE;
        let mut canvas = PixelCanvas::new(width, height);
        frame.replay(&mut canvas);
        canvas
            .save_png(path)
            .with_context(|| format!("Failed to save snapshot to {}", path.display()))?;
    }

    let recording = orchestrator
        .into_sink()
        .finish()
        .context("Failed to finalize WAV recording")?;
    if let Some(summary) = recording {
        println!(
            "Recorded {} frames, {} chords",
            summary.frames_written, summary.chords_played
        );
    }
    println!("{} frames, {} bounces", stats.frames, stats.bounces);
    Ok(())
}

fn build_outputs(args: &Args, settings: &Settings) -> anyhow::Result<Outputs> {
    let mut outputs = Outputs::new();

    if let Some(path) = &args.wav {
        let recorder = RecorderSink::create(path, &settings.audio)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        outputs.set_recorder(recorder);
    }

    if args.speaker {
        push_speaker(&mut outputs, settings);
    }

    if outputs.is_empty() {
        log::info!("No audio output selected");
    }
    Ok(outputs)
}

#[cfg(feature = "playback")]
fn push_speaker(outputs: &mut Outputs, settings: &Settings) {
    match echo_sphere::audio::SpeakerSink::open(&settings.audio) {
        Ok(speaker) => outputs.push_live(Box::new(speaker)),
        Err(e) => log::warn!("Speaker unavailable, continuing without it: {}", e),
    }
}

#[cfg(not(feature = "playback"))]
fn push_speaker(_outputs: &mut Outputs, _settings: &Settings) {
    log::warn!("Built without the `playback` feature; --speaker ignored");
}
