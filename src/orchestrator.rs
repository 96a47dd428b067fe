//! Per-frame glue
//!
//! Each frame: advance physics; on a fresh collision look up the chord and
//! hand it to the sink; record the trail and age ripples. Drawing reads the
//! resulting state and never mutates it.

use rand::Rng;
use rand_pcg::Pcg32;

use crate::audio::{AudioSink, NoteSequencer};
use crate::consts::SAMPLE_RATE;
use crate::renderer::{GraphicsCanvas, SceneView, draw_scene};
use crate::settings::SimConfig;
use crate::sim::{CollisionEvent, ImpactTrailManager, PhysicsEngine};

/// Owns the whole simulation and the audio sink
pub struct Orchestrator<S, R = Pcg32> {
    physics: PhysicsEngine<R>,
    sequencer: NoteSequencer,
    trail: ImpactTrailManager,
    sink: S,
    frame_count: u64,
}

impl<S: AudioSink> Orchestrator<S, Pcg32> {
    pub fn with_seed(config: &SimConfig, seed: u64, sink: S) -> Self {
        Self::from_parts(PhysicsEngine::with_seed(config, seed), config, sink)
    }
}

impl<S: AudioSink, R: Rng> Orchestrator<S, R> {
    pub fn new(config: &SimConfig, rng: R, sink: S) -> Self {
        Self::from_parts(PhysicsEngine::new(config, rng), config, sink)
    }

    fn from_parts(physics: PhysicsEngine<R>, config: &SimConfig, sink: S) -> Self {
        Self {
            physics,
            sequencer: NoteSequencer::default(),
            trail: ImpactTrailManager::new(config),
            sink,
            frame_count: 0,
        }
    }

    /// Advance one frame, returning the collision it produced (if any)
    pub fn update(&mut self) -> Option<CollisionEvent> {
        let event = self.physics.update();

        if let Some(event) = &event {
            let spec = self.sequencer.chord_for(event.bounce_index);
            log::debug!(
                "Bounce {} at ({:.1}, {:.1}) -> {} ({:.2} Hz)",
                event.bounce_index,
                event.point.x,
                event.point.y,
                spec.label,
                spec.root()
            );
            // Ownership moves to the sink; nothing here touches the chord again
            self.sink.play(spec.synthesize(SAMPLE_RATE));
        }

        let ball = self.physics.ball();
        self.trail.record(event.as_ref(), ball.pos, ball.first_bounce_done());

        self.sink.frame_elapsed();
        self.frame_count += 1;
        event
    }

    /// Read-only snapshot for the render step
    pub fn view(&self) -> SceneView<'_> {
        SceneView {
            boundary: self.physics.boundary(),
            ball: self.physics.ball(),
            trail: self.trail.trail(),
            ripples: self.trail.ripples(),
        }
    }

    /// Draw the current state
    pub fn draw<C: GraphicsCanvas + ?Sized>(&self, canvas: &mut C) {
        draw_scene(&self.view(), canvas);
    }

    pub fn physics(&self) -> &PhysicsEngine<R> {
        &self.physics
    }

    pub fn trail(&self) -> &ImpactTrailManager {
        &self.trail
    }

    pub fn sequencer(&self) -> &NoteSequencer {
        &self.sequencer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Frames simulated so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Give the sink back, e.g. to finish a recording
    pub fn into_sink(self) -> S {
        self.sink
    }
}
