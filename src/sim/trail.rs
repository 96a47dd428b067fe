//! Impact trail and ripples
//!
//! The trail traces the ball's path from its first bounce on, one point per
//! tick. Every fresh collision also spawns a ripple that grows and fades out.

use glam::Vec2;

use super::physics::CollisionEvent;
use crate::hue_for_bounce;
use crate::settings::SimConfig;

/// An expanding, fading ring at an impact point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub pos: Vec2,
    pub radius: f32,
    /// 1.0 when spawned, removed once it reaches 0
    pub alpha: f32,
    /// Degrees [0, 360)
    pub hue: f32,
}

impl Ripple {
    fn age(&mut self, growth: f32, decay: f32) {
        self.radius += growth;
        self.alpha -= decay;
    }

    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }
}

/// Owns the trail points and the live ripples
#[derive(Debug, Clone)]
pub struct ImpactTrailManager {
    trail: Vec<Vec2>,
    ripples: Vec<Ripple>,
    ripple_start_radius: f32,
    ripple_growth: f32,
    ripple_decay: f32,
    hue_step: u32,
    trail_limit: Option<usize>,
}

impl ImpactTrailManager {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            trail: Vec::new(),
            ripples: Vec::new(),
            ripple_start_radius: config.ripple_start_radius,
            ripple_growth: config.ripple_growth,
            ripple_decay: config.ripple_decay,
            hue_step: config.hue_step,
            trail_limit: config.trail_limit,
        }
    }

    /// Record one tick
    ///
    /// A fresh collision adds its impact point to the trail and spawns a
    /// ripple there. Otherwise the ball position is traced, but only once the
    /// first bounce has happened. All ripples then age and dead ones are
    /// dropped in place, keeping the order of the survivors.
    pub fn record(
        &mut self,
        event: Option<&CollisionEvent>,
        ball_pos: Vec2,
        first_bounce_done: bool,
    ) {
        match event {
            Some(event) => {
                self.push_point(event.point);
                self.ripples.push(Ripple {
                    pos: event.point,
                    radius: self.ripple_start_radius,
                    alpha: 1.0,
                    hue: hue_for_bounce(event.bounce_index, self.hue_step),
                });
            }
            None if first_bounce_done => self.push_point(ball_pos),
            None => {}
        }

        let (growth, decay) = (self.ripple_growth, self.ripple_decay);
        for ripple in self.ripples.iter_mut() {
            ripple.age(growth, decay);
        }
        self.ripples.retain(Ripple::is_alive);
        log::trace!("{} ripples, {} trail points", self.ripples.len(), self.trail.len());
    }

    fn push_point(&mut self, point: Vec2) {
        self.trail.push(point);
        if let Some(limit) = self.trail_limit {
            if self.trail.len() > limit {
                let excess = self.trail.len() - limit;
                self.trail.drain(..excess);
            }
        }
    }

    /// Trail points, oldest first
    pub fn trail(&self) -> &[Vec2] {
        &self.trail
    }

    /// Live ripples, oldest first
    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }
}
