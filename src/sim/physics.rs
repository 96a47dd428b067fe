//! Ball physics inside the boundary circle
//!
//! One Euler step per tick, one unit of time per step. The very first contact
//! sends the ball off in a random direction at the same speed; every later
//! contact is an ideal reflection, so speed never changes.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Boundary, boundary_contact, reflect};
use crate::settings::SimConfig;

/// Ball phase - waiting for its first contact, or bouncing for the rest of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallPhase {
    /// Ball is travelling along its start velocity
    PreFirstBounce,
    /// First contact happened; terminal
    Bouncing,
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub phase: BallPhase,
}

impl Ball {
    pub fn first_bounce_done(&self) -> bool {
        self.phase == BallPhase::Bouncing
    }
}

/// Emitted on the tick the ball starts touching the boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Contact point on the boundary surface
    pub point: Vec2,
    /// Ball centre after clamping
    pub position: Vec2,
    /// Unit normal from the boundary centre towards the ball
    pub normal: Vec2,
    /// Bounces before this one (0 for the first)
    pub bounce_index: u64,
}

/// Owns the ball, the boundary and the direction RNG
#[derive(Debug, Clone)]
pub struct PhysicsEngine<R = Pcg32> {
    ball: Ball,
    boundary: Boundary,
    bounce_count: u64,
    /// Whether the ball was touching the boundary after the previous tick
    touching: bool,
    rng: R,
}

impl PhysicsEngine<Pcg32> {
    /// Create an engine with a seeded PCG generator
    pub fn with_seed(config: &SimConfig, seed: u64) -> Self {
        Self::new(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> PhysicsEngine<R> {
    /// Ball starts at the boundary centre moving at `config.start_velocity`
    pub fn new(config: &SimConfig, rng: R) -> Self {
        Self {
            ball: Ball {
                pos: config.boundary_center,
                vel: config.start_velocity,
                radius: config.ball_radius,
                phase: BallPhase::PreFirstBounce,
            },
            boundary: Boundary::new(config.boundary_center, config.boundary_radius),
            bounce_count: 0,
            touching: false,
            rng,
        }
    }

    /// Advance one tick
    ///
    /// Returns an event only on a rising edge: the ball touches the boundary
    /// now and did not after the previous tick.
    pub fn update(&mut self) -> Option<CollisionEvent> {
        self.ball.pos += self.ball.vel;

        let Some(contact) = boundary_contact(self.ball.pos, self.ball.radius, &self.boundary)
        else {
            self.touching = false;
            return None;
        };

        self.ball.pos = contact.clamped;

        match self.ball.phase {
            BallPhase::PreFirstBounce => {
                let speed = self.ball.vel.length();
                let angle = self.rng.random_range(0.0..TAU);
                self.ball.vel = Vec2::new(angle.cos(), angle.sin()) * speed;
                self.ball.phase = BallPhase::Bouncing;
                log::debug!("First bounce, new heading {:.3} rad", angle);
            }
            BallPhase::Bouncing => {
                // Sustained contact while already heading inward needs no response
                if self.ball.vel.dot(contact.normal) > 0.0 {
                    self.ball.vel = reflect(self.ball.vel, contact.normal);
                }
            }
        }

        let rising_edge = !self.touching;
        self.touching = true;
        if !rising_edge {
            return None;
        }

        let bounce_index = self.bounce_count;
        self.bounce_count += 1;
        Some(CollisionEvent {
            point: contact.point,
            position: contact.clamped,
            normal: contact.normal,
            bounce_index,
        })
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn phase(&self) -> BallPhase {
        self.ball.phase
    }

    pub fn first_bounce_done(&self) -> bool {
        self.ball.first_bounce_done()
    }

    /// Bounces emitted so far
    pub fn bounce_count(&self) -> u64 {
        self.bounce_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::Rng;

    const EPS: f32 = 1e-3;

    fn distance_from_center<R: Rng>(engine: &PhysicsEngine<R>) -> f32 {
        (engine.ball().pos - engine.boundary().center).length()
    }

    #[test]
    fn test_first_contact_scenario() {
        let config = SimConfig::default();
        let mut engine = PhysicsEngine::with_seed(&config, 12345);
        assert_eq!(engine.phase(), BallPhase::PreFirstBounce);

        // 190 pixels at 5 per tick
        for _ in 0..37 {
            assert!(engine.update().is_none());
            assert_eq!(engine.phase(), BallPhase::PreFirstBounce);
        }
        let event = engine.update().expect("contact on tick 38");
        assert_eq!(event.bounce_index, 0);
        assert_eq!(engine.bounce_count(), 1);
        assert_eq!(engine.phase(), BallPhase::Bouncing);
        assert!((event.point - Vec2::new(400.0, 500.0)).length() < EPS);
        assert!((event.position - Vec2::new(400.0, 490.0)).length() < EPS);
        // Speed preserved, direction randomized
        assert!((engine.ball().vel.length() - 5.0).abs() < EPS);
    }

    #[test]
    fn test_first_bounce_direction_randomized() {
        let config = SimConfig::default();
        let initial = config.start_velocity.normalize();
        let mut changed = 0;
        for seed in 0..32 {
            let mut engine = PhysicsEngine::with_seed(&config, seed);
            while engine.update().is_none() {}
            let dir = engine.ball().vel.normalize();
            if (dir - initial).length() > 1e-3 {
                changed += 1;
            }
        }
        assert!(changed >= 30, "only {changed} of 32 seeds changed direction");
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = SimConfig::default();
        let mut a = PhysicsEngine::with_seed(&config, 99999);
        let mut b = PhysicsEngine::with_seed(&config, 99999);
        for _ in 0..2000 {
            assert_eq!(a.update(), b.update());
        }
        assert_eq!(a.ball(), b.ball());
        assert_eq!(a.bounce_count(), b.bounce_count());
    }

    #[test]
    fn test_reflection_after_first_bounce() {
        let config = SimConfig::default();
        let mut engine = PhysicsEngine::with_seed(&config, 7);
        while engine.update().is_none() {}

        // Force a known state: heading straight right from the centre
        engine.ball.pos = config.boundary_center;
        engine.ball.vel = Vec2::new(5.0, 0.0);
        engine.touching = false;

        let event = loop {
            if let Some(event) = engine.update() {
                break event;
            }
        };
        assert_eq!(event.bounce_index, 1);
        assert!((engine.ball().vel - Vec2::new(-5.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_sustained_contact_reflects_without_event() {
        let config = SimConfig::default();
        let mut engine = PhysicsEngine::with_seed(&config, 3);
        while engine.update().is_none() {}

        // Still touching the bottom of the wall and heading outward
        let limit = config.contact_distance();
        engine.ball.pos = config.boundary_center + Vec2::new(0.0, limit);
        engine.ball.vel = Vec2::new(0.0, 3.0);
        engine.touching = true;

        let before = engine.bounce_count();
        assert!(engine.update().is_none());
        assert_eq!(engine.bounce_count(), before);
        assert!((engine.ball().vel - Vec2::new(0.0, -3.0)).length() < EPS);
        assert!(distance_from_center(&engine) <= limit + EPS);
    }

    #[test]
    fn test_outward_first_heading_turns_back_silently() {
        let config = SimConfig::default();
        // Find a seed whose random heading points back into the wall
        let mut engine = (0..64)
            .map(|seed| {
                let mut engine = PhysicsEngine::with_seed(&config, seed);
                while engine.update().is_none() {}
                engine
            })
            .find(|engine| engine.ball().vel.y > 0.0)
            .expect("some seed heads outward");

        assert!(engine.update().is_none());
        assert_eq!(engine.bounce_count(), 1);
        assert!(engine.ball().vel.y < 0.0);
    }

    #[test]
    fn test_first_bounce_happens_once() {
        let config = SimConfig::default();
        let mut engine = PhysicsEngine::with_seed(&config, 42);
        let mut events = 0;
        for _ in 0..5000 {
            if engine.update().is_some() {
                events += 1;
                assert_eq!(engine.phase(), BallPhase::Bouncing);
            }
        }
        assert!(events > 10);
        assert_eq!(engine.bounce_count(), events);
    }

    proptest! {
        #[test]
        fn prop_ball_stays_inside(seed in any::<u64>(), ticks in 1usize..3000) {
            let config = SimConfig::default();
            let mut engine = PhysicsEngine::with_seed(&config, seed);
            for _ in 0..ticks {
                engine.update();
                prop_assert!(distance_from_center(&engine) <= config.contact_distance() + EPS);
            }
        }

        #[test]
        fn prop_speed_constant(seed in any::<u64>()) {
            let config = SimConfig::default();
            let speed = config.start_velocity.length();
            let mut engine = PhysicsEngine::with_seed(&config, seed);
            for _ in 0..1500 {
                engine.update();
                prop_assert!((engine.ball().vel.length() - speed).abs() < 1e-2);
            }
        }
    }
}
