//! Collision detection and response against the circular boundary
//!
//! The ball lives inside the circle, so a contact happens when its centre
//! reaches `boundary_radius - ball_radius` from the boundary centre.

use glam::Vec2;

/// Static boundary circle, fixed for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Boundary {
    pub center: Vec2,
    pub radius: f32,
}

impl Boundary {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// A ball touching (or past) the boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the boundary centre towards the ball
    pub normal: Vec2,
    /// Ball centre pulled back onto the allowed circle
    pub clamped: Vec2,
    /// Point on the boundary surface where the ball touches it
    pub point: Vec2,
    /// How far the ball centre went past the allowed circle
    pub penetration: f32,
}

/// Check the ball against the boundary
///
/// Returns `None` while the ball is strictly inside the allowed circle.
/// A ball sitting exactly on the centre never collides.
pub fn boundary_contact(ball_pos: Vec2, ball_radius: f32, boundary: &Boundary) -> Option<Contact> {
    let offset = ball_pos - boundary.center;
    let distance = offset.length();
    let limit = boundary.radius - ball_radius;

    if distance < limit || distance <= f32::EPSILON {
        return None;
    }

    let normal = offset / distance;
    Some(Contact {
        normal,
        clamped: boundary.center + normal * limit,
        point: boundary.center + normal * boundary.radius,
        penetration: distance - limit,
    })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}
