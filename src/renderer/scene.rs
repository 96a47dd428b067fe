//! Per-frame draw step
//!
//! Back to front: background, boundary, trail, ripples, ball.

use glam::Vec2;

use super::canvas::{Color, GraphicsCanvas};
use crate::sim::{Ball, Boundary, Ripple};

/// Stroke width for the boundary, trail and ripples
pub const STROKE_WIDTH: f32 = 2.0;
/// Ripple color saturation/value
const RIPPLE_SATURATION: f32 = 0.75;
const RIPPLE_VALUE: f32 = 0.9;

/// Read-only view of everything the frame shows
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub boundary: &'a Boundary,
    pub ball: &'a Ball,
    pub trail: &'a [Vec2],
    pub ripples: &'a [Ripple],
}

/// Color of a ripple at its current fade
pub fn ripple_color(ripple: &Ripple) -> Color {
    Color::from_hsva(ripple.hue, RIPPLE_SATURATION, RIPPLE_VALUE, ripple.alpha)
}

/// Draw one frame
pub fn draw_scene<C: GraphicsCanvas + ?Sized>(view: &SceneView<'_>, canvas: &mut C) {
    canvas.clear(Color::BACKGROUND);

    canvas.stroke_circle(
        view.boundary.center,
        view.boundary.radius,
        STROKE_WIDTH,
        Color::BLACK,
    );

    for segment in view.trail.windows(2) {
        canvas.stroke_line(segment[0], segment[1], STROKE_WIDTH, Color::BLACK);
    }

    for ripple in view.ripples {
        canvas.stroke_circle(ripple.pos, ripple.radius, STROKE_WIDTH, ripple_color(ripple));
    }

    canvas.fill_circle(view.ball.pos, view.ball.radius, Color::BLACK);
}
