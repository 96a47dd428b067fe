//! Software rasterizer for frame snapshots
//!
//! Coverage is estimated from the distance between each pixel centre and the
//! shape edge, which gives roughly one pixel of anti-aliasing.

use std::path::Path;

use glam::Vec2;
use image::{Rgba, RgbaImage};

use super::canvas::{Color, GraphicsCanvas};

/// Canvas backed by an RGBA image
pub struct PixelCanvas {
    image: RgbaImage,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        Color::rgba(r, g, b, a)
    }

    /// Write the current frame as PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        self.image.save(path.as_ref())?;
        log::info!("Snapshot saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Visit every pixel whose centre lies in `[min, max]`, blending with the
    /// coverage returned by `coverage(pixel_centre)`
    fn shade<F>(&mut self, min: Vec2, max: Vec2, color: Color, coverage: F)
    where
        F: Fn(Vec2) -> f32,
    {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(w - 1);
        let y1 = (max.y.ceil().max(0.0) as u32).min(h - 1);
        if min.x > (w - 1) as f32 || min.y > (h - 1) as f32 {
            return;
        }

        for y in y0..=y1 {
            for x in x0..=x1 {
                let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let cov = coverage(centre).clamp(0.0, 1.0);
                if cov > 0.0 {
                    blend(self.image.get_pixel_mut(x, y), color, cov);
                }
            }
        }
    }
}

/// Source-over blend of `color` at `coverage` onto an opaque pixel
fn blend(dst: &mut Rgba<u8>, color: Color, coverage: f32) {
    let a = color.alpha_f32() * coverage;
    let mix = |d: u8, s: u8| -> u8 { (d as f32 + (s as f32 - d as f32) * a).round() as u8 };
    dst.0 = [mix(dst.0[0], color.r), mix(dst.0[1], color.g), mix(dst.0[2], color.b), 255];
}

/// Distance from `p` to the segment `a`-`b`
fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

impl GraphicsCanvas for PixelCanvas {
    fn clear(&mut self, color: Color) {
        for pixel in self.image.pixels_mut() {
            *pixel = Rgba([color.r, color.g, color.b, 255]);
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, width: f32, color: Color) {
        let half = width * 0.5;
        let reach = Vec2::splat(radius + half + 1.0);
        self.shade(center - reach, center + reach, color, |p| {
            half - ((p - center).length() - radius).abs() + 0.5
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let reach = Vec2::splat(radius + 1.0);
        self.shade(center - reach, center + reach, color, |p| {
            radius - (p - center).length() + 0.5
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Color) {
        let half = width * 0.5;
        let pad = Vec2::splat(half + 1.0);
        self.shade(from.min(to) - pad, from.max(to) + pad, color, |p| {
            half - segment_distance(p, from, to) + 0.5
        });
    }
}
