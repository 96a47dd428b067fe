//! Rendering module
//!
//! The draw step talks to a `GraphicsCanvas`. `PixelCanvas` rasterizes in
//! software for snapshots; `DrawList` records calls.

pub mod canvas;
pub mod raster;
pub mod scene;

pub use canvas::{Color, DrawCommand, DrawList, GraphicsCanvas};
pub use raster::PixelCanvas;
pub use scene::{SceneView, draw_scene, ripple_color};
