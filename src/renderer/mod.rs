//! 2D immediate-mode rendering
//!
//! Everything is drawn through the [`Surface`] trait: a small subset of the
//! Canvas2D API (shapes, text, alpha, a save/restore transform stack).
//! The browser build backs it with `CanvasRenderingContext2d`; tests record
//! the calls instead.

pub mod draw;
pub mod record;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

use glam::Vec2;

use crate::color::Color;

pub use draw::{Draw, draw_frame, draw_overlay, draw_scene};
pub use record::{DrawCall, NullSurface, RecordingSurface};

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;

/// Horizontal text anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

/// Scene layers, drawn back to front in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    Background,
    Powerups,
    Enemies,
    Player,
    Projectiles,
    Effects,
    Particles,
    Overlay,
}

/// Immediate-mode drawing target
pub trait Surface {
    /// Drawable size in pixels
    fn size(&self) -> Vec2;
    fn clear(&mut self);
    /// Push transform, alpha and glow state
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    /// Absolute opacity until the next `restore`
    fn set_alpha(&mut self, alpha: f32);
    /// Soft glow around subsequent shapes (`blur` 0 disables)
    fn set_glow(&mut self, color: Color, blur: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color);
    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, color: Color, width: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32);
    /// Rectangle filled with a top-left to bottom-right gradient; stops are (offset 0..1, colour)
    fn fill_gradient(&mut self, origin: Vec2, size: Vec2, stops: &[(f32, Color)]);
    fn text(&mut self, text: &str, at: Vec2, size: f32, color: Color, align: TextAlign);

    /// Marks the start of a scene layer
    fn layer(&mut self, _layer: Layer) {}
}
