//! Surfaces that don't draw: one records, one discards

use glam::Vec2;

use super::{Layer, Surface, TextAlign};
use crate::color::Color;

/// A single recorded call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    Alpha(f32),
    Glow { color: Color, blur: f32 },
    Circle { center: Vec2, radius: f32, color: Color, filled: bool },
    Rect { origin: Vec2, size: Vec2, color: Color, filled: bool },
    Line { from: Vec2, to: Vec2, color: Color },
    Gradient { origin: Vec2, size: Vec2, stops: usize },
    Text { text: String, at: Vec2, size: f32, color: Color },
    Layer(Layer),
}

/// Keeps every call, for tests and headless runs
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Vec2,
    pub calls: Vec<DrawCall>,
    depth: usize,
    /// Most save/restore nesting seen
    pub max_depth: usize,
}

impl RecordingSurface {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            calls: Vec::new(),
            depth: 0,
            max_depth: 0,
        }
    }

    /// Current save/restore nesting
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Layers in the order they were started
    pub fn layers(&self) -> Vec<Layer> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Layer(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    /// Calls made while `layer` was the current layer
    pub fn calls_in(&self, layer: Layer) -> &[DrawCall] {
        let start = self.calls.iter().position(|c| *c == DrawCall::Layer(layer));
        let Some(start) = start else {
            return &[];
        };
        let rest = &self.calls[start + 1..];
        let end = rest
            .iter()
            .position(|c| matches!(c, DrawCall::Layer(_)))
            .unwrap_or(rest.len());
        &rest[..end]
    }

    /// Whether any text call contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.calls
            .iter()
            .any(|c| matches!(c, DrawCall::Text { text, .. } if text.contains(needle)))
    }

    pub fn reset(&mut self) {
        self.calls.clear();
        self.depth = 0;
        self.max_depth = 0;
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.calls.push(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.calls.push(DrawCall::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.calls.push(DrawCall::Translate(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.calls.push(DrawCall::Rotate(angle));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.calls.push(DrawCall::Alpha(alpha));
    }

    fn set_glow(&mut self, color: Color, blur: f32) {
        self.calls.push(DrawCall::Glow { color, blur });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
            filled: true,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, _width: f32) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
            filled: false,
        });
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.calls.push(DrawCall::Rect {
            origin,
            size,
            color,
            filled: true,
        });
    }

    fn stroke_rect(&mut self, origin: Vec2, size: Vec2, color: Color, _width: f32) {
        self.calls.push(DrawCall::Rect {
            origin,
            size,
            color,
            filled: false,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, _width: f32) {
        self.calls.push(DrawCall::Line { from, to, color });
    }

    fn fill_gradient(&mut self, origin: Vec2, size: Vec2, stops: &[(f32, Color)]) {
        self.calls.push(DrawCall::Gradient {
            origin,
            size,
            stops: stops.len(),
        });
    }

    fn text(&mut self, text: &str, at: Vec2, size: f32, color: Color, _align: TextAlign) {
        self.calls.push(DrawCall::Text {
            text: text.to_owned(),
            at,
            size,
            color,
        });
    }

    fn layer(&mut self, layer: Layer) {
        self.calls.push(DrawCall::Layer(layer));
    }
}

/// Discards everything (native soak runs)
#[derive(Debug, Clone, Copy)]
pub struct NullSurface {
    pub size: Vec2,
}

impl Surface for NullSurface {
    fn size(&self) -> Vec2 {
        self.size
    }
    fn clear(&mut self) {}
    fn save(&mut self) {}
    fn restore(&mut self) {}
    fn translate(&mut self, _offset: Vec2) {}
    fn rotate(&mut self, _angle: f32) {}
    fn set_alpha(&mut self, _alpha: f32) {}
    fn set_glow(&mut self, _color: Color, _blur: f32) {}
    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Color) {}
    fn stroke_circle(&mut self, _center: Vec2, _radius: f32, _color: Color, _width: f32) {}
    fn fill_rect(&mut self, _origin: Vec2, _size: Vec2, _color: Color) {}
    fn stroke_rect(&mut self, _origin: Vec2, _size: Vec2, _color: Color, _width: f32) {}
    fn line(&mut self, _from: Vec2, _to: Vec2, _color: Color, _width: f32) {}
    fn fill_gradient(&mut self, _origin: Vec2, _size: Vec2, _stops: &[(f32, Color)]) {}
    fn text(&mut self, _text: &str, _at: Vec2, _size: f32, _color: Color, _align: TextAlign) {}
}
