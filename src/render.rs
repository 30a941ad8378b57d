//! Draw hook
//!
//! The simulation owns no pixels: each body issues one draw call per tick
//! through [`Renderer`], carrying world-space geometry only. Color, scale
//! and coordinate transforms belong to the implementor.

use glam::Vec2;

/// Rendering capability the tick calls into before integrating each body
pub trait Renderer {
    fn draw_circle(&mut self, center: Vec2, radius: f32);
    /// Axis-aligned square given by its lower-left corner
    fn draw_square(&mut self, corner: Vec2, side: f32);
    fn draw_segment(&mut self, a: Vec2, b: Vec2);
}

/// Renderer that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn draw_circle(&mut self, _center: Vec2, _radius: f32) {}
    fn draw_square(&mut self, _corner: Vec2, _side: f32) {}
    fn draw_segment(&mut self, _a: Vec2, _b: Vec2) {}
}

/// A single recorded draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Circle { center: Vec2, radius: f32 },
    Square { corner: Vec2, side: f32 },
    Segment { a: Vec2, b: Vec2 },
}

/// Renderer that records every call, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub commands: Vec<DrawCommand>,
}

impl RecordingRenderer {
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn draw_circle(&mut self, center: Vec2, radius: f32) {
        self.commands.push(DrawCommand::Circle { center, radius });
    }

    fn draw_square(&mut self, corner: Vec2, side: f32) {
        self.commands.push(DrawCommand::Square { corner, side });
    }

    fn draw_segment(&mut self, a: Vec2, b: Vec2) {
        self.commands.push(DrawCommand::Segment { a, b });
    }
}

/// World (y-up, length units) to screen (y-down, pixels) mapping
///
/// `scale` is world units per pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
    pub scale: f32,
}

impl Viewport {
    pub fn new(width_px: u32, height_px: u32, scale: f32) -> Self {
        Self {
            width_px,
            height_px,
            scale,
        }
    }

    pub fn to_screen(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x / self.scale, self.height_px as f32 - p.y / self.scale)
    }

    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x * self.scale,
            (self.height_px as f32 - screen.y) * self.scale,
        )
    }

    #[inline]
    pub fn length_to_screen(&self, len: f32) -> f32 {
        len / self.scale
    }

    /// Top-left of a circle's screen bounding box, and its pixel radius
    pub fn circle_box(&self, center: Vec2, radius: f32) -> (Vec2, f32) {
        let r = self.length_to_screen(radius);
        (self.to_screen(center) - Vec2::splat(r), r)
    }
}
