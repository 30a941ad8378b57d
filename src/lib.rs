//! Ball Grid Sim - 2D ball/block collision simulator
//!
//! Core modules:
//! - `sim`: Physics pipeline (forces, integration, detection, resolution, tick)
//! - `render`: Draw hook the simulation calls into, plus helpers for renderers
//! - `settings`: JSON-backed simulation configuration
//! - `scenes`: Seeded demo scene generators
//! - `error`: Fatal error taxonomy

pub mod error;
pub mod render;
pub mod scenes;
pub mod settings;
pub mod sim;

pub use error::{Result, ShapeKind, SimError};
pub use render::{DrawCommand, RecordingRenderer, Renderer, Viewport};
pub use settings::{Bounds, SimConfig};

use glam::Vec2;

/// Simulation constants
pub mod consts {
    use glam::Vec2;

    /// Default gravitational acceleration (length units/s²)
    pub const GRAVITY: Vec2 = Vec2::new(0.0, -1.8);

    /// Default coefficient of restitution
    pub const DEFAULT_RESTITUTION: f32 = 0.9;

    /// Fluid density used by aerodynamic drag
    pub const AIR_DENSITY: f32 = 1.0;
    /// Drag coefficient for a circle in two dimensions
    pub const DRAG_COEFFICIENT: f32 = 1.2;

    /// Side length shared by every block
    pub const BLOCK_SIDE: f32 = 1.0;
    /// A block with this many occupied neighbors is unreachable
    pub const MAX_CONTACTS: u8 = 4;

    /// Default block grid size (cells per side)
    pub const DEFAULT_GRID_SIZE: u32 = 64;
    /// Largest block grid, in cells, a config may ask for
    pub const MAX_GRID_CELLS: usize = 1 << 24;

    /// Steps longer than this (seconds) get a tunneling warning
    pub const LARGE_STEP_WARNING: f32 = 0.25;
}

/// Rotate a vector counter-clockwise by the angle with the given cos/sin
#[inline]
pub fn rotate(v: Vec2, cos: f32, sin: f32) -> Vec2 {
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Closest point to `p` on the segment `a`-`b`
#[inline]
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
