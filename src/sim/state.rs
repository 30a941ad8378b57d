//! Bodies and scene descriptors
//!
//! Balls are the only movable shape. Blocks are unit grid squares and walls
//! are fixed line segments; neither ever moves.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, ShapeKind, SimError};
use crate::render::Renderer;

/// A movable circular body
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    mass: f32,
    radius: f32,
}

impl Ball {
    pub fn new(pos: Vec2, vel: Vec2, mass: f32, radius: f32) -> Result<Self> {
        if !(mass > 0.0) {
            return Err(SimError::InvalidMass(mass));
        }
        if !(radius > 0.0) {
            return Err(SimError::InvalidRadius(radius));
        }
        Ok(Self {
            pos,
            vel,
            mass,
            radius,
        })
    }

    #[inline]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.vel.length_squared()
    }
}

/// An immovable unit square occupying one grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub cell: IVec2,
    /// Occupied N/S/E/W neighbors, in [0, 4]
    contacts: u8,
}

impl Block {
    pub fn new(cell: IVec2) -> Self {
        Self { cell, contacts: 0 }
    }

    #[inline]
    pub fn contact_count(&self) -> u8 {
        self.contacts
    }

    /// Fully surrounded; no ball can reach it without hitting a neighbor first
    #[inline]
    pub fn is_enclosed(&self) -> bool {
        self.contacts == MAX_CONTACTS
    }

    /// Lower-left corner in world space
    #[inline]
    pub fn min(&self) -> Vec2 {
        self.cell.as_vec2() * BLOCK_SIDE
    }

    /// Upper-right corner in world space
    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min() + Vec2::splat(BLOCK_SIDE)
    }

    pub fn center(&self) -> Vec2 {
        self.min() + Vec2::splat(BLOCK_SIDE / 2.0)
    }

    pub(crate) fn add_contact(&mut self) {
        debug_assert!(self.contacts < MAX_CONTACTS);
        self.contacts += 1;
    }
}

/// An immovable line segment
#[derive(Debug, Clone, PartialEq)]
pub struct Wall {
    a: Vec2,
    b: Vec2,
}

impl Wall {
    pub fn new(a: Vec2, b: Vec2) -> Result<Self> {
        if a == b {
            return Err(SimError::DegenerateWall(a));
        }
        Ok(Self { a, b })
    }

    #[inline]
    pub fn a(&self) -> Vec2 {
        self.a
    }

    #[inline]
    pub fn b(&self) -> Vec2 {
        self.b
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.a + self.b) * 0.5
    }
}

/// Every body in a scene
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Ball(Ball),
    Block(Block),
    Wall(Wall),
}

impl Body {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Body::Ball(_) => ShapeKind::Ball,
            Body::Block(_) => ShapeKind::Block,
            Body::Wall(_) => ShapeKind::Wall,
        }
    }

    /// Reference position (ball center, block lower-left corner, wall midpoint)
    pub fn position(&self) -> Vec2 {
        match self {
            Body::Ball(ball) => ball.pos,
            Body::Block(block) => block.min(),
            Body::Wall(wall) => wall.midpoint(),
        }
    }

    #[inline]
    pub fn is_movable(&self) -> bool {
        matches!(self, Body::Ball(_))
    }

    pub fn as_ball(&self) -> Option<&Ball> {
        match self {
            Body::Ball(ball) => Some(ball),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Body::Block(block) => Some(block),
            _ => None,
        }
    }

    /// Issue this body's single draw call for the frame
    pub fn draw(&self, renderer: &mut dyn Renderer) {
        match self {
            Body::Ball(ball) => renderer.draw_circle(ball.pos, ball.radius),
            Body::Block(block) => renderer.draw_square(block.min(), BLOCK_SIDE),
            Body::Wall(wall) => renderer.draw_segment(wall.a, wall.b),
        }
    }
}

/// Scene input: one entry per body, in scene order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyDesc {
    Ball {
        position: Vec2,
        #[serde(default)]
        velocity: Vec2,
        mass: f32,
        radius: f32,
    },
    Block {
        x: i32,
        y: i32,
    },
    Wall {
        a: Vec2,
        b: Vec2,
    },
}

impl BodyDesc {
    pub fn ball(position: Vec2, velocity: Vec2, mass: f32, radius: f32) -> Self {
        BodyDesc::Ball {
            position,
            velocity,
            mass,
            radius,
        }
    }

    pub fn block(x: i32, y: i32) -> Self {
        BodyDesc::Block { x, y }
    }

    pub fn wall(a: Vec2, b: Vec2) -> Self {
        BodyDesc::Wall { a, b }
    }
}
