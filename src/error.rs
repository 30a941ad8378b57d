//! Simulation error taxonomy
//!
//! Every variant is fatal: a violated precondition aborts the tick in
//! progress and is never retried.

use std::error::Error;
use std::fmt::{self, Display};

use glam::{IVec2, Vec2};

/// Which kind of body a shape-pair error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Ball,
    Block,
    Wall,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Ball => "ball",
            ShapeKind::Block => "block",
            ShapeKind::Wall => "wall",
        }
    }
}

#[derive(Debug)]
pub enum SimError {
    /// Timestep was zero, negative, or not finite
    InvalidStep(f32),
    InvalidMass(f32),
    InvalidRadius(f32),
    /// Coefficient of restitution outside [0, 1]
    InvalidRestitution(f32),
    /// Wall whose endpoints coincide
    DegenerateWall(Vec2),
    /// No detection/resolution case exists for this pair
    UnsupportedPair(ShapeKind, ShapeKind),
    /// Separation normal is undefined (coincident centers, center on a wall)
    DegenerateContact(ShapeKind, ShapeKind),
    GridOutOfBounds { cell: IVec2, width: u32, height: u32 },
    CellOccupied(IVec2),
    InvalidConfig(String),
    Config(serde_json::Error),
    Io(std::io::Error),
}

impl Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStep(dt) => write!(f, "invalid timestep: {} (must be > 0)", dt),
            Self::InvalidMass(m) => write!(f, "invalid mass: {} (must be > 0)", m),
            Self::InvalidRadius(r) => write!(f, "invalid radius: {} (must be > 0)", r),
            Self::InvalidRestitution(e) => {
                write!(f, "invalid coefficient of restitution: {} (must be in [0, 1])", e)
            }
            Self::DegenerateWall(p) => write!(f, "wall endpoints coincide at {}", p),
            Self::UnsupportedPair(a, b) => {
                write!(f, "unsupported shape pair: {}-{}", a.as_str(), b.as_str())
            }
            Self::DegenerateContact(a, b) => write!(
                f,
                "degenerate {}-{} contact: separation normal is undefined",
                a.as_str(),
                b.as_str()
            ),
            Self::GridOutOfBounds { cell, width, height } => write!(
                f,
                "block cell ({}, {}) is outside the {}x{} grid",
                cell.x, cell.y, width, height
            ),
            Self::CellOccupied(cell) => {
                write!(f, "block cell ({}, {}) is already occupied", cell.x, cell.y)
            }
            Self::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            Self::Config(inner) => write!(f, "failed to parse config: {}", inner),
            Self::Io(inner) => write!(f, "io error: {}", inner),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(inner) => Some(inner),
            Self::Io(inner) => Some(inner),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
