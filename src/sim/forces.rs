//! Force model
//!
//! Stateless force functions plus the set of forces the integrator applies.
//! Gravity is always on; aerodynamic drag is available but disabled unless
//! the config turns it on.

use std::f32::consts::PI;

use glam::Vec2;

use crate::consts::*;
use crate::error::{Result, SimError};
use crate::settings::SimConfig;

/// Weight of a body: `mass * g`
pub fn gravity(mass: f32, g: Vec2) -> Result<Vec2> {
    if mass <= 0.0 {
        return Err(SimError::InvalidMass(mass));
    }
    Ok(g * mass)
}

/// Quadratic drag on a circle, opposing velocity
///
/// Magnitude is `0.5 * rho * |v|^2 * (pi * r^2) * Cd`.
pub fn aerodynamic_drag(velocity: Vec2, radius: f32) -> Vec2 {
    let area = PI * radius * radius;
    let k = -0.5 * AIR_DENSITY * velocity.length() * area * DRAG_COEFFICIENT;
    velocity * k
}

/// The forces acting on every ball during integration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceModel {
    pub gravity: Vec2,
    pub drag: bool,
}

impl Default for ForceModel {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            drag: false,
        }
    }
}

impl ForceModel {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            gravity: config.gravity,
            drag: config.drag,
        }
    }

    /// Sum of active forces on a ball with the given state
    pub fn total(&self, mass: f32, velocity: Vec2, radius: f32) -> Result<Vec2> {
        let mut force = gravity(mass, self.gravity)?;
        if self.drag {
            force += aerodynamic_drag(velocity, radius);
        }
        Ok(force)
    }
}
