//! Semi-implicit (symplectic) Euler integration
//!
//! Velocity is updated from the accumulated force first, then position from
//! the new velocity. No clamping or sub-stepping: large steps can tunnel.

use super::forces::ForceModel;
use super::state::{Ball, Body};
use crate::error::{Result, SimError};

/// Reject zero, negative, and non-finite steps
#[inline]
pub fn check_step(dt: f32) -> Result<()> {
    if dt > 0.0 && dt.is_finite() {
        Ok(())
    } else {
        Err(SimError::InvalidStep(dt))
    }
}

/// Advance one ball by `dt`
pub fn integrate_ball(ball: &mut Ball, forces: &ForceModel, dt: f32) -> Result<()> {
    check_step(dt)?;
    let force = forces.total(ball.mass(), ball.vel, ball.radius())?;
    let acc = force / ball.mass();
    ball.vel += acc * dt;
    ball.pos += ball.vel * dt;
    Ok(())
}

/// Advance any body by `dt`; immovable bodies are left untouched
pub fn integrate(body: &mut Body, forces: &ForceModel, dt: f32) -> Result<()> {
    check_step(dt)?;
    match body {
        Body::Ball(ball) => integrate_ball(ball, forces, dt),
        Body::Block(_) | Body::Wall(_) => Ok(()),
    }
}
