//! Collision response
//!
//! A detected overlap is resolved in two parts:
//! - Position: push the bodies apart along the normal by the penetration
//! - Velocity: rotate into the normal frame, apply the 1D restitution
//!   formula to the normal component, rotate back (tangential unchanged)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Contact;
use super::state::{Ball, Body};
use crate::error::{Result, SimError};
use crate::rotate;

/// How ball-ball overlap is shared between the two balls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CorrectionSplit {
    /// Each ball moves half the penetration, regardless of mass
    #[default]
    Equal,
    /// Lighter ball moves further (inverse-mass weighting)
    MassWeighted,
}

impl CorrectionSplit {
    /// Fraction of the penetration each ball moves
    pub fn shares(self, m1: f32, m2: f32) -> (f32, f32) {
        match self {
            CorrectionSplit::Equal => (0.5, 0.5),
            CorrectionSplit::MassWeighted => {
                let total = m1 + m2;
                (m2 / total, m1 / total)
            }
        }
    }
}

/// Post-collision velocities of two bodies colliding head-on in 1D
///
/// With `e = 1` and equal masses the velocities swap; with `e = 0` both
/// bodies leave with the same velocity.
pub fn linear_collision(e: f32, v1: f32, m1: f32, v2: f32, m2: f32) -> (f32, f32) {
    let total = m1 + m2;
    let v1_prime = ((m1 - e * m2) / total) * v1 + (((1.0 + e) * m2) / total) * v2;
    let v2_prime = (((1.0 + e) * m1) / total) * v1 + ((m2 - e * m1) / total) * v2;
    (v1_prime, v2_prime)
}

/// Post-collision velocity of a body hitting an immovable one in 1D
#[inline]
pub fn immovable_collision(e: f32, v1: f32) -> f32 {
    -e * v1
}

/// Basis aligned with a contact normal
///
/// The first axis lies along the line of the normal (possibly reversed);
/// the second is tangential.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalFrame {
    cos: f32,
    sin: f32,
}

impl NormalFrame {
    pub fn from_normal(n: Vec2) -> Self {
        if n.x == 0.0 {
            // 90 degrees; atan(dy/dx) is undefined
            Self { cos: 0.0, sin: 1.0 }
        } else if n.y == 0.0 {
            // 0 degrees
            Self { cos: 1.0, sin: 0.0 }
        } else {
            let angle = (n.y / n.x).atan();
            Self {
                cos: angle.cos(),
                sin: angle.sin(),
            }
        }
    }

    /// Unit vector of the normal-aligned axis
    pub fn axis(&self) -> Vec2 {
        Vec2::new(self.cos, self.sin)
    }

    /// (normal component, tangential component)
    pub fn to_local(&self, v: Vec2) -> (f32, f32) {
        let local = rotate(v, self.cos, -self.sin);
        (local.x, local.y)
    }

    pub fn to_world(&self, c: f32, t: f32) -> Vec2 {
        rotate(Vec2::new(c, t), self.cos, self.sin)
    }
}

pub fn check_restitution(e: f32) -> Result<()> {
    if (0.0..=1.0).contains(&e) {
        Ok(())
    } else {
        Err(SimError::InvalidRestitution(e))
    }
}

/// Resolve a detected contact between two bodies in place
///
/// `contact.normal` must point from `body2` toward `body1`. A contact that
/// did not collide leaves both bodies untouched.
pub fn resolve(
    body1: &mut Body,
    body2: &mut Body,
    contact: &Contact,
    restitution: f32,
    split: CorrectionSplit,
) -> Result<()> {
    check_restitution(restitution)?;
    if !body1.is_movable() && !body2.is_movable() {
        return Err(SimError::UnsupportedPair(body1.kind(), body2.kind()));
    }
    if !contact.collided {
        return Ok(());
    }
    match (body1, body2) {
        (Body::Ball(b1), Body::Ball(b2)) => {
            resolve_ball_ball(b1, b2, contact, restitution, split);
            Ok(())
        }
        (Body::Ball(ball), Body::Block(_) | Body::Wall(_)) => {
            resolve_ball_static(ball, contact.penetration, contact.normal, restitution);
            Ok(())
        }
        (Body::Block(_) | Body::Wall(_), Body::Ball(ball)) => {
            resolve_ball_static(ball, contact.penetration, -contact.normal, restitution);
            Ok(())
        }
        (a, b) => Err(SimError::UnsupportedPair(a.kind(), b.kind())),
    }
}

/// Ball against ball: split the correction, exchange normal momentum
pub fn resolve_ball_ball(
    b1: &mut Ball,
    b2: &mut Ball,
    contact: &Contact,
    e: f32,
    split: CorrectionSplit,
) {
    let n = contact.normal;
    let (m1, m2) = (b1.mass(), b2.mass());

    if contact.penetration > 0.0 {
        let (s1, s2) = split.shares(m1, m2);
        b1.pos += n * (contact.penetration * s1);
        b2.pos -= n * (contact.penetration * s2);
    }

    let frame = NormalFrame::from_normal(n);
    let (c1, t1) = frame.to_local(b1.vel);
    let (c2, t2) = frame.to_local(b2.vel);
    let (c1, c2) = linear_collision(e, c1, m1, c2, m2);
    b1.vel = frame.to_world(c1, t1);
    b2.vel = frame.to_world(c2, t2);
}

/// Ball against an immovable body; `normal` points away from the surface
///
/// Velocity is reflected only while the ball is moving into the surface.
pub fn resolve_ball_static(ball: &mut Ball, penetration: f32, normal: Vec2, e: f32) {
    if penetration > 0.0 {
        ball.pos += normal * penetration;
    }

    let frame = NormalFrame::from_normal(normal);
    let (c, t) = frame.to_local(ball.vel);
    // Frame axis may be the reversed normal
    let into_surface = c * frame.axis().dot(normal) <= 0.0;
    if into_surface {
        ball.vel = frame.to_world(immovable_collision(e, c), t);
    }
}
