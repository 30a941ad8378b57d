//! Narrow-phase collision detection
//!
//! Exact overlap tests for every pair involving a ball. Each test returns a
//! [`Contact`] whose normal points from the second body toward the first,
//! i.e. the direction the first body must move to separate.

use glam::Vec2;

use super::state::{Ball, Block, Body, Wall};
use crate::closest_point_on_segment;
use crate::error::{Result, ShapeKind, SimError};

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Whether the bodies overlap
    pub collided: bool,
    /// Overlap depth along the normal (0 when not collided)
    pub penetration: f32,
    /// Unit separation normal, body2 -> body1 (zero when not collided)
    pub normal: Vec2,
}

impl Contact {
    pub fn miss() -> Self {
        Self {
            collided: false,
            penetration: 0.0,
            normal: Vec2::ZERO,
        }
    }

    /// A contact only counts when penetration is strictly positive
    fn from_overlap(penetration: f32, normal: Vec2) -> Self {
        if penetration > 0.0 {
            Self {
                collided: true,
                penetration,
                normal,
            }
        } else {
            Self::miss()
        }
    }

    /// Same contact seen from the other body
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// Check collision between two bodies
///
/// Pairs of immovable bodies have no test and are rejected.
pub fn detect(body1: &Body, body2: &Body) -> Result<Contact> {
    match (body1, body2) {
        (Body::Ball(a), Body::Ball(b)) => ball_ball(a, b),
        (Body::Ball(ball), Body::Block(block)) => Ok(ball_block(ball, block)),
        (Body::Block(block), Body::Ball(ball)) => Ok(ball_block(ball, block).flipped()),
        (Body::Ball(ball), Body::Wall(wall)) => ball_wall(ball, wall),
        (Body::Wall(wall), Body::Ball(ball)) => ball_wall(ball, wall).map(Contact::flipped),
        (Body::Block(_) | Body::Wall(_), Body::Block(_) | Body::Wall(_)) => {
            Err(SimError::UnsupportedPair(body1.kind(), body2.kind()))
        }
    }
}

/// Circle-circle overlap
pub fn ball_ball(b1: &Ball, b2: &Ball) -> Result<Contact> {
    let a = b1.pos - b2.pos;
    let d1 = a.length();
    let d2 = b1.radius() + b2.radius();
    if d2 - d1 <= 0.0 {
        return Ok(Contact::miss());
    }
    if d1 == 0.0 {
        return Err(SimError::DegenerateContact(ShapeKind::Ball, ShapeKind::Ball));
    }
    Ok(Contact::from_overlap(d2 - d1, a / d1))
}

/// Where a point lies relative to a block's square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRegion {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    /// Inside the square (the ball tunneled in)
    Inside,
}

impl BlockRegion {
    /// Classify `p` against the square `[min, max]`
    ///
    /// Points on a face count as inside the face's band, so only points
    /// strictly beyond both axes land in a corner region.
    pub fn classify(min: Vec2, max: Vec2, p: Vec2) -> Self {
        let left = p.x < min.x;
        let right = p.x > max.x;
        let below = p.y < min.y;
        let above = p.y > max.y;
        match (left, right, below, above) {
            (true, _, _, true) => BlockRegion::TopLeft,
            (_, true, _, true) => BlockRegion::TopRight,
            (true, _, true, _) => BlockRegion::BottomLeft,
            (_, true, true, _) => BlockRegion::BottomRight,
            (_, _, _, true) => BlockRegion::Top,
            (_, _, true, _) => BlockRegion::Bottom,
            (true, _, _, _) => BlockRegion::Left,
            (_, true, _, _) => BlockRegion::Right,
            _ => BlockRegion::Inside,
        }
    }
}

/// Circle-square overlap
///
/// Fully enclosed blocks are never hit.
pub fn ball_block(ball: &Ball, block: &Block) -> Contact {
    if block.is_enclosed() {
        return Contact::miss();
    }

    let c = ball.pos;
    let r = ball.radius();
    let min = block.min();
    let max = block.max();

    let corner = |p: Vec2| {
        let offset = c - p;
        let dist = offset.length();
        Contact::from_overlap(r - dist, offset / dist)
    };

    match BlockRegion::classify(min, max, c) {
        BlockRegion::Top => Contact::from_overlap(r - (c.y - max.y), Vec2::Y),
        BlockRegion::Bottom => Contact::from_overlap(r - (min.y - c.y), Vec2::NEG_Y),
        BlockRegion::Left => Contact::from_overlap(r - (min.x - c.x), Vec2::NEG_X),
        BlockRegion::Right => Contact::from_overlap(r - (c.x - max.x), Vec2::X),
        BlockRegion::TopLeft => corner(Vec2::new(min.x, max.y)),
        BlockRegion::TopRight => corner(max),
        BlockRegion::BottomLeft => corner(min),
        BlockRegion::BottomRight => corner(Vec2::new(max.x, min.y)),
        BlockRegion::Inside => {
            // Push out through the nearest face
            let faces = [
                (max.y - c.y, Vec2::Y),
                (c.y - min.y, Vec2::NEG_Y),
                (c.x - min.x, Vec2::NEG_X),
                (max.x - c.x, Vec2::X),
            ];
            let (depth, normal) = faces
                .into_iter()
                .fold(faces[0], |best, f| if f.0 < best.0 { f } else { best });
            Contact::from_overlap(r + depth, normal)
        }
    }
}

/// Circle-segment overlap
pub fn ball_wall(ball: &Ball, wall: &Wall) -> Result<Contact> {
    let closest = closest_point_on_segment(ball.pos, wall.a(), wall.b());
    let offset = ball.pos - closest;
    let dist = offset.length();
    let penetration = ball.radius() - dist;
    if penetration <= 0.0 {
        return Ok(Contact::miss());
    }
    if dist == 0.0 {
        return Err(SimError::DegenerateContact(ShapeKind::Ball, ShapeKind::Wall));
    }
    Ok(Contact::from_overlap(penetration, offset / dist))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SimConfig;
    use crate::sim::scene::Scene;
    use crate::sim::state::BodyDesc;
    use glam::IVec2;
    use proptest::prelude::*;

    fn ball(x: f32, y: f32, r: f32) -> Ball {
        Ball::new(Vec2::new(x, y), Vec2::ZERO, 1.0, r).unwrap()
    }

    fn assert_unit(n: Vec2) {
        assert!((n.length() - 1.0).abs() < 1e-5, "normal {} is not unit", n);
    }

    #[test]
    fn test_ball_ball_overlap() {
        let b1 = ball(0.0, 0.0, 0.2);
        let b2 = ball(0.4, 0.0, 0.3);
        let c = ball_ball(&b1, &b2).unwrap();
        assert!(c.collided);
        assert!((c.penetration - 0.1).abs() < 1e-6);
        // From b2 toward b1
        assert!((c.normal - Vec2::NEG_X).length() < 1e-6);
    }

    #[test]
    fn test_ball_ball_separate_and_touching() {
        let b1 = ball(0.0, 0.0, 0.2);
        let far = ball(0.6, 0.0, 0.3);
        assert_eq!(ball_ball(&b1, &far).unwrap(), Contact::miss());

        let (t1, t2) = (ball(0.0, 0.0, 0.25), ball(0.5, 0.0, 0.25));
        assert!(!ball_ball(&t1, &t2).unwrap().collided);
    }

    #[test]
    fn test_ball_ball_coincident_is_degenerate() {
        let b1 = ball(1.0, 1.0, 0.2);
        let b2 = ball(1.0, 1.0, 0.3);
        assert!(matches!(
            ball_ball(&b1, &b2),
            Err(SimError::DegenerateContact(_, _))
        ));
    }

    #[test]
    fn test_classify_regions() {
        let (min, max) = (Vec2::ZERO, Vec2::ONE);
        let cases = [
            (Vec2::new(0.5, 1.5), BlockRegion::Top),
            (Vec2::new(0.5, -0.5), BlockRegion::Bottom),
            (Vec2::new(-0.5, 0.5), BlockRegion::Left),
            (Vec2::new(1.5, 0.5), BlockRegion::Right),
            (Vec2::new(-0.5, 1.5), BlockRegion::TopLeft),
            (Vec2::new(1.5, 1.5), BlockRegion::TopRight),
            (Vec2::new(-0.5, -0.5), BlockRegion::BottomLeft),
            (Vec2::new(1.5, -0.5), BlockRegion::BottomRight),
            (Vec2::new(0.5, 0.5), BlockRegion::Inside),
            (Vec2::new(1.0, 1.5), BlockRegion::Top),
        ];
        for (p, expected) in cases {
            assert_eq!(BlockRegion::classify(min, max, p), expected, "point {}", p);
        }
    }

    #[test]
    fn test_ball_block_right_face() {
        let block = Block::new(IVec2::ZERO);
        let b = ball(1.1, 0.5, 0.2);
        let c = ball_block(&b, &block);
        assert!(c.collided);
        assert!((c.penetration - 0.1).abs() < 1e-6);
        assert_eq!(c.normal, Vec2::X);
    }

    #[test]
    fn test_ball_block_each_face() {
        let block = Block::new(IVec2::new(2, 2));
        let cases = [
            (Vec2::new(2.5, 3.1), Vec2::Y),
            (Vec2::new(2.5, 1.9), Vec2::NEG_Y),
            (Vec2::new(1.9, 2.5), Vec2::NEG_X),
            (Vec2::new(3.1, 2.5), Vec2::X),
        ];
        for (p, normal) in cases {
            let b = Ball::new(p, Vec2::ZERO, 1.0, 0.25).unwrap();
            let c = ball_block(&b, &block);
            assert!(c.collided);
            assert!((c.penetration - 0.15).abs() < 1e-5);
            assert_eq!(c.normal, normal);
        }
    }

    #[test]
    fn test_ball_block_corner() {
        let block = Block::new(IVec2::ZERO);
        let b = ball(1.1, 1.1, 0.2);
        let c = ball_block(&b, &block);
        assert!(c.collided);
        let d = (0.1f32 * 0.1 * 2.0).sqrt();
        assert!((c.penetration - (0.2 - d)).abs() < 1e-5);
        assert_unit(c.normal);
        assert!((c.normal - Vec2::splat(1.0 / 2.0f32.sqrt())).length() < 1e-5);

        // Outside the corner radius: no hit even though both axes overlap the bands
        let b = ball(1.15, 1.15, 0.2);
        assert!(!ball_block(&b, &block).collided);
    }

    #[test]
    fn test_ball_block_tangent_is_miss() {
        let block = Block::new(IVec2::ZERO);
        let b = ball(1.25, 0.5, 0.25);
        assert_eq!(ball_block(&b, &block), Contact::miss());
    }

    #[test]
    fn test_ball_block_inside_pushes_through_nearest_face() {
        let block = Block::new(IVec2::ZERO);
        let b = ball(0.9, 0.5, 0.2);
        let c = ball_block(&b, &block);
        assert!(c.collided);
        assert_eq!(c.normal, Vec2::X);
        assert!((c.penetration - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_enclosed_block_never_collides() {
        let config = SimConfig {
            grid_width: 5,
            grid_height: 5,
            ..Default::default()
        };
        let descs = [
            BodyDesc::block(1, 2),
            BodyDesc::block(3, 2),
            BodyDesc::block(2, 1),
            BodyDesc::block(2, 3),
            BodyDesc::block(2, 2),
        ];
        let scene = Scene::build(&config, &descs).unwrap();
        let center = scene.block_at(IVec2::new(2, 2)).unwrap();
        assert!(center.is_enclosed());
        let b = ball(2.5, 2.5, 0.4);
        assert!(!ball_block(&b, center).collided);
    }

    #[test]
    fn test_ball_wall() {
        let wall = Wall::new(Vec2::ZERO, Vec2::new(4.0, 0.0)).unwrap();
        let c = ball_wall(&ball(1.0, 0.15, 0.2), &wall).unwrap();
        assert!(c.collided);
        assert!((c.penetration - 0.05).abs() < 1e-6);
        assert!((c.normal - Vec2::Y).length() < 1e-6);

        // Past the endpoint, measured to the endpoint
        let c = ball_wall(&ball(4.1, 0.1, 0.2), &wall).unwrap();
        assert!(c.collided);
        assert_unit(c.normal);

        assert!(!ball_wall(&ball(2.0, 1.0, 0.2), &wall).unwrap().collided);
        assert!(ball_wall(&ball(2.0, 0.0, 0.2), &wall).is_err());
    }

    #[test]
    fn test_detect_flips_normal_for_reversed_pairs() {
        let b = Body::Ball(ball(1.1, 0.5, 0.2));
        let block = Body::Block(Block::new(IVec2::ZERO));
        let forward = detect(&b, &block).unwrap();
        let reversed = detect(&block, &b).unwrap();
        assert_eq!(forward.normal, Vec2::X);
        assert_eq!(reversed.normal, Vec2::NEG_X);
        assert_eq!(forward.penetration, reversed.penetration);
    }

    #[test]
    fn test_detect_rejects_static_pairs() {
        let block = Body::Block(Block::new(IVec2::ZERO));
        let wall = Body::Wall(Wall::new(Vec2::ZERO, Vec2::ONE).unwrap());
        assert!(matches!(
            detect(&block, &wall),
            Err(SimError::UnsupportedPair(_, _))
        ));
        assert!(detect(&block, &block).is_err());
        assert!(detect(&wall, &wall).is_err());
    }

    proptest! {
        #[test]
        fn prop_detect_is_idempotent(
            x1 in -3.0f32..3.0, y1 in -3.0f32..3.0, r1 in 0.05f32..1.0,
            x2 in -3.0f32..3.0, y2 in -3.0f32..3.0, r2 in 0.05f32..1.0,
        ) {
            prop_assume!((Vec2::new(x1, y1) - Vec2::new(x2, y2)).length() > 1e-3);
            let a = Body::Ball(ball(x1, y1, r1));
            let b = Body::Ball(ball(x2, y2, r2));
            let first = detect(&a, &b).unwrap();
            let second = detect(&a, &b).unwrap();
            prop_assert_eq!(first, second);
            if first.collided {
                prop_assert!(first.penetration > 0.0);
                prop_assert!((first.normal.length() - 1.0).abs() < 1e-4);
            }
        }

        #[test]
        fn prop_block_normals_are_unit(
            x in -1.0f32..2.0, y in -1.0f32..2.0, r in 0.05f32..0.6,
        ) {
            let block = Block::new(IVec2::ZERO);
            let c = ball_block(&ball(x, y, r), &block);
            if c.collided {
                prop_assert!(c.penetration > 0.0);
                prop_assert!((c.normal.length() - 1.0).abs() < 1e-4);
            } else {
                prop_assert_eq!(c, Contact::miss());
            }
        }

        #[test]
        fn prop_enclosed_block_always_misses(
            x in -1.0f32..5.0, y in -1.0f32..5.0, r in 0.05f32..2.0,
        ) {
            let config = SimConfig {
                grid_width: 4,
                grid_height: 4,
                ..Default::default()
            };
            let descs: Vec<_> = (0..3)
                .flat_map(|y| (0..3).map(move |x| BodyDesc::block(x, y)))
                .collect();
            let scene = Scene::build(&config, &descs).unwrap();
            let center = scene.block_at(IVec2::new(1, 1)).unwrap();
            prop_assert!(center.is_enclosed());
            let b = Body::Ball(ball(x, y, r));
            let block = Body::Block(center.clone());
            prop_assert_eq!(ball_block(b.as_ball().unwrap(), center), Contact::miss());
            prop_assert_eq!(detect(&b, &block).unwrap(), Contact::miss());
            prop_assert_eq!(detect(&block, &b).unwrap(), Contact::miss());
        }
    }
}
