//! Demo scenes
//!
//! Seeded generators for ready-made descriptor lists. The same seed always
//! produces the same scene.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::BLOCK_SIDE;
use crate::sim::BodyDesc;

/// Open-topped box of blocks with balls dropped in from above
///
/// The box spans `width` x `height` cells: a floor row plus two side
/// columns. Balls are placed on a jittered lattice so none overlap.
pub fn block_box(seed: u64, width: i32, height: i32, balls: usize) -> Vec<BodyDesc> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut descs = Vec::new();

    for x in 0..width {
        descs.push(BodyDesc::block(x, 0));
    }
    for y in 1..height {
        descs.push(BodyDesc::block(0, y));
        descs.push(BodyDesc::block(width - 1, y));
    }

    // One ball per lattice slot inside the walls, above the floor
    let spacing = 0.8 * BLOCK_SIDE;
    let inner_left = BLOCK_SIDE + spacing / 2.0;
    let per_row = (((width - 2) as f32 * BLOCK_SIDE) / spacing).floor().max(1.0) as usize;
    for i in 0..balls {
        let col = i % per_row;
        let row = i / per_row;
        let jitter = Vec2::new(rng.random_range(-0.05..0.05), rng.random_range(-0.05..0.05));
        let position = Vec2::new(
            inner_left + col as f32 * spacing,
            2.0 * BLOCK_SIDE + row as f32 * spacing,
        ) + jitter;
        let velocity = Vec2::new(rng.random_range(-1.0..1.0), rng.random_range(-0.5..0.5));
        let radius = rng.random_range(0.15..0.3);
        let mass = rng.random_range(0.5..2.0);
        descs.push(BodyDesc::ball(position, velocity, mass, radius));
    }

    descs
}

/// Solid rectangle of blocks; its interior blocks are all fully enclosed
pub fn solid_slab(x0: i32, y0: i32, width: i32, height: i32) -> Vec<BodyDesc> {
    (y0..y0 + height)
        .flat_map(|y| (x0..x0 + width).map(move |x| BodyDesc::block(x, y)))
        .collect()
}

/// Two balls closing head-on above a sloped wall
pub fn two_balls(separation: f32) -> Vec<BodyDesc> {
    vec![
        BodyDesc::ball(Vec2::new(1.0, 3.0), Vec2::new(2.0, 0.0), 1.0, 0.2),
        BodyDesc::ball(Vec2::new(1.0 + separation, 3.0), Vec2::new(-2.0, 0.0), 1.0, 0.2),
        BodyDesc::wall(Vec2::new(0.0, 1.0), Vec2::new(separation + 2.0, 0.5)),
    ]
}
