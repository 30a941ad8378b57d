//! Scene: the bodies a simulation runs over
//!
//! Built once from descriptors. Placing a block links it with up to four
//! already-placed neighbors, bumping both contact counts per adjacency.

use glam::IVec2;

use super::grid::BlockGrid;
use super::state::{Ball, Block, Body, BodyDesc, Wall};
use crate::error::Result;
use crate::settings::{Bounds, SimConfig};

#[derive(Debug, Clone)]
pub struct Scene {
    bodies: Vec<Body>,
    grid: BlockGrid,
}

impl Scene {
    /// Empty scene with a block grid of the given size
    pub fn new(grid_width: u32, grid_height: u32) -> Result<Self> {
        Ok(Self {
            bodies: Vec::new(),
            grid: BlockGrid::new(grid_width, grid_height)?,
        })
    }

    /// Build a scene from descriptors, in order
    pub fn build(config: &SimConfig, descs: &[BodyDesc]) -> Result<Self> {
        let mut scene = Self::new(config.grid_width, config.grid_height)?;
        for desc in descs {
            scene.add(desc)?;
        }
        log::info!(
            "Scene built: {} balls, {} blocks ({} enclosed), {} walls",
            scene.ball_count(),
            scene.grid.len(),
            scene.enclosed_block_count(),
            scene.bodies.iter().filter(|b| matches!(b, Body::Wall(_))).count()
        );
        Ok(scene)
    }

    fn add(&mut self, desc: &BodyDesc) -> Result<()> {
        match *desc {
            BodyDesc::Ball {
                position,
                velocity,
                mass,
                radius,
            } => {
                let ball = Ball::new(position, velocity, mass, radius)?;
                self.bodies.push(Body::Ball(ball));
            }
            BodyDesc::Block { x, y } => self.place_block(IVec2::new(x, y))?,
            BodyDesc::Wall { a, b } => {
                let wall = Wall::new(a, b)?;
                self.bodies.push(Body::Wall(wall));
            }
        }
        Ok(())
    }

    fn place_block(&mut self, cell: IVec2) -> Result<()> {
        let index = self.bodies.len();
        self.grid.insert(cell, index)?;

        let mut block = Block::new(cell);
        let neighbors: Vec<usize> = self.grid.occupied_neighbors(cell).collect();
        for n in neighbors {
            if let Body::Block(other) = &mut self.bodies[n] {
                other.add_contact();
                block.add_contact();
            }
        }
        self.bodies.push(Body::Block(block));
        Ok(())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    /// The block occupying `cell`, if any
    pub fn block_at(&self, cell: IVec2) -> Option<&Block> {
        self.grid.get(cell).and_then(|i| self.bodies[i].as_block())
    }

    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.bodies.iter().filter_map(Body::as_ball)
    }

    pub fn ball_count(&self) -> usize {
        self.balls().count()
    }

    pub fn enclosed_block_count(&self) -> usize {
        self.bodies
            .iter()
            .filter_map(Body::as_block)
            .filter(|b| b.is_enclosed())
            .count()
    }

    /// Total kinetic energy of all balls
    pub fn kinetic_energy(&self) -> f32 {
        self.balls().map(Ball::kinetic_energy).sum()
    }

    /// Remove balls whose centers left `bounds`; returns how many were removed
    pub fn retain_within(&mut self, bounds: &Bounds) -> usize {
        let keep: Vec<bool> = self
            .bodies
            .iter()
            .map(|body| match body {
                Body::Ball(ball) => bounds.contains(ball.pos),
                _ => true,
            })
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed == 0 {
            return 0;
        }

        // Old index -> new index for surviving bodies
        let mut remap = Vec::with_capacity(keep.len());
        let mut next = 0;
        for &k in &keep {
            remap.push(next);
            if k {
                next += 1;
            }
        }

        for (body, &k) in self.bodies.iter().zip(&keep) {
            if !k {
                log::warn!("Ball left bounds at {}, removing", body.position());
            }
        }
        let mut flags = keep.iter();
        self.bodies.retain(|_| *flags.next().unwrap_or(&true));
        self.grid.remap(|i| remap[i]);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_CONTACTS;
    use crate::sim::grid::NEIGHBORS;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    fn config() -> SimConfig {
        SimConfig {
            grid_width: 8,
            grid_height: 8,
            ..Default::default()
        }
    }

    fn contacts(scene: &Scene, x: i32, y: i32) -> u8 {
        scene.block_at(IVec2::new(x, y)).unwrap().contact_count()
    }

    #[test]
    fn test_build_preserves_order() {
        let descs = vec![
            BodyDesc::ball(Vec2::new(3.0, 5.0), Vec2::ZERO, 1.0, 0.2),
            BodyDesc::block(0, 0),
            BodyDesc::wall(Vec2::ZERO, Vec2::new(8.0, 0.0)),
        ];
        let scene = Scene::build(&config(), &descs).unwrap();
        assert_eq!(scene.len(), 3);
        assert!(matches!(scene.bodies()[0], Body::Ball(_)));
        assert!(matches!(scene.bodies()[1], Body::Block(_)));
        assert!(matches!(scene.bodies()[2], Body::Wall(_)));
        assert_eq!(scene.grid().get(IVec2::ZERO), Some(1));
    }

    #[test]
    fn test_contact_counts_plus_shape() {
        // Center surrounded on all four sides, placed last
        let descs = vec![
            BodyDesc::block(2, 3),
            BodyDesc::block(2, 1),
            BodyDesc::block(1, 2),
            BodyDesc::block(3, 2),
            BodyDesc::block(2, 2),
        ];
        let scene = Scene::build(&config(), &descs).unwrap();
        assert_eq!(contacts(&scene, 2, 2), 4);
        assert!(scene.block_at(IVec2::new(2, 2)).unwrap().is_enclosed());
        for (x, y) in [(2, 3), (2, 1), (1, 2), (3, 2)] {
            assert_eq!(contacts(&scene, x, y), 1);
        }
        assert_eq!(scene.enclosed_block_count(), 1);
    }

    #[test]
    fn test_contact_counts_row() {
        let descs: Vec<_> = (0..4).map(|x| BodyDesc::block(x, 0)).collect();
        let scene = Scene::build(&config(), &descs).unwrap();
        assert_eq!(contacts(&scene, 0, 0), 1);
        assert_eq!(contacts(&scene, 1, 0), 2);
        assert_eq!(contacts(&scene, 2, 0), 2);
        assert_eq!(contacts(&scene, 3, 0), 1);
    }

    #[test]
    fn test_build_rejects_bad_descriptors() {
        let bad_ball = vec![BodyDesc::ball(Vec2::ZERO, Vec2::ZERO, 0.0, 0.2)];
        assert!(Scene::build(&config(), &bad_ball).is_err());

        let dup_block = vec![BodyDesc::block(1, 1), BodyDesc::block(1, 1)];
        assert!(Scene::build(&config(), &dup_block).is_err());

        let outside = vec![BodyDesc::block(8, 0)];
        assert!(Scene::build(&config(), &outside).is_err());
    }

    #[test]
    fn test_retain_within_remaps_grid() {
        let descs = vec![
            BodyDesc::ball(Vec2::new(-5.0, 1.0), Vec2::ZERO, 1.0, 0.2),
            BodyDesc::block(0, 0),
            BodyDesc::ball(Vec2::new(1.5, 3.0), Vec2::ZERO, 1.0, 0.2),
            BodyDesc::block(1, 0),
        ];
        let mut scene = Scene::build(&config(), &descs).unwrap();
        let bounds = Bounds::new(Vec2::ZERO, Vec2::splat(8.0));
        assert_eq!(scene.retain_within(&bounds), 1);
        assert_eq!(scene.len(), 3);
        assert_eq!(scene.ball_count(), 1);
        assert_eq!(scene.grid().get(IVec2::new(0, 0)), Some(0));
        assert_eq!(scene.grid().get(IVec2::new(1, 0)), Some(2));
        assert_eq!(contacts(&scene, 1, 0), 1);
        assert_eq!(scene.retain_within(&bounds), 0);
    }

    proptest! {
        #[test]
        fn prop_contact_count_matches_occupied_neighbors(
            cells in prop::collection::vec((0i32..6, 0i32..6), 0..36),
        ) {
            // Keep first occurrences so placement order stays random
            let mut seen = BTreeSet::new();
            let descs: Vec<_> = cells
                .into_iter()
                .filter(|&c| seen.insert(c))
                .map(|(x, y)| BodyDesc::block(x, y))
                .collect();
            let scene = Scene::build(&config(), &descs).unwrap();
            prop_assert_eq!(scene.grid().len(), descs.len());

            for body in scene.bodies() {
                let block = body.as_block().unwrap();
                let occupied = NEIGHBORS
                    .iter()
                    .filter(|&&offset| scene.grid().is_occupied(block.cell + offset))
                    .count();
                prop_assert_eq!(block.contact_count() as usize, occupied);
                prop_assert_eq!(block.is_enclosed(), block.contact_count() == MAX_CONTACTS);
            }
        }
    }
}
